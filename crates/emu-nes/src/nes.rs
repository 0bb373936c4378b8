//! Top-level NES system.
//!
//! Execution is one instruction per [`Nes::tick`]. The tick itself never
//! looks at interrupts; [`Nes::step`] is the driver that also advances the
//! vblank timer and injects the NMI, and is what hosts normally call.

use std::time::{Duration, Instant};

use emu_core::{Bus, Cpu, Observable, Value, parse_address};
use mos_6502::{Mos6502, Step};
use nes_cartridge::{Banks, Cartridge, Header, PRG_BANK_SIZE};

use crate::bus::NesBus;
use crate::config::{NesConfig, NesRegion};
use crate::controller::Controller;
use crate::nmi::{NmiController, VblankTimer};
use crate::trace::Trace;
use crate::video::video_bus;
use crate::NesError;

/// Start of the cartridge PRG window.
const PRG_START: u16 = 0x8000;
/// Opcode of `JMP absolute`.
const JMP_ABSOLUTE: u8 = 0x4C;

/// NES system.
#[derive(Debug, Clone)]
pub struct Nes {
    cpu: Mos6502,
    bus: NesBus,
    nmi: NmiController,
    vblank: VblankTimer,
    header: Header,
    banks: Banks,
    trace: Trace,
    region: NesRegion,
    load_timeout: Duration,
}

impl Nes {
    /// Create a new NES from the given configuration.
    ///
    /// PC is left at $8000; call [`Nes::reset`] to start from the reset
    /// vector instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the ROM data is invalid.
    pub fn new(config: &NesConfig) -> Result<Self, NesError> {
        let cartridge = Cartridge::from_bytes(&config.rom_data)?;
        Self::from_cartridge(cartridge, config)
    }

    fn from_cartridge(cartridge: Cartridge, config: &NesConfig) -> Result<Self, NesError> {
        let Cartridge { header, banks } = cartridge;

        let mut bus = NesBus::new(video_bus(header.mirroring)?);
        let [lower, upper] = banks.prg_window();
        bus.cpu.load(PRG_START, lower.as_slice())?;
        bus.cpu.load(PRG_START + PRG_BANK_SIZE as u16, upper.as_slice())?;
        if let Some(chr) = banks.chr().first() {
            bus.vram.load(0x0000, chr.as_slice())?;
        }
        bus.set_vblank(true)?;

        Ok(Self {
            cpu: Mos6502::new(),
            bus,
            nmi: NmiController::new(),
            vblank: VblankTimer::new(config.region.cpu_cycles_per_frame()),
            header,
            banks,
            trace: Trace::new(config.trace_depth),
            region: config.region,
            load_timeout: config.load_timeout,
        })
    }

    /// Replace the running program with a new ROM image, keeping this
    /// machine's region, trace depth and timeout.
    ///
    /// # Errors
    ///
    /// On any load error the current machine is left exactly as it was.
    pub fn load_rom(&mut self, rom_data: &[u8]) -> Result<(), NesError> {
        let config = NesConfig {
            rom_data: Vec::new(),
            region: self.region,
            trace_depth: self.trace.depth(),
            load_timeout: self.load_timeout,
        };
        let cartridge = Cartridge::from_bytes(rom_data)?;
        *self = Self::from_cartridge(cartridge, &config)?;
        Ok(())
    }

    /// Load PC from the reset vector.
    pub fn reset(&mut self) -> Result<(), NesError> {
        self.cpu.reset(&mut self.bus)?;
        log::info!("reset: PC=${:04X}", self.cpu.regs.pc);
        Ok(())
    }

    /// Execute exactly one instruction and record it in the trace.
    ///
    /// Returns the realized cycle count.
    pub fn tick(&mut self) -> Result<u32, NesError> {
        let step = self.cpu.execute(&mut self.bus)?;
        self.trace.record(step);
        Ok(step.cycles)
    }

    /// One driven step: tick, retire a finished NMI, then advance the
    /// vblank timer and take an NMI if it fired.
    pub fn step(&mut self) -> Result<u32, NesError> {
        let cycles = self.tick()?;

        // An RTI in this tick frees the controller for this step's vblank
        if self.nmi.finish(self.cpu.regs.s) {
            log::debug!("NMI handler returned to ${:04X}", self.cpu.regs.pc);
        }

        if self.vblank.advance(cycles) {
            let in_vblank = self.bus.in_vblank();
            self.bus.set_vblank(!in_vblank)?;
            if !self.nmi.in_flight() {
                self.nmi.start(self.cpu.regs.s);
                self.cpu.nmi(&mut self.bus)?;
                log::debug!("NMI taken, handler at ${:04X}", self.cpu.regs.pc);
            }
        }
        Ok(cycles)
    }

    /// True when the instruction at PC is `JMP` to itself.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        let pc = self.cpu.regs.pc;
        let target = u16::from_le_bytes([
            self.bus.peek(pc.wrapping_add(1)),
            self.bus.peek(pc.wrapping_add(2)),
        ]);
        self.bus.peek(pc) == JMP_ABSOLUTE && target == pc
    }

    /// Drive the machine until it parks in a `JMP *` loop.
    ///
    /// Returns the number of instructions executed.
    ///
    /// # Errors
    ///
    /// [`NesError::LoadTimeout`] if the loop is not reached within the
    /// configured wall-clock budget, or any execution error.
    pub fn run_until_idle(&mut self) -> Result<u64, NesError> {
        let start = Instant::now();
        let mut instructions = 0u64;
        while !self.is_idle() {
            let elapsed = start.elapsed();
            if elapsed >= self.load_timeout {
                log::warn!(
                    "no idle loop after {instructions} instructions, PC=${:04X}",
                    self.cpu.regs.pc
                );
                return Err(NesError::LoadTimeout {
                    elapsed,
                    instructions,
                });
            }
            self.step()?;
            instructions += 1;
        }
        Ok(instructions)
    }

    /// Reference to the CPU.
    #[must_use]
    pub fn cpu(&self) -> &Mos6502 {
        &self.cpu
    }

    /// Mutable reference to the CPU.
    pub fn cpu_mut(&mut self) -> &mut Mos6502 {
        &mut self.cpu
    }

    /// Reference to the bus.
    #[must_use]
    pub fn bus(&self) -> &NesBus {
        &self.bus
    }

    /// Mutable reference to the bus.
    pub fn bus_mut(&mut self) -> &mut NesBus {
        &mut self.bus
    }

    #[must_use]
    pub fn header(&self) -> &Header {
        &self.header
    }

    #[must_use]
    pub fn banks(&self) -> &Banks {
        &self.banks
    }

    #[must_use]
    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Most recent instruction, if any has run.
    #[must_use]
    pub fn last_step(&self) -> Option<&Step> {
        self.trace.latest()
    }

    #[must_use]
    pub fn nmi(&self) -> &NmiController {
        &self.nmi
    }

    /// Video region (NTSC or PAL).
    #[must_use]
    pub fn region(&self) -> NesRegion {
        self.region
    }

    /// Controller 1 (`0`) or 2 (`1`).
    pub fn controller_mut(&mut self, index: usize) -> Option<&mut Controller> {
        self.bus.controllers.get_mut(index)
    }

    /// Read a CPU-bus byte with side effects, as the CPU would.
    pub fn read(&mut self, addr: u16) -> Result<u8, NesError> {
        Ok(self.bus.read(u32::from(addr))?)
    }
}

impl Observable for Nes {
    fn query(&self, path: &str) -> Option<Value> {
        if let Some(rest) = path.strip_prefix("cpu.") {
            self.cpu.query(rest)
        } else if let Some(rest) = path.strip_prefix("memory.") {
            parse_address(rest).map(|a| Value::U8(self.bus.peek(a)))
        } else if let Some(rest) = path.strip_prefix("vram.") {
            parse_address(rest).map(|a| Value::U8(self.bus.peek_vram(a)))
        } else if let Some(rest) = path.strip_prefix("oam.") {
            let index: usize = rest.parse().ok()?;
            self.bus.oam.get(index).map(|&b| Value::U8(b))
        } else {
            match path {
                "nmi.in_flight" => Some(self.nmi.in_flight().into()),
                "nmi.captured_sp" => Some(self.nmi.captured_sp().into()),
                "vblank.elapsed" => Some(self.vblank.elapsed().into()),
                "vblank.threshold" => Some(self.vblank.threshold().into()),
                "trace.len" => Some((self.trace.len() as u32).into()),
                "trace.latest" => self.trace.latest().map(|s| s.to_string().into()),
                _ => self.cpu.query(path),
            }
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "cpu.<6502_paths>",
            "memory.<address>",
            "vram.<address>",
            "oam.<index>",
            "nmi.in_flight",
            "nmi.captured_sp",
            "vblank.elapsed",
            "vblank.threshold",
            "trace.len",
            "trace.latest",
        ]
    }
}
