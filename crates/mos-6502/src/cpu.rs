//! The CPU core: instruction dispatch, stack and interrupt sequences.

use std::fmt;

use emu_core::{Bus, Cpu, Observable, Value};

use crate::flags::{B, C, D, I, N, V, Z};
use crate::{CpuError, Mnemonic, Mode, Registers, Status, decode};

/// NMI vector location.
pub const NMI_VECTOR: u16 = 0xFFFA;
/// Reset vector location.
pub const RESET_VECTOR: u16 = 0xFFFC;
/// IRQ/BRK vector location.
pub const IRQ_VECTOR: u16 = 0xFFFE;
/// Page one holds the stack.
pub const STACK_BASE: u16 = 0x0100;

/// Cycles taken by the NMI and reset entry sequences.
const INTERRUPT_CYCLES: u32 = 7;

/// Record of one executed instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Address the opcode was fetched from.
    pub pc: u16,
    pub opcode: u8,
    pub mnemonic: Mnemonic,
    pub mode: Mode,
    /// Realized cycles, including branch and page-crossing extras.
    pub cycles: u32,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "${:04X}  {:02X}  {} {}",
            self.pc,
            self.opcode,
            self.mnemonic.name(),
            self.mode.name()
        )
    }
}

/// The 2A03's 6502 core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mos6502 {
    /// CPU registers.
    pub regs: Registers,
    /// Cycles executed since power-on.
    cycles: u64,
}

impl Default for Mos6502 {
    fn default() -> Self {
        Self::new()
    }
}

impl Mos6502 {
    /// Power-on state. PC is [`crate::DEFAULT_PC`]; the reset vector is not
    /// read until [`Cpu::reset`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            regs: Registers::new(),
            cycles: 0,
        }
    }

    /// Total cycles executed.
    #[must_use]
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Execute one instruction.
    ///
    /// # Errors
    ///
    /// Fails on an undocumented opcode (PC is left on it), a stack pointer
    /// pushed or pulled past its range, or an out-of-range bus access.
    pub fn execute<B: Bus>(&mut self, bus: &mut B) -> Result<Step, CpuError> {
        let pc = self.regs.pc;
        let byte = bus.read(u32::from(pc))?;
        let opcode = decode(byte).ok_or(CpuError::UnknownOpcode { opcode: byte, pc })?;
        self.regs.pc = pc.wrapping_add(1);

        let operand = self.resolve(bus, opcode.mode, opcode.fetch)?;
        let extra = opcode.mnemonic.execute(self, bus, &operand)?;
        let penalty = u32::from(opcode.page_penalty && operand.page_crossed);
        let cycles = u32::from(opcode.cycles) + extra + penalty;
        self.cycles += u64::from(cycles);

        let step = Step {
            pc,
            opcode: byte,
            mnemonic: opcode.mnemonic,
            mode: opcode.mode,
            cycles,
        };
        log::trace!("{step}");
        Ok(step)
    }

    // =========================================================================
    // Stack
    // =========================================================================

    /// Push a byte. The stack pointer never wraps: pushing with S = $00
    /// fails before anything is written.
    pub(crate) fn push<B: Bus>(&mut self, bus: &mut B, value: u8) -> Result<(), CpuError> {
        let sp = self.regs.s;
        if sp == 0 {
            return Err(CpuError::StackOverflow { sp });
        }
        bus.write(u32::from(self.regs.stack_addr()), value)?;
        self.regs.s = sp - 1;
        Ok(())
    }

    /// Pull a byte. Pulling from an empty stack (S = $FF) fails.
    pub(crate) fn pull<B: Bus>(&mut self, bus: &mut B) -> Result<u8, CpuError> {
        let sp = self.regs.s;
        if sp == 0xFF {
            return Err(CpuError::StackUnderflow { sp });
        }
        self.regs.s = sp + 1;
        Ok(bus.read(u32::from(self.regs.stack_addr()))?)
    }

    /// Push high byte first, so the word reads little-endian in memory.
    pub(crate) fn push_word<B: Bus>(&mut self, bus: &mut B, value: u16) -> Result<(), CpuError> {
        let [low, high] = value.to_le_bytes();
        self.push(bus, high)?;
        self.push(bus, low)
    }

    pub(crate) fn pull_word<B: Bus>(&mut self, bus: &mut B) -> Result<u16, CpuError> {
        let low = self.pull(bus)?;
        let high = self.pull(bus)?;
        Ok(u16::from_le_bytes([low, high]))
    }
}

impl Cpu for Mos6502 {
    type Registers = Registers;
    type Error = CpuError;

    fn step<B: Bus>(&mut self, bus: &mut B) -> Result<u32, CpuError> {
        self.execute(bus).map(|step| step.cycles)
    }

    fn pc(&self) -> u16 {
        self.regs.pc
    }

    fn registers(&self) -> Registers {
        self.regs
    }

    /// Push PC and status (break clear), set I, jump through $FFFA.
    fn nmi<B: Bus>(&mut self, bus: &mut B) -> Result<(), CpuError> {
        self.push_word(bus, self.regs.pc)?;
        self.push(bus, self.regs.p.to_byte_irq())?;
        self.regs.p.set(I);
        self.regs.pc = Self::read_word(bus, NMI_VECTOR)?;
        self.cycles += u64::from(INTERRUPT_CYCLES);
        Ok(())
    }

    fn reset<B: Bus>(&mut self, bus: &mut B) -> Result<(), CpuError> {
        // SP decremented by 3 during reset (but no actual writes)
        self.regs.s = 0xFD;
        self.regs.p = Status::from_byte(self.regs.p.0 | I);
        self.regs.pc = Self::read_word(bus, RESET_VECTOR)?;
        self.cycles += u64::from(INTERRUPT_CYCLES);
        log::debug!("6502 reset, PC=${:04X}", self.regs.pc);
        Ok(())
    }
}

/// Flag names as queried under `flags.`, with their status bits.
const FLAG_NAMES: [(&str, u8); 7] = [
    ("c", C),
    ("z", Z),
    ("i", I),
    ("d", D),
    ("b", B),
    ("v", V),
    ("n", N),
];

impl Observable for Mos6502 {
    fn query(&self, path: &str) -> Option<Value> {
        let p = self.regs.p;
        if let Some(name) = path.strip_prefix("flags.") {
            return FLAG_NAMES
                .iter()
                .find(|(n, _)| *n == name)
                .map(|&(_, bit)| p.is_set(bit).into());
        }
        match path {
            "pc" => Some(self.regs.pc.into()),
            "a" => Some(self.regs.a.into()),
            "x" => Some(self.regs.x.into()),
            "y" => Some(self.regs.y.into()),
            "s" => Some(self.regs.s.into()),
            "p" => Some(p.0.into()),
            "cycles" => Some(self.cycles.into()),
            "flags" => Some(Value::Map(
                FLAG_NAMES
                    .iter()
                    .map(|&(name, bit)| (name.to_string(), p.is_set(bit).into()))
                    .collect(),
            )),
            _ => None,
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "pc", "a", "x", "y", "s", "p", "cycles", "flags", "flags.c", "flags.z", "flags.i",
            "flags.d", "flags.b", "flags.v", "flags.n",
        ]
    }
}
