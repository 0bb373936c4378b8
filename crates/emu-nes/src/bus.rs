//! NES bus: CPU address routing.
//!
//! Implements `emu_core::Bus` for the NES. The CPU side is an
//! [`AddressSpace`] whose mirrors are wired once, at construction:
//!
//! - $0000-$07FF internal RAM, repeated through $1FFF
//! - $2000-$2007 video registers, repeated every 8 bytes through $3FFF
//! - $4014 sprite DMA, $4016/$4017 controllers
//! - $8000-$FFFF cartridge PRG ROM
//!
//! Every address stores the last byte written to it. A handful of
//! addresses are [`Port`]s whose writes (or, for the controllers, reads)
//! also drive the video latches, sprite memory or the joypads.

use emu_core::{Access, AddressSpace, Bus, BusError};

use crate::controller::Controller;
use crate::video::VideoBus;

/// PPUCTRL; bit 2 selects the $2007 increment.
pub const PPU_CTRL: u16 = 0x2000;
/// PPUSTATUS; bit 7 is the vblank flag.
pub const PPU_STATUS: u16 = 0x2002;
/// OAMADDR; the sprite memory index used by $2004.
pub const OAM_ADDR: u16 = 0x2003;

const VBLANK: u8 = 0x80;
const INCREMENT_32: u8 = 0x04;

/// CPU-visible device registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Port {
    /// $2004: write sprite memory at OAMADDR, then advance OAMADDR.
    OamData,
    /// $2005: X then Y scroll, sharing the write toggle with $2006.
    Scroll,
    /// $2006: video address, high byte then low byte.
    VideoAddress,
    /// $2007: write the video bus at the latched address, then advance it.
    VideoData,
    /// $4014: copy a CPU page into sprite memory.
    OamDma,
    /// $4016: controller 1 reads, strobe writes for both controllers.
    Joypad1,
    /// $4017: controller 2 reads.
    Joypad2,
}

/// Two-write latch shared by $2005 and $2006.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct VideoLatch {
    /// True after the first of a pair of writes.
    pub toggle: bool,
    /// Latched video bus address.
    pub address: u16,
    pub scroll_x: u8,
    pub scroll_y: u8,
}

impl VideoLatch {
    fn write_scroll(&mut self, value: u8) {
        if self.toggle {
            self.scroll_y = value;
        } else {
            self.scroll_x = value;
        }
        self.toggle = !self.toggle;
    }

    fn write_address(&mut self, value: u8) {
        if self.toggle {
            self.address = (self.address & 0xFF00) | u16::from(value);
        } else {
            self.address = (u16::from(value) << 8) | (self.address & 0x00FF);
        }
        self.toggle = !self.toggle;
    }
}

/// Build the CPU address space.
fn cpu_space() -> AddressSpace<Port> {
    let mut cpu = AddressSpace::new();
    cpu.mirror_repeating(0x0000, 0x0800, 0x1FFF);

    cpu.set_port(0x2004, Port::OamData);
    cpu.set_port(0x2005, Port::Scroll);
    cpu.set_port(0x2006, Port::VideoAddress);
    cpu.set_port(0x2007, Port::VideoData);
    cpu.mirror_repeating(0x2000, 8, 0x3FFF);

    cpu.set_port(0x4014, Port::OamDma);
    cpu.set_port(0x4016, Port::Joypad1);
    cpu.set_port(0x4017, Port::Joypad2);
    cpu
}

/// The NES bus, implementing `emu_core::Bus`.
#[derive(Debug, Clone)]
pub struct NesBus {
    /// CPU address space.
    pub cpu: AddressSpace<Port>,
    /// PPU address space.
    pub vram: VideoBus,
    /// Sprite attribute memory.
    pub oam: [u8; 256],
    pub latch: VideoLatch,
    /// Controllers 1 ($4016) and 2 ($4017).
    pub controllers: [Controller; 2],
}

impl NesBus {
    #[must_use]
    pub fn new(vram: VideoBus) -> Self {
        Self {
            cpu: cpu_space(),
            vram,
            oam: [0; 256],
            latch: VideoLatch::default(),
            controllers: [Controller::new(), Controller::new()],
        }
    }

    /// Peek a CPU-bus byte without side effects (for observation).
    pub fn peek(&self, addr: u16) -> u8 {
        // In range by construction
        self.cpu.peek(u32::from(addr)).unwrap_or(0)
    }

    /// Peek a video-bus byte without side effects.
    pub fn peek_vram(&self, addr: u16) -> u8 {
        self.vram.peek(u32::from(addr)).unwrap_or(0)
    }

    #[must_use]
    pub fn in_vblank(&self) -> bool {
        self.peek(PPU_STATUS) & VBLANK != 0
    }

    /// Set or clear the vblank flag in PPUSTATUS.
    pub fn set_vblank(&mut self, on: bool) -> Result<(), BusError> {
        let status = self.peek(PPU_STATUS);
        let status = if on { status | VBLANK } else { status & !VBLANK };
        self.cpu.poke(u32::from(PPU_STATUS), status)
    }

    fn write_port(&mut self, port: Port, value: u8) -> Result<(), BusError> {
        match port {
            Port::OamData => {
                let index = self.peek(OAM_ADDR);
                self.oam[usize::from(index)] = value;
                self.cpu.poke(u32::from(OAM_ADDR), index.wrapping_add(1))?;
            }
            Port::Scroll => self.latch.write_scroll(value),
            Port::VideoAddress => self.latch.write_address(value),
            Port::VideoData => {
                self.vram.poke(u32::from(self.latch.address), value)?;
                let step = if self.peek(PPU_CTRL) & INCREMENT_32 != 0 {
                    32
                } else {
                    1
                };
                self.latch.address = self.latch.address.wrapping_add(step);
            }
            Port::OamDma => {
                let page = u16::from(value) << 8;
                for (offset, slot) in (0u16..).zip(self.oam.iter_mut()) {
                    *slot = self.cpu.peek(u32::from(page | offset))?;
                }
            }
            Port::Joypad1 => {
                for controller in &mut self.controllers {
                    controller.write(value);
                }
            }
            // Frame counter on real hardware; storage only here
            Port::Joypad2 => {}
        }
        Ok(())
    }
}

impl Bus for NesBus {
    fn read(&mut self, addr: u32) -> Result<u8, BusError> {
        match self.cpu.resolve(addr)? {
            Access::Port(_, Port::Joypad1) => Ok(self.controllers[0].read()),
            Access::Port(_, Port::Joypad2) => Ok(self.controllers[1].read()),
            access => self.cpu.peek(u32::from(access.address())),
        }
    }

    fn write(&mut self, addr: u32, value: u8) -> Result<(), BusError> {
        let access = self.cpu.resolve(addr)?;
        self.cpu.poke(u32::from(access.address()), value)?;
        if let Access::Port(_, port) = access {
            self.write_port(port, value)?;
        }
        Ok(())
    }
}
