//! Programmer-visible register file.

use crate::Status;
use crate::flags::U;

/// PC after power-on, before any reset vector is read.
pub const DEFAULT_PC: u16 = 0x8000;

/// Register file, copied out whole by [`emu_core::Cpu::registers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    /// Offset of the next free stack slot in page one.
    pub s: u8,
    pub pc: u16,
    pub p: Status,
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl Registers {
    /// Power-on register state.
    ///
    /// A, X, Y and all flags are zero (only the hard-wired unused bit
    /// reads as 1), the stack is empty (S = $FF) and PC sits at
    /// [`DEFAULT_PC`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            s: 0xFF,
            pc: DEFAULT_PC,
            p: Status(U),
        }
    }

    /// Bus address of the next free stack slot.
    #[must_use]
    pub const fn stack_addr(&self) -> u16 {
        crate::STACK_BASE | self.s as u16
    }
}
