//! 6502 addressing modes.
//!
//! The 6502 has 13 addressing modes:
//! - Implicit: No operand (e.g., CLC, RTS)
//! - Accumulator: Operates on A register (e.g., ASL A)
//! - Immediate: #$nn (literal value)
//! - Zero Page: $nn (8-bit address in page zero)
//! - Zero Page,X: $nn,X (8-bit address + X, wraps in page zero)
//! - Zero Page,Y: $nn,Y (8-bit address + Y, wraps in page zero)
//! - Relative: Branch offset (-128 to +127)
//! - Absolute: $nnnn (16-bit address)
//! - Absolute,X: $nnnn,X (16-bit address + X, may cross page)
//! - Absolute,Y: $nnnn,Y (16-bit address + Y, may cross page)
//! - Indirect: ($nnnn) (JMP only, buggy page boundary behavior)
//! - Indexed Indirect: ($nn,X) (pointer in zero page indexed by X)
//! - Indirect Indexed: ($nn),Y (zero page pointer + Y)
//!
//! Resolution consumes the operand bytes, leaves PC on the next opcode and,
//! unless the caller asked for [`Fetch::AddressOnly`], reads the operand.
//! Stores use the address-only form so that writing a memory-mapped
//! register never triggers that register's read side effect.

use emu_core::Bus;

use crate::{CpuError, Mos6502};

/// Addressing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Implicit,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Relative,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,
    IndexedIndirect,
    IndirectIndexed,
}

impl Mode {
    /// Name used in traces and error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Mode::Implicit => "implicit",
            Mode::Accumulator => "accumulator",
            Mode::Immediate => "immediate",
            Mode::ZeroPage => "zeropage",
            Mode::ZeroPageX => "zeropage,X",
            Mode::ZeroPageY => "zeropage,Y",
            Mode::Relative => "relative",
            Mode::Absolute => "absolute",
            Mode::AbsoluteX => "absolute,X",
            Mode::AbsoluteY => "absolute,Y",
            Mode::Indirect => "indirect",
            Mode::IndexedIndirect => "(indirect,X)",
            Mode::IndirectIndexed => "(indirect),Y",
        }
    }

    /// Number of operand bytes that follow the opcode.
    #[must_use]
    pub const fn operand_len(self) -> u16 {
        match self {
            Mode::Implicit | Mode::Accumulator => 0,
            Mode::Immediate
            | Mode::ZeroPage
            | Mode::ZeroPageX
            | Mode::ZeroPageY
            | Mode::Relative
            | Mode::IndexedIndirect
            | Mode::IndirectIndexed => 1,
            Mode::Absolute | Mode::AbsoluteX | Mode::AbsoluteY | Mode::Indirect => 2,
        }
    }
}

/// Whether resolution reads the operand or stops at its address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fetch {
    Value,
    AddressOnly,
}

/// A resolved operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operand {
    pub mode: Mode,
    /// Operand byte. Zero for implicit and address-only resolutions; the
    /// raw signed offset for relative mode.
    pub value: u8,
    /// Effective address, for modes that name a memory location.
    pub address: Option<u16>,
    /// The operand is the accumulator.
    pub accumulator: bool,
    /// Indexing moved the effective address onto another page.
    pub page_crossed: bool,
}

impl Operand {
    const fn bare(mode: Mode, value: u8) -> Self {
        Self {
            mode,
            value,
            address: None,
            accumulator: false,
            page_crossed: false,
        }
    }

    /// The effective address, or the contract violation that its absence is.
    pub fn require_address(&self, mnemonic: &'static str) -> Result<u16, CpuError> {
        self.address.ok_or(CpuError::MissingEffectiveAddress {
            mnemonic,
            mode: self.mode.name(),
        })
    }
}

#[inline]
fn crosses_page(base: u16, addr: u16) -> bool {
    (base & 0xFF00) != (addr & 0xFF00)
}

impl Mos6502 {
    /// Fetch the next byte at PC and increment PC.
    pub(crate) fn fetch<B: Bus>(&mut self, bus: &mut B) -> Result<u8, CpuError> {
        let value = bus.read(u32::from(self.regs.pc))?;
        self.regs.pc = self.regs.pc.wrapping_add(1);
        Ok(value)
    }

    /// Fetch a 16-bit word (little-endian) at PC.
    pub(crate) fn fetch_word<B: Bus>(&mut self, bus: &mut B) -> Result<u16, CpuError> {
        let low = self.fetch(bus)?;
        let high = self.fetch(bus)?;
        Ok(u16::from_le_bytes([low, high]))
    }

    /// Read a 16-bit word from memory (little-endian).
    pub(crate) fn read_word<B: Bus>(bus: &mut B, addr: u16) -> Result<u16, CpuError> {
        let low = bus.read(u32::from(addr))?;
        let high = bus.read(u32::from(addr.wrapping_add(1)))?;
        Ok(u16::from_le_bytes([low, high]))
    }

    /// Read a pointer from zero page; the high byte wraps within page zero.
    fn read_word_zero_page<B: Bus>(bus: &mut B, ptr: u8) -> Result<u16, CpuError> {
        let low = bus.read(u32::from(ptr))?;
        let high = bus.read(u32::from(ptr.wrapping_add(1)))?;
        Ok(u16::from_le_bytes([low, high]))
    }

    /// Read a 16-bit word with 6502 page boundary bug (for indirect JMP).
    /// If addr is $xxFF, high byte comes from $xx00 instead of $xx00+$100.
    pub(crate) fn read_word_page_bug<B: Bus>(bus: &mut B, addr: u16) -> Result<u16, CpuError> {
        let low = bus.read(u32::from(addr))?;
        let high_addr = (addr & 0xFF00) | (addr.wrapping_add(1) & 0x00FF);
        let high = bus.read(u32::from(high_addr))?;
        Ok(u16::from_le_bytes([low, high]))
    }

    /// Resolve the operand of the instruction whose opcode was just fetched.
    pub fn resolve<B: Bus>(
        &mut self,
        bus: &mut B,
        mode: Mode,
        fetch: Fetch,
    ) -> Result<Operand, CpuError> {
        match mode {
            Mode::Implicit => Ok(Operand::bare(mode, 0)),
            Mode::Accumulator => Ok(Operand {
                accumulator: true,
                ..Operand::bare(mode, self.regs.a)
            }),
            Mode::Immediate => {
                let value = self.fetch(bus)?;
                Ok(Operand::bare(mode, value))
            }
            Mode::ZeroPage => {
                let addr = u16::from(self.fetch(bus)?);
                Self::memory(bus, mode, addr, false, fetch)
            }
            Mode::ZeroPageX => self.zero_page_indexed(bus, mode, self.regs.x, fetch),
            Mode::ZeroPageY => self.zero_page_indexed(bus, mode, self.regs.y, fetch),
            Mode::Relative => self.relative(bus),
            Mode::Absolute => {
                let addr = self.fetch_word(bus)?;
                Self::memory(bus, mode, addr, false, fetch)
            }
            Mode::AbsoluteX => self.absolute_indexed(bus, mode, self.regs.x, fetch),
            Mode::AbsoluteY => self.absolute_indexed(bus, mode, self.regs.y, fetch),
            Mode::Indirect => {
                let ptr = self.fetch_word(bus)?;
                let target = Self::read_word_page_bug(bus, ptr)?;
                Self::memory(bus, mode, target, false, Fetch::AddressOnly)
            }
            Mode::IndexedIndirect => {
                let ptr = self.fetch(bus)?.wrapping_add(self.regs.x);
                let addr = Self::read_word_zero_page(bus, ptr)?;
                Self::memory(bus, mode, addr, false, fetch)
            }
            Mode::IndirectIndexed => {
                let ptr = self.fetch(bus)?;
                let base = Self::read_word_zero_page(bus, ptr)?;
                let addr = base.wrapping_add(u16::from(self.regs.y));
                Self::memory(bus, mode, addr, crosses_page(base, addr), fetch)
            }
        }
    }

    /// Zero Page,X / Zero Page,Y: the sum wraps within page zero, so it
    /// never crosses a page.
    fn zero_page_indexed<B: Bus>(
        &mut self,
        bus: &mut B,
        mode: Mode,
        index: u8,
        fetch: Fetch,
    ) -> Result<Operand, CpuError> {
        let base = self.fetch(bus)?;
        let addr = u16::from(base.wrapping_add(index));
        Self::memory(bus, mode, addr, false, fetch)
    }

    /// Absolute,X / Absolute,Y: a full 16-bit sum; crossing is reported when
    /// the low byte carries into the high byte.
    fn absolute_indexed<B: Bus>(
        &mut self,
        bus: &mut B,
        mode: Mode,
        index: u8,
        fetch: Fetch,
    ) -> Result<Operand, CpuError> {
        let base = self.fetch_word(bus)?;
        let addr = base.wrapping_add(u16::from(index));
        Self::memory(bus, mode, addr, crosses_page(base, addr), fetch)
    }

    /// Relative: the offset byte is the operand; the branch target is
    /// reported as the effective address.
    fn relative<B: Bus>(&mut self, bus: &mut B) -> Result<Operand, CpuError> {
        let offset = self.fetch(bus)?;
        let target = self.regs.pc.wrapping_add(offset as i8 as u16);
        Ok(Operand {
            address: Some(target),
            ..Operand::bare(Mode::Relative, offset)
        })
    }

    fn memory<B: Bus>(
        bus: &mut B,
        mode: Mode,
        addr: u16,
        page_crossed: bool,
        fetch: Fetch,
    ) -> Result<Operand, CpuError> {
        let value = match fetch {
            Fetch::Value => bus.read(u32::from(addr))?,
            Fetch::AddressOnly => 0,
        };
        Ok(Operand {
            address: Some(addr),
            page_crossed,
            ..Operand::bare(mode, value)
        })
    }
}
