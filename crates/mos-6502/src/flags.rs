//! 6502 processor status register (P) and the flag rules built on it.
//!
//! The status register contains flags that reflect the result of operations
//! and control CPU behavior. Hardware order, MSB first, is `NV-BDIZC`.
//!
//! Arithmetic, shift and compare instructions never derive flag bits by
//! hand. They build an [`AluResult`] and apply the rules below to it, so
//! every instruction shares one definition of "carry", "overflow" and so on.

/// Carry flag - set if operation resulted in carry/borrow.
pub const C: u8 = 0x01;

/// Zero flag - set if result is zero.
pub const Z: u8 = 0x02;

/// Interrupt disable - when set, IRQ interrupts are ignored.
pub const I: u8 = 0x04;

/// Decimal mode - stored but ignored by the 2A03's adder.
pub const D: u8 = 0x08;

/// Break flag - not a real flag, only appears when status is pushed.
/// Set when BRK/PHP push status, clear when NMI pushes status.
pub const B: u8 = 0x10;

/// Unused bit - always reads as 1.
pub const U: u8 = 0x20;

/// Overflow flag - set if signed arithmetic overflowed.
pub const V: u8 = 0x40;

/// Negative flag - set if result has bit 7 set.
pub const N: u8 = 0x80;

/// Processor status register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Status(pub u8);

impl Status {
    /// Create status from raw value, ensuring unused bit is set.
    #[must_use]
    pub const fn from_byte(value: u8) -> Self {
        Self(value | U)
    }

    /// Status as pulled by PLP/RTI: break ignored, unused forced on.
    #[must_use]
    pub const fn from_stack(value: u8) -> Self {
        Self((value | U) & !B)
    }

    /// Get raw value for BRK/PHP (break and unused both set).
    #[must_use]
    pub const fn to_byte_brk(self) -> u8 {
        self.0 | U | B
    }

    /// Get raw value for NMI (unused set, break clear).
    #[must_use]
    pub const fn to_byte_irq(self) -> u8 {
        (self.0 | U) & !B
    }

    /// Check if a flag is set.
    #[must_use]
    pub const fn is_set(self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    /// Set a flag.
    pub fn set(&mut self, flag: u8) {
        self.0 |= flag;
    }

    /// Clear a flag.
    pub fn clear(&mut self, flag: u8) {
        self.0 &= !flag;
    }

    /// Set or clear a flag based on condition.
    pub fn set_if(&mut self, flag: u8, condition: bool) {
        if condition {
            self.set(flag);
        } else {
            self.clear(flag);
        }
    }

    /// Update N and Z flags based on a value.
    pub fn update_nz(&mut self, value: u8) {
        let r = AluResult::of(value);
        self.set_if(Z, zero(r));
        self.set_if(N, negative(r));
    }
}

/// Transient ALU output inspected by the flag rules.
///
/// `result` keeps bit 8 so carries survive; `a` and `b` are the operands as
/// the adder saw them (for SBC, `b` is the inverted operand).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AluResult {
    pub result: u16,
    pub a: u8,
    pub b: u8,
}

impl AluResult {
    #[must_use]
    pub const fn new(result: u16, a: u8, b: u8) -> Self {
        Self { result, a, b }
    }

    /// A bare 8-bit value, for rules that only look at the result.
    #[must_use]
    pub const fn of(value: u8) -> Self {
        Self::new(value as u16, value, 0)
    }

    /// Low 8 bits of the result.
    #[must_use]
    pub const fn byte(self) -> u8 {
        self.result as u8
    }
}

/// Carry out of bit 7 (bit 8 of the result).
#[must_use]
pub const fn carry(r: AluResult) -> bool {
    r.result & 0x100 != 0
}

/// Carry for right shifts: bit 0 of the value shifted out (`r.a`).
#[must_use]
pub const fn carry_shift_right(r: AluResult) -> bool {
    r.a & 0x01 != 0
}

/// Carry for subtraction: set when no borrow occurred.
///
/// Expects `result` computed as a 16-bit wrapping `a - b`, so a borrow
/// shows up as bit 8.
#[must_use]
pub const fn carry_subtract(r: AluResult) -> bool {
    r.result & 0x100 == 0
}

/// Low 8 bits of the result are zero.
#[must_use]
pub const fn zero(r: AluResult) -> bool {
    r.result & 0xFF == 0
}

/// Signed overflow: both operands share a sign and the result does not.
#[must_use]
pub const fn overflow(r: AluResult) -> bool {
    (r.a ^ r.b) & 0x80 == 0 && (r.a ^ r.byte()) & 0x80 != 0
}

/// Bit 7 of the result.
#[must_use]
pub const fn negative(r: AluResult) -> bool {
    r.result & 0x80 != 0
}
