//! NES controller (joypad) emulation.
//!
//! The controller is read serially via $4016/$4017. Each read returns the
//! next button in the fixed order A, B, Select, Start, Up, Down, Left,
//! Right, wrapping after Right. Writing 1 then 0 to $4016 (a strobe) starts
//! the sequence again from A.

/// NES button indices (bit positions).
pub mod button {
    pub const A: u8 = 0;
    pub const B: u8 = 1;
    pub const SELECT: u8 = 2;
    pub const START: u8 = 3;
    pub const UP: u8 = 4;
    pub const DOWN: u8 = 5;
    pub const LEFT: u8 = 6;
    pub const RIGHT: u8 = 7;
}

/// NES controller state.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Controller {
    /// Current button state (bit per button).
    buttons: u8,
    /// Button returned by the next read.
    index: u8,
    /// Bit 0 of the previous strobe write.
    last_strobe: u8,
}

impl Controller {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a button state (true = pressed).
    pub fn set_button(&mut self, button: u8, pressed: bool) {
        if pressed {
            self.buttons |= 1 << button;
        } else {
            self.buttons &= !(1 << button);
        }
    }

    /// Read $4016/$4017: the current button's bit, then advance.
    pub fn read(&mut self) -> u8 {
        let bit = (self.buttons >> self.index) & 1;
        self.index = (self.index + 1) % 8;
        bit
    }

    /// Write $4016: a 1 followed by a 0 rewinds to button A.
    pub fn write(&mut self, value: u8) {
        let strobe = value & 1;
        if self.last_strobe == 1 && strobe == 0 {
            self.index = 0;
        }
        self.last_strobe = strobe;
    }

    /// Current button state byte (for observation).
    #[must_use]
    pub fn buttons(&self) -> u8 {
        self.buttons
    }

    /// Button the next read will report.
    #[must_use]
    pub fn index(&self) -> u8 {
        self.index
    }
}
