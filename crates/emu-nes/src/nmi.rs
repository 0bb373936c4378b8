//! Vblank timer and NMI bookkeeping.
//!
//! There is no PPU here. A timer counts CPU cycles and declares vblank once
//! per frame's worth of them. The controller keeps a second NMI from
//! stacking on one whose handler is still running.

/// NMI in-flight tracking.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NmiController {
    in_flight: bool,
    /// Stack pointer when the NMI was taken.
    captured_sp: u8,
}

impl NmiController {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            in_flight: false,
            captured_sp: 0,
        }
    }

    #[must_use]
    pub const fn in_flight(&self) -> bool {
        self.in_flight
    }

    #[must_use]
    pub const fn captured_sp(&self) -> u8 {
        self.captured_sp
    }

    /// Mark an NMI as taken with the stack pointer `sp` (before the pushes).
    pub fn start(&mut self, sp: u8) {
        self.in_flight = true;
        self.captured_sp = sp;
    }

    /// Clear the in-flight mark once the stack has unwound to where it was
    /// when the NMI was taken. Returns true if this call cleared it.
    pub fn finish(&mut self, sp: u8) -> bool {
        if self.in_flight && sp == self.captured_sp {
            self.in_flight = false;
            return true;
        }
        false
    }
}

/// Counts CPU cycles toward the next vblank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VblankTimer {
    elapsed: u64,
    threshold: u64,
}

impl VblankTimer {
    #[must_use]
    pub const fn new(threshold: u64) -> Self {
        Self {
            elapsed: 0,
            threshold,
        }
    }

    /// Add `cycles`. Returns true, and starts counting again from zero, once
    /// the total exceeds the threshold.
    pub fn advance(&mut self, cycles: u32) -> bool {
        self.elapsed += u64::from(cycles);
        if self.elapsed > self.threshold {
            self.elapsed = 0;
            return true;
        }
        false
    }

    #[must_use]
    pub const fn elapsed(&self) -> u64 {
        self.elapsed
    }

    #[must_use]
    pub const fn threshold(&self) -> u64 {
        self.threshold
    }
}
