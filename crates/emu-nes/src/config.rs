//! NES configuration.

use std::time::Duration;

/// Video region; sets the vblank cadence.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "native", derive(clap::ValueEnum))]
pub enum NesRegion {
    /// NTSC: 60 Hz, 1,789,773 Hz CPU.
    #[default]
    Ntsc,
    /// PAL: 50 Hz, 1,662,607 Hz CPU.
    Pal,
}

impl NesRegion {
    /// CPU frequency in Hz.
    #[must_use]
    pub const fn cpu_hz(self) -> u32 {
        match self {
            Self::Ntsc => 1_789_773,
            Self::Pal => 1_662_607,
        }
    }

    /// CPU cycles per video frame, rounded up.
    ///
    /// NTSC: 341 × 262 PPU dots / 3 = 29,780.67. PAL: 341 × 312 dots / 3.2
    /// = 33,247.5.
    #[must_use]
    pub const fn cpu_cycles_per_frame(self) -> u64 {
        match self {
            Self::Ntsc => 29_781,
            Self::Pal => 33_248,
        }
    }
}

/// Number of trace entries kept unless configured otherwise.
pub const DEFAULT_TRACE_DEPTH: usize = 100;

/// Wall-clock budget for [`crate::Nes::run_until_idle`] unless configured
/// otherwise.
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(5);

/// NES configuration.
#[derive(Debug, Clone)]
pub struct NesConfig {
    /// iNES file contents.
    pub rom_data: Vec<u8>,
    /// Video region (NTSC or PAL). Defaults to NTSC.
    pub region: NesRegion,
    /// Executed instructions kept in the trace ring.
    pub trace_depth: usize,
    /// Budget for running a freshly loaded program to its idle loop.
    pub load_timeout: Duration,
}

impl NesConfig {
    /// NTSC configuration with default trace depth and timeout.
    #[must_use]
    pub fn new(rom_data: Vec<u8>) -> Self {
        Self {
            rom_data,
            region: NesRegion::default(),
            trace_depth: DEFAULT_TRACE_DEPTH,
            load_timeout: DEFAULT_LOAD_TIMEOUT,
        }
    }
}
