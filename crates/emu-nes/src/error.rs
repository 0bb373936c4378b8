//! Machine-level errors.

use std::io;
use std::time::Duration;

use emu_core::BusError;
use mos_6502::CpuError;
use nes_cartridge::CartridgeError;
use thiserror::Error;

/// Anything that stops the machine.
#[derive(Debug, Error)]
pub enum NesError {
    /// The ROM image was rejected. The previous machine state is intact.
    #[error(transparent)]
    Cartridge(#[from] CartridgeError),

    /// The CPU hit a fatal condition; the machine must not be stepped again.
    #[error(transparent)]
    Cpu(#[from] CpuError),

    #[error(transparent)]
    Bus(#[from] BusError),

    /// The program never settled into its idle loop.
    #[error("no idle loop after {instructions} instructions ({elapsed:?})")]
    LoadTimeout {
        elapsed: Duration,
        instructions: u64,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
