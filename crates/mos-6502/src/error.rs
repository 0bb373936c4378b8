//! CPU execution errors.

use emu_core::BusError;
use thiserror::Error;

/// Reasons a tick cannot complete.
///
/// All of these are fatal to the running program: the machine state is
/// left as it was at the point of failure and must not be stepped again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CpuError {
    #[error(transparent)]
    Bus(#[from] BusError),

    /// A push with the stack pointer already at `$00`.
    #[error("stack overflow: push with SP=${sp:02X}")]
    StackOverflow { sp: u8 },

    /// A pull with the stack pointer already at `$FF`.
    #[error("stack underflow: pull with SP=${sp:02X}")]
    StackUnderflow { sp: u8 },

    /// A memory-writing instruction was paired with a mode that yields no
    /// effective address. Indicates a broken opcode table.
    #[error("{mnemonic} needs an effective address but {mode} mode supplied none")]
    MissingEffectiveAddress {
        mnemonic: &'static str,
        mode: &'static str,
    },

    /// The byte at PC is not a documented opcode.
    #[error("unknown opcode ${opcode:02X} at ${pc:04X}")]
    UnknownOpcode { opcode: u8, pc: u16 },
}
