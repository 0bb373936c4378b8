//! MOS 6502 CPU core (NES 2A03 flavour: no decimal arithmetic).
//!
//! Execution is instruction-level. One [`Mos6502::execute`] call fetches an
//! opcode, looks it up in the opcode dictionary, resolves the operand
//! through one of the 13 addressing modes and runs the instruction,
//! returning the realized cycle count.

mod addressing;
mod cpu;
mod error;
pub mod flags;
mod instructions;
mod opcodes;
mod registers;

pub use addressing::{Fetch, Mode, Operand};
pub use cpu::{IRQ_VECTOR, Mos6502, NMI_VECTOR, RESET_VECTOR, STACK_BASE, Step};
pub use error::CpuError;
pub use flags::{AluResult, Status};
pub use instructions::Mnemonic;
pub use opcodes::{Opcode, decode};
pub use registers::{DEFAULT_PC, Registers};
