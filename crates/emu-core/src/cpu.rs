//! CPU core trait.

use crate::Bus;

/// A CPU core that executes whole instructions.
///
/// The bus is passed in, not owned, so the machine can share it with other
/// components between instructions.
pub trait Cpu {
    /// The type used for register inspection.
    type Registers;

    /// The error raised when execution cannot continue.
    type Error;

    /// Execute exactly one instruction. Returns the cycles it consumed.
    fn step<B: Bus>(&mut self, bus: &mut B) -> Result<u32, Self::Error>;

    /// Returns the current program counter.
    fn pc(&self) -> u16;

    /// Returns a snapshot of all registers for inspection.
    fn registers(&self) -> Self::Registers;

    /// Run the non-maskable interrupt entry sequence.
    fn nmi<B: Bus>(&mut self, bus: &mut B) -> Result<(), Self::Error>;

    /// Reset the CPU, loading PC from the reset vector.
    fn reset<B: Bus>(&mut self, bus: &mut B) -> Result<(), Self::Error>;
}
