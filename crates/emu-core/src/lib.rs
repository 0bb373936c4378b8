//! Core traits and types shared by the emulator crates.
//!
//! Every chip talks to memory through [`Bus`]. Address decoding with
//! hardware mirroring is data, not code: an [`AddressSpace`] maps each of
//! the 65,536 addresses to plain storage, an alias of another address, or
//! a device port that the owning machine interprets.

mod address_space;
mod bus;
mod cpu;
mod observable;

pub use address_space::{Access, AddressSpace, NoPorts, Route, ADDRESS_SPACE_SIZE};
pub use bus::{Bus, BusError, check_address};
pub use cpu::Cpu;
pub use observable::{Observable, Value, parse_address};
