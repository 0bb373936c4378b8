//! Memory and I/O bus interface.

use thiserror::Error;

/// Failure to reach a bus address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BusError {
    /// The address lies outside the 16-bit address space. This is always a
    /// bug in the caller, never something a running program can cause.
    #[error("address ${address:X} is outside $0000-$FFFF")]
    AddressOutOfRange { address: u32 },
}

/// Memory and I/O bus interface.
///
/// Components access memory and peripherals through this trait. The bus
/// handles address decoding and routing to the appropriate device.
///
/// Addresses are passed as `u32` so that an out-of-range access is a
/// reportable error rather than a silent wrap.
pub trait Bus {
    /// Read a byte from the given address.
    ///
    /// Reads may have side effects (e.g. a controller port shifts).
    fn read(&mut self, address: u32) -> Result<u8, BusError>;

    /// Write a byte to the given address.
    fn write(&mut self, address: u32, value: u8) -> Result<(), BusError>;
}

/// Narrow a bus address to 16 bits, rejecting anything above `$FFFF`.
pub fn check_address(address: u32) -> Result<u16, BusError> {
    u16::try_from(address).map_err(|_| BusError::AddressOutOfRange { address })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_address_accepts_full_range() {
        assert_eq!(check_address(0), Ok(0));
        assert_eq!(check_address(0xFFFF), Ok(0xFFFF));
    }

    #[test]
    fn check_address_rejects_overflow() {
        assert_eq!(
            check_address(0x1_0000),
            Err(BusError::AddressOutOfRange { address: 0x1_0000 })
        );
    }
}
