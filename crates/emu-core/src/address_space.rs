//! A 64K address space whose mirroring topology is plain data.
//!
//! Each address carries a stored byte and a [`Route`]. A mirrored address
//! never owns storage of its own: it redirects to another address, so a
//! write through any alias is visible through every other alias in its
//! group. Port routes name a device register that the owning machine
//! interprets; the space itself only stores the last byte written there.
//!
//! Wiring happens once, at construction. Installing a mirror never touches
//! stored bytes.

use std::fmt;

use crate::bus::{Bus, BusError, check_address};

/// Number of addressable cells.
pub const ADDRESS_SPACE_SIZE: usize = 0x1_0000;

/// How an address is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<P> {
    /// Ordinary storage.
    Plain,
    /// Alias of another address.
    MirrorOf(u16),
    /// Device register with machine-specific behavior.
    Port(P),
}

/// The result of decoding an address: the canonical address that owns the
/// storage, and whether a port sits there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access<P> {
    Plain(u16),
    Port(u16, P),
}

impl<P: Copy> Access<P> {
    /// Canonical address that owns the storage.
    #[must_use]
    pub fn address(self) -> u16 {
        match self {
            Access::Plain(addr) | Access::Port(addr, _) => addr,
        }
    }
}

/// Port kind for spaces without device registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoPorts {}

/// 64K cells of storage plus their routes.
#[derive(Clone)]
pub struct AddressSpace<P> {
    storage: Box<[u8]>,
    routes: Box<[Route<P>]>,
}

impl<P: Copy> Default for AddressSpace<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Copy> AddressSpace<P> {
    /// Every address plain, every byte zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: vec![0; ADDRESS_SPACE_SIZE].into_boxed_slice(),
            routes: vec![Route::Plain; ADDRESS_SPACE_SIZE].into_boxed_slice(),
        }
    }

    /// Route installed at `addr`.
    #[must_use]
    pub fn route(&self, addr: u16) -> Route<P> {
        self.routes[usize::from(addr)]
    }

    /// Follow mirror links until reaching the address that owns storage.
    #[must_use]
    pub fn canonical(&self, addr: u16) -> u16 {
        let mut current = addr;
        // Links always point at an address that was canonical when the link
        // was installed, so the chain is acyclic.
        while let Route::MirrorOf(target) = self.routes[usize::from(current)] {
            current = target;
        }
        current
    }

    /// Make `alias` an alias of `target`.
    ///
    /// The target is resolved to its canonical address first, so aliasing an
    /// alias joins the same group. Aliasing an address to itself is a no-op,
    /// which keeps repeated wiring idempotent.
    pub fn mirror(&mut self, alias: u16, target: u16) {
        let canonical = self.canonical(target);
        if canonical == alias {
            return;
        }
        self.routes[usize::from(alias)] = Route::MirrorOf(canonical);
    }

    /// Alias `len` consecutive addresses starting at `alias_start` onto the
    /// block starting at `target_start`.
    pub fn mirror_block(
        &mut self,
        alias_start: u16,
        target_start: u16,
        len: usize,
    ) -> Result<(), BusError> {
        let alias_end = usize::from(alias_start) + len;
        let target_end = usize::from(target_start) + len;
        for end in [alias_end, target_end] {
            if end > ADDRESS_SPACE_SIZE {
                return Err(BusError::AddressOutOfRange { address: end as u32 - 1 });
            }
        }
        for offset in 0..len as u16 {
            self.mirror(alias_start + offset, target_start + offset);
        }
        Ok(())
    }

    /// Repeat the `period`-byte block at `base` through `last` (inclusive).
    ///
    /// `$0000-$07FF` repeated through `$1FFF` gives three extra copies of
    /// internal RAM at `+$0800`, `+$1000` and `+$1800`.
    pub fn mirror_repeating(&mut self, base: u16, period: u16, last: u16) {
        if period == 0 || last < base {
            return;
        }
        let mut addr = u32::from(base) + u32::from(period);
        while addr <= u32::from(last) {
            let offset = (addr - u32::from(base)) % u32::from(period);
            self.mirror(addr as u16, base + offset as u16);
            addr += 1;
        }
    }

    /// Install a device port at `addr`.
    pub fn set_port(&mut self, addr: u16, port: P) {
        self.routes[usize::from(addr)] = Route::Port(port);
    }

    /// Decode a bus address.
    pub fn resolve(&self, address: u32) -> Result<Access<P>, BusError> {
        let canonical = self.canonical(check_address(address)?);
        Ok(match self.routes[usize::from(canonical)] {
            Route::Port(port) => Access::Port(canonical, port),
            Route::Plain | Route::MirrorOf(_) => Access::Plain(canonical),
        })
    }

    /// Stored byte behind `address`, ignoring any port behavior.
    pub fn peek(&self, address: u32) -> Result<u8, BusError> {
        let canonical = self.canonical(check_address(address)?);
        Ok(self.storage[usize::from(canonical)])
    }

    /// Overwrite the stored byte behind `address`, ignoring any port behavior.
    pub fn poke(&mut self, address: u32, value: u8) -> Result<(), BusError> {
        let canonical = self.canonical(check_address(address)?);
        self.storage[usize::from(canonical)] = value;
        Ok(())
    }

    /// Copy `bytes` into storage starting at `start`.
    pub fn load(&mut self, start: u16, bytes: &[u8]) -> Result<(), BusError> {
        let end = usize::from(start) + bytes.len();
        if end > ADDRESS_SPACE_SIZE {
            return Err(BusError::AddressOutOfRange { address: end as u32 - 1 });
        }
        for (offset, &byte) in bytes.iter().enumerate() {
            self.poke(u32::from(start) + offset as u32, byte)?;
        }
        Ok(())
    }

    /// Every address that shares storage with `addr`, in ascending order.
    #[must_use]
    pub fn aliases_of(&self, addr: u16) -> Vec<u16> {
        let canonical = self.canonical(addr);
        (0..=u16::MAX)
            .filter(|&a| self.canonical(a) == canonical)
            .collect()
    }
}

impl<P: Copy> Bus for AddressSpace<P> {
    fn read(&mut self, address: u32) -> Result<u8, BusError> {
        self.peek(address)
    }

    fn write(&mut self, address: u32, value: u8) -> Result<(), BusError> {
        self.poke(address, value)
    }
}

impl<P: Copy> fmt::Debug for AddressSpace<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mirrored = self
            .routes
            .iter()
            .filter(|r| matches!(r, Route::MirrorOf(_)))
            .count();
        let ports = self
            .routes
            .iter()
            .filter(|r| matches!(r, Route::Port(_)))
            .count();
        f.debug_struct("AddressSpace")
            .field("mirrored", &mirrored)
            .field("ports", &ports)
            .finish_non_exhaustive()
    }
}
