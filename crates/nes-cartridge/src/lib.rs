//! iNES cartridge parser.
//!
//! Parses the iNES file format (16-byte header, optional 512-byte trainer,
//! PRG ROM, CHR ROM) into fixed-size banks. Only NROM (mapper 0) images are
//! accepted: the NES crate maps the first two PRG banks straight into the
//! cartridge window and never switches banks.

mod banks;
mod error;
mod header;

pub use banks::{Banks, CHR_BANK_SIZE, ChrBank, PRG_BANK_SIZE, PrgBank};
pub use error::CartridgeError;
pub use header::{HEADER_SIZE, Header, INES_MAGIC, Mirroring, TRAINER_SIZE};

/// A parsed mapper-0 cartridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cartridge {
    pub header: Header,
    pub banks: Banks,
}

impl Cartridge {
    /// Parse a complete iNES image.
    ///
    /// # Errors
    ///
    /// [`CartridgeError::InvalidRomFormat`] for a bad magic number, a
    /// truncated image or an image with no PRG banks;
    /// [`CartridgeError::UnsupportedMapper`] for anything but mapper 0.
    pub fn from_bytes(data: &[u8]) -> Result<Self, CartridgeError> {
        let header = Header::parse(data)?;
        if header.mapper != 0 {
            return Err(CartridgeError::UnsupportedMapper(header.mapper));
        }
        let banks = Banks::slice(&header, &data[HEADER_SIZE..])?;
        log::info!(
            "cartridge: {} PRG x 16K, {} CHR x 8K, {:?} mirroring{}{}",
            header.prg_banks,
            header.chr_banks,
            header.mirroring,
            if header.has_battery { ", battery" } else { "" },
            if header.has_trainer { ", trainer" } else { "" },
        );
        Ok(Self { header, banks })
    }
}
