//! iNES header decoding.

use crate::CartridgeError;

/// "NES" followed by MS-DOS end-of-file.
pub const INES_MAGIC: [u8; 4] = *b"NES\x1a";
pub const HEADER_SIZE: usize = 16;
pub const TRAINER_SIZE: usize = 512;

/// Nametable mirroring mode wired by the cartridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mirroring {
    /// $2000 = $2400, $2800 = $2C00 (vertical arrangement).
    Horizontal,
    /// $2000 = $2800, $2400 = $2C00 (horizontal arrangement).
    Vertical,
    /// Cartridge supplies the extra nametable RAM; no mirroring.
    FourScreen,
}

/// Parsed iNES file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Number of 16K PRG ROM banks.
    pub prg_banks: u8,
    /// Number of 8K CHR ROM banks. Zero means the board has CHR RAM.
    pub chr_banks: u8,
    pub mapper: u8,
    pub mirroring: Mirroring,
    pub has_battery: bool,
    pub has_trainer: bool,
}

impl Header {
    /// Decode the first 16 bytes of an iNES image.
    pub fn parse(data: &[u8]) -> Result<Self, CartridgeError> {
        if data.len() < HEADER_SIZE {
            return Err(CartridgeError::InvalidRomFormat(format!(
                "header too short: {} bytes",
                data.len()
            )));
        }
        if data[0..4] != INES_MAGIC {
            return Err(CartridgeError::InvalidRomFormat(
                "missing NES\\x1A magic".to_string(),
            ));
        }

        let flags6 = data[6];
        let flags7 = data[7];

        let mirroring = if flags6 & 0x08 != 0 {
            Mirroring::FourScreen
        } else if flags6 & 0x01 != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };

        Ok(Self {
            prg_banks: data[4],
            chr_banks: data[5],
            mapper: (flags7 & 0xF0) | (flags6 >> 4),
            mirroring,
            has_battery: flags6 & 0x02 != 0,
            has_trainer: flags6 & 0x04 != 0,
        })
    }
}
