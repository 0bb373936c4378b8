//! Fixed-size PRG and CHR banks.

use crate::{CartridgeError, Header, TRAINER_SIZE};

/// PRG ROM bank size (16 KB).
pub const PRG_BANK_SIZE: usize = 16 * 1024;
/// CHR ROM bank size (8 KB).
pub const CHR_BANK_SIZE: usize = 8 * 1024;

pub type PrgBank = Box<[u8; PRG_BANK_SIZE]>;
pub type ChrBank = Box<[u8; CHR_BANK_SIZE]>;

/// Cartridge ROM, split into banks once at load and never resized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banks {
    prg: Vec<PrgBank>,
    chr: Vec<ChrBank>,
}

fn chunks<const N: usize>(data: &[u8], count: usize) -> Vec<Box<[u8; N]>> {
    data.chunks_exact(N)
        .take(count)
        .map(|chunk| {
            let mut bank = Box::new([0u8; N]);
            bank.copy_from_slice(chunk);
            bank
        })
        .collect()
}

impl Banks {
    /// Slice the bytes after the header into banks, skipping any trainer.
    pub fn slice(header: &Header, body: &[u8]) -> Result<Self, CartridgeError> {
        if header.prg_banks == 0 {
            return Err(CartridgeError::InvalidRomFormat(
                "no PRG ROM banks".to_string(),
            ));
        }

        let prg_start = if header.has_trainer { TRAINER_SIZE } else { 0 };
        let prg_len = usize::from(header.prg_banks) * PRG_BANK_SIZE;
        let chr_start = prg_start + prg_len;
        let chr_len = usize::from(header.chr_banks) * CHR_BANK_SIZE;

        if body.len() < chr_start + chr_len {
            return Err(CartridgeError::InvalidRomFormat(format!(
                "truncated image: need {} bytes after the header, got {}",
                chr_start + chr_len,
                body.len()
            )));
        }

        Ok(Self {
            prg: chunks(&body[prg_start..chr_start], usize::from(header.prg_banks)),
            chr: chunks(
                &body[chr_start..chr_start + chr_len],
                usize::from(header.chr_banks),
            ),
        })
    }

    #[must_use]
    pub fn prg(&self) -> &[PrgBank] {
        &self.prg
    }

    #[must_use]
    pub fn chr(&self) -> &[ChrBank] {
        &self.chr
    }

    /// The banks seen at $8000-$BFFF and $C000-$FFFF. A single bank fills
    /// both halves.
    #[must_use]
    pub fn prg_window(&self) -> [&[u8; PRG_BANK_SIZE]; 2] {
        let lower = &self.prg[0];
        let upper = self.prg.get(1).unwrap_or(lower);
        [&**lower, &**upper]
    }
}
