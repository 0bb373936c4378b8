//! Video (PPU) bus wiring.
//!
//! The PPU sees a 14-bit address space:
//! - $0000-$1FFF: pattern tables (CHR bank 0)
//! - $2000-$2FFF: four nametable slots, two of them aliases unless the
//!   cartridge provides four-screen RAM
//! - $3000-$3EFF: mirror of $2000-$2EFF
//! - $3F00-$3F1F: palette RAM, mirrored through $3FFF
//!
//! Addresses $4000-$FFFF fold back onto $0000-$3FFF.

use emu_core::{AddressSpace, BusError, NoPorts};
use nes_cartridge::Mirroring;

pub type VideoBus = AddressSpace<NoPorts>;

const NAMETABLE_SIZE: usize = 0x400;

/// Build the video bus for a cartridge's nametable mirroring.
pub fn video_bus(mirroring: Mirroring) -> Result<VideoBus, BusError> {
    let mut vram = VideoBus::new();

    match mirroring {
        Mirroring::Horizontal => {
            vram.mirror_block(0x2400, 0x2000, NAMETABLE_SIZE)?;
            vram.mirror_block(0x2C00, 0x2800, NAMETABLE_SIZE)?;
        }
        Mirroring::Vertical => {
            vram.mirror_block(0x2800, 0x2000, NAMETABLE_SIZE)?;
            vram.mirror_block(0x2C00, 0x2400, NAMETABLE_SIZE)?;
        }
        Mirroring::FourScreen => {}
    }
    vram.mirror_block(0x3000, 0x2000, 0x0F00)?;

    // Sprite palette entry 0 of each palette is the backdrop colour
    for offset in [0x10, 0x14, 0x18, 0x1C] {
        vram.mirror(0x3F00 + offset, 0x3F00 + offset - 0x10);
    }
    vram.mirror_repeating(0x3F00, 0x20, 0x3FFF);

    vram.mirror_repeating(0x0000, 0x4000, 0xFFFF);
    Ok(vram)
}
