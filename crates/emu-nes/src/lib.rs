//! Instruction-level NES machine.
//!
//! Wires a [`mos_6502::Mos6502`] to an NES CPU bus (RAM, video register
//! ports, controllers, cartridge PRG) and a video bus (pattern tables,
//! nametables, palette), both built from mirroring tables. There is no
//! pixel pipeline: a cycle-counting timer stands in for the PPU and raises
//! the vblank NMI once per frame.

mod bus;
mod config;
mod controller;
mod error;
mod nes;
mod nmi;
mod trace;
mod video;

pub use bus::{NesBus, OAM_ADDR, PPU_CTRL, PPU_STATUS, Port, VideoLatch};
pub use config::{DEFAULT_LOAD_TIMEOUT, DEFAULT_TRACE_DEPTH, NesConfig, NesRegion};
pub use controller::{Controller, button};
pub use error::NesError;
pub use nes::Nes;
pub use nmi::{NmiController, VblankTimer};
pub use trace::Trace;
pub use video::{VideoBus, video_bus};
