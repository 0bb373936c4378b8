use thiserror::Error;

/// Reasons a ROM image cannot be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartridgeError {
    /// The image is not a well-formed iNES file.
    #[error("invalid ROM format: {0}")]
    InvalidRomFormat(String),

    /// The header names a mapper other than NROM.
    #[error("unsupported mapper: {0}")]
    UnsupportedMapper(u8),
}
