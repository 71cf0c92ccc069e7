//! Fatal, input-validation-class errors surfaced at startup.
//!
//! Recoverable/internal conditions (unimplemented opcode, unimplemented MBC
//! type) are never represented here — they're absorbed and logged per the
//! error taxonomy, not propagated as `Result`s.

use thiserror::Error;

/// Errors that can prevent the emulator from starting at all.
#[derive(Debug, Error)]
pub enum EmulatorError {
    #[error("boot ROM must be exactly 256 bytes, got {actual}")]
    BootRomSize { actual: usize },

    #[error(
        "cartridge ROM size mismatch: header declares {expected} bytes (ROM[0x148]={rom_size_code:#04X}), file is {actual} bytes"
    )]
    CartridgeSizeMismatch {
        expected: usize,
        actual: usize,
        rom_size_code: u8,
    },

    #[error("cartridge image is too small to contain a header (need at least 0x150 bytes, got {actual})")]
    CartridgeTooSmall { actual: usize },

    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),

    #[error("frame rate must be a power of two, got {0}")]
    FrameRateNotPowerOfTwo(u32),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type EmulatorResult<T> = Result<T, EmulatorError>;
