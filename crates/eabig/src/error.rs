//! Error types for BIG archive parsing and EAHD coding

use thiserror::Error;

/// Result type for BIG archive and EAHD operations
pub type Result<T> = std::result::Result<T, Error>;

/// BIG archive / EAHD error types
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid BIG magic bytes
    #[error("Invalid BIG magic: expected 'BIGF' or 'BIG4', got {0:?}")]
    InvalidMagic([u8; 4]),

    /// A read reached past the end of the buffer
    #[error("Unexpected end of stream: needed {expected} bytes, {remaining} remain")]
    UnexpectedEof { expected: usize, remaining: usize },

    /// Data handed to the EAHD decoder does not start with `0xFB10`
    #[error("Not an EAHD stream: leading bytes {0:#06x}")]
    NotEahd(u16),

    /// An EAHD copy command reaches before the start of the output
    #[error("Invalid EAHD back-reference: distance {distance} at output position {position}")]
    InvalidBackReference { distance: usize, position: usize },

    /// Input exceeds what the EAHD 3-byte size header can express
    #[error("Input too large for EAHD: {size} bytes exceeds {max}")]
    InputTooLarge { size: usize, max: usize },
}
