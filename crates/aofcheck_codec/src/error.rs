//! Error types for the codec crate.

use thiserror::Error;

/// Result type for wire format operations.
pub type WireResult<T> = Result<T, WireError>;

/// Errors that can occur while decoding framed records.
///
/// Every variant carries the stream offset at which the failing read
/// began, so callers can report exactly where the log went bad.
#[derive(Debug, Error)]
pub enum WireError {
    /// The line did not start with the expected framing character.
    #[error("{offset:#010x}: expected prefix '{expected}', got '{found}'")]
    MarkerMismatch {
        /// Offset of the start of the line.
        offset: u64,
        /// The framing character that was required.
        expected: char,
        /// The character actually found.
        found: char,
    },

    /// The canonical `\r\n` line terminator was missing or wrong.
    #[error("{offset:#010x}: expected \\r\\n terminator, got: {found:02x?}")]
    TrailingGarbage {
        /// Offset of the start of the token the terminator belongs to.
        offset: u64,
        /// The bytes found where `\r\n` was required.
        found: Vec<u8>,
    },

    /// Fewer bytes were available than the declared length required.
    #[error("{offset:#010x}: expected to read {expected} bytes, got {actual} bytes")]
    UnderflowRead {
        /// Offset at which the payload read began.
        offset: u64,
        /// Number of bytes the declared length called for.
        expected: i64,
        /// Number of bytes actually available.
        actual: i64,
    },

    /// The stream ended where more of a record was required.
    #[error("{offset:#010x}: unexpected end of stream")]
    UnexpectedEof {
        /// Offset at which the read began.
        offset: u64,
    },

    /// The underlying byte source failed.
    #[error("{offset:#010x}: i/o error: {source}")]
    Io {
        /// Offset at which the read began.
        offset: u64,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl WireError {
    /// Returns the stream offset at which the failing read began.
    #[must_use]
    pub fn offset(&self) -> u64 {
        match self {
            Self::MarkerMismatch { offset, .. }
            | Self::TrailingGarbage { offset, .. }
            | Self::UnderflowRead { offset, .. }
            | Self::UnexpectedEof { offset }
            | Self::Io { offset, .. } => *offset,
        }
    }
}
