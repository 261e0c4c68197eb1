//! Error types for log scanning and repair.

use aofcheck_codec::WireError;
use std::io;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// The structural violation that stopped a scan.
///
/// A scan surfaces at most one of these: the first failure encountered
/// during the forward pass. The offset always names the record in which
/// the failure occurred, never a position inside a partially decoded
/// record.
#[derive(Debug, Error)]
pub enum ScanError {
    /// A record failed to decode.
    #[error(transparent)]
    Wire(#[from] WireError),

    /// A `MULTI` record arrived while a transaction was already open.
    #[error("{offset:#010x}: unexpected MULTI")]
    UnexpectedMulti {
        /// Offset of the offending record.
        offset: u64,
    },

    /// An `EXEC` record arrived with no transaction open.
    #[error("{offset:#010x}: unexpected EXEC")]
    UnexpectedExec {
        /// Offset of the offending record.
        offset: u64,
    },

    /// The stream ended with a transaction still open.
    #[error("{offset:#010x}: reached EOF before reading EXEC for MULTI")]
    UnterminatedTransaction {
        /// Offset of the `MULTI` record that was never closed.
        offset: u64,
    },
}

impl ScanError {
    /// Returns the offset of the record in which the failure occurred.
    #[must_use]
    pub fn offset(&self) -> u64 {
        match self {
            Self::Wire(e) => e.offset(),
            Self::UnexpectedMulti { offset }
            | Self::UnexpectedExec { offset }
            | Self::UnterminatedTransaction { offset } => *offset,
        }
    }
}

/// Errors from operations on the log file itself.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Attempted to truncate the log past its current end.
    #[error("cannot truncate to {offset} bytes: log is only {len} bytes")]
    TruncateBeyondEnd {
        /// The requested truncation offset.
        offset: u64,
        /// The current file length.
        len: u64,
    },
}
