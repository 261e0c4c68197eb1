//! # aofcheck core
//!
//! Validation and repair of append-only command logs (AOF).
//!
//! A log is a flat stream of framed command records (see
//! [`aofcheck_codec`]) with MULTI/EXEC transactional bracketing. The
//! scanner walks the stream once, front to back, and reports the byte
//! offset of the last fully valid position. Trailing bytes beyond that
//! offset are incomplete or corrupt and can be removed with
//! [`LogFile::truncate_to`].
//!
//! ## Usage
//!
//! ```no_run
//! use aofcheck_core::LogFile;
//! use std::path::Path;
//!
//! let mut log = LogFile::open(Path::new("appendonly.aof"))?;
//! let report = log.scan()?;
//! if !report.is_clean(log.len()?) {
//!     // report.valid_up_to is the safe truncation boundary
//! }
//! # Ok::<(), aofcheck_core::CoreError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod log_file;
mod scanner;

pub use error::{CoreError, CoreResult, ScanError};
pub use log_file::LogFile;
pub use scanner::{scan, ScanReport, TXN_BEGIN, TXN_END};
