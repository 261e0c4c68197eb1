//! # aofcheck codec
//!
//! Encoding and decoding of the framed command-array wire format used
//! by append-only command logs (AOF).
//!
//! ## Wire format
//!
//! A log is a flat sequence of records. Each record is an array header
//! followed by length-prefixed arguments:
//!
//! ```text
//! *<N>\r\n                 record with N arguments
//! $<len>\r\n<bytes>\r\n    one argument, repeated N times
//! ```
//!
//! Integers are ASCII decimal; every line ends with `\r\n`. Argument
//! payloads are raw bytes and may themselves contain `\r\n`.
//!
//! ## Usage
//!
//! ```
//! use aofcheck_codec::{encode_record, RecordDecoder};
//!
//! let bytes = encode_record(&[b"SET".as_slice(), b"key", b"value"]);
//! let mut decoder = RecordDecoder::new(&bytes[..]);
//!
//! assert_eq!(decoder.read_argument_count().unwrap(), Some(3));
//! assert_eq!(decoder.read_argument().unwrap(), b"SET");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decoder;
mod encoder;
mod error;

pub use decoder::RecordDecoder;
pub use encoder::{encode_record, RecordEncoder};
pub use error::{WireError, WireResult};

/// Framing character introducing a record's argument-count line.
pub const ARRAY_MARKER: u8 = b'*';

/// Framing character introducing an argument's length line.
pub const BULK_MARKER: u8 = b'$';

/// Canonical line terminator.
pub const LINE_TERMINATOR: &[u8] = b"\r\n";
