//! Encoder for framed command records.

use crate::{ARRAY_MARKER, BULK_MARKER, LINE_TERMINATOR};

/// Encode a single command record.
///
/// Produces `*<N>\r\n` followed by one `$<len>\r\n<bytes>\r\n` frame
/// per argument, byte-identical to what a database server appends to
/// its command log.
pub fn encode_record<A: AsRef<[u8]>>(args: &[A]) -> Vec<u8> {
    let mut encoder = RecordEncoder::new();
    encoder.push_record(args);
    encoder.into_bytes()
}

/// An encoder that accumulates framed records into one buffer.
///
/// Used to build log fixtures and to write repaired logs; the decoder
/// in this crate reproduces the pushed arguments byte-for-byte.
#[derive(Debug, Default)]
pub struct RecordEncoder {
    buffer: Vec<u8>,
}

impl RecordEncoder {
    /// Create a new encoder.
    #[must_use]
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Append one record to the buffer.
    pub fn push_record<A: AsRef<[u8]>>(&mut self, args: &[A]) {
        self.push_line(ARRAY_MARKER, args.len() as i64);
        for arg in args {
            let arg = arg.as_ref();
            self.push_line(BULK_MARKER, arg.len() as i64);
            self.buffer.extend_from_slice(arg);
            self.buffer.extend_from_slice(LINE_TERMINATOR);
        }
    }

    /// Returns the encoded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Number of bytes encoded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether nothing has been encoded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    fn push_line(&mut self, marker: u8, value: i64) {
        self.buffer.push(marker);
        self.buffer.extend_from_slice(value.to_string().as_bytes());
        self.buffer.extend_from_slice(LINE_TERMINATOR);
    }
}
