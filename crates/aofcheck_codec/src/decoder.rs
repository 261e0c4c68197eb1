//! Sequential decoder for framed command records.

use crate::error::{WireError, WireResult};
use crate::{ARRAY_MARKER, BULK_MARKER, LINE_TERMINATOR};
use std::io::{BufRead, Read};

/// Cap on one `<marker><integer>\r\n` line. The longest legitimate
/// line is a marker, an i64 in decimal, and the terminator; anything
/// longer is corruption and must not be buffered whole.
const LINE_MAX: u64 = 128;

/// A sequential decoder over a framed command log.
///
/// The decoder owns a cursor into the byte source and tracks the number
/// of bytes consumed so far. It never seeks; each call advances the
/// cursor past the bytes it read, whether or not they decoded cleanly.
///
/// # Offsets
///
/// Errors carry the offset at which the failing read *began*, so a
/// reported offset always points at the start of a malformed token,
/// never into the middle of one.
pub struct RecordDecoder<R> {
    input: R,
    offset: u64,
}

impl<R: BufRead> RecordDecoder<R> {
    /// Creates a decoder positioned at offset 0 of `input`.
    pub fn new(input: R) -> Self {
        Self { input, offset: 0 }
    }

    /// Returns the number of bytes consumed so far.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Reads a record header line: `*<N>\r\n`.
    ///
    /// Returns `Ok(None)` if the stream ended before any byte of the
    /// line was read. That is the clean between-records termination;
    /// callers decide whether it is acceptable where it occurred.
    ///
    /// N may be zero or negative in malformed input; the scanner treats
    /// N <= 0 as a record with no arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if the line does not start with `*`, does not
    /// end with `\r\n`, or the source fails.
    pub fn read_argument_count(&mut self) -> WireResult<Option<i64>> {
        self.read_marked_integer(ARRAY_MARKER)
    }

    /// Reads one argument: `$<L>\r\n` followed by L payload bytes and
    /// the terminator. Returns the payload with the terminator stripped.
    ///
    /// # Errors
    ///
    /// Returns an error on bad framing, on a short read (fewer than
    /// L+2 bytes left in the stream), or if the stream ends before the
    /// length line. End-of-stream is never clean inside a record.
    pub fn read_argument(&mut self) -> WireResult<Vec<u8>> {
        let start = self.offset;
        let Some(len) = self.read_marked_integer(BULK_MARKER)? else {
            return Err(WireError::UnexpectedEof { offset: start });
        };
        self.read_payload(len)
    }

    /// Reads one `<marker><integer>\r\n` line.
    fn read_marked_integer(&mut self, marker: u8) -> WireResult<Option<i64>> {
        let start = self.offset;
        let line = self.read_line(start)?;
        if line.is_empty() {
            return Ok(None);
        }
        if line[0] != marker {
            return Err(WireError::MarkerMismatch {
                offset: start,
                expected: marker as char,
                found: line[0] as char,
            });
        }
        let (value, rest) = parse_decimal(&line[1..]);
        if rest != LINE_TERMINATOR {
            return Err(WireError::TrailingGarbage {
                offset: start,
                found: rest.to_vec(),
            });
        }
        Ok(Some(value))
    }

    /// Reads exactly `declared + 2` bytes and checks the terminator.
    fn read_payload(&mut self, declared: i64) -> WireResult<Vec<u8>> {
        let start = self.offset;
        // The terminator is read together with the payload.
        let wanted = declared.saturating_add(2);
        if declared < 0 {
            return Err(WireError::UnderflowRead {
                offset: start,
                expected: wanted,
                actual: 0,
            });
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let wanted = wanted as usize;

        // The declared length is untrusted; let the buffer grow with
        // the bytes actually present instead of allocating it up front,
        // so a short stream fails before a huge allocation can.
        let mut buf = Vec::new();
        let filled = (&mut self.input)
            .take(wanted as u64)
            .read_to_end(&mut buf)
            .map_err(|source| WireError::Io { offset: start, source })?;
        self.offset += filled as u64;

        if filled < wanted {
            return Err(WireError::UnderflowRead {
                offset: start,
                expected: wanted as i64,
                actual: filled as i64,
            });
        }
        if &buf[wanted - 2..] != LINE_TERMINATOR {
            return Err(WireError::TrailingGarbage {
                offset: start,
                found: buf[wanted - 2..].to_vec(),
            });
        }
        buf.truncate(wanted - 2);
        Ok(buf)
    }

    /// Reads up to and including the next `\n`, holding at most
    /// [`LINE_MAX`] bytes. An empty result means the stream ended
    /// before the line started. A capped read cannot contain `\n`, so
    /// the caller's terminator check rejects it.
    fn read_line(&mut self, start: u64) -> WireResult<Vec<u8>> {
        let mut line = Vec::new();
        match (&mut self.input).take(LINE_MAX).read_until(b'\n', &mut line) {
            Ok(n) => {
                self.offset += n as u64;
                Ok(line)
            }
            Err(source) => Err(WireError::Io { offset: start, source }),
        }
    }
}

/// Parses an optional `-` sign followed by decimal digits, `strtol`
/// style: zero digits parse as 0, and the unparsed remainder is
/// returned alongside the value. Overflow saturates.
fn parse_decimal(bytes: &[u8]) -> (i64, &[u8]) {
    let mut rest = bytes;
    let mut negative = false;
    if let Some((&b'-', tail)) = rest.split_first() {
        negative = true;
        rest = tail;
    }
    let mut value: i64 = 0;
    while let Some((&b, tail)) = rest.split_first() {
        if !b.is_ascii_digit() {
            break;
        }
        value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
        rest = tail;
    }
    (if negative { -value } else { value }, rest)
}
