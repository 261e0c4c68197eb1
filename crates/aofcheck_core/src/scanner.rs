//! Transaction-aware validation loop over a command log.

use crate::error::ScanError;
use aofcheck_codec::RecordDecoder;
use std::io::BufRead;

/// First argument that opens a transaction, compared case-insensitively.
pub const TXN_BEGIN: &[u8] = b"MULTI";

/// First argument that closes a transaction, compared case-insensitively.
pub const TXN_END: &[u8] = b"EXEC";

/// Outcome of one full pass over a command log.
#[derive(Debug)]
pub struct ScanReport {
    /// Offset of the last position known to be structurally valid.
    ///
    /// This only ever advances between transactions, so truncating the
    /// log here can never cut a transaction in half.
    pub valid_up_to: u64,
    /// Number of complete records decoded.
    pub records: u64,
    /// The first failure encountered, if any.
    pub error: Option<ScanError>,
}

impl ScanReport {
    /// Whether the scan covered `total_len` bytes without a failure.
    #[must_use]
    pub fn is_clean(&self, total_len: u64) -> bool {
        self.error.is_none() && self.valid_up_to == total_len
    }
}

/// Scans a command log from start to end.
///
/// Decodes records sequentially, tracking MULTI/EXEC bracketing, and
/// stops at the first structural failure. The scan itself never fails:
/// it always produces a report, with the failure (if any) carried as a
/// value inside it.
///
/// Structural rules enforced:
/// - every record must decode completely,
/// - `MULTI` may not nest and `EXEC` needs a matching `MULTI`,
/// - a transaction opened by `MULTI` must be closed before EOF,
/// - a record with no arguments at the top level ends the scan.
pub fn scan<R: BufRead>(input: R) -> ScanReport {
    let mut decoder = RecordDecoder::new(input);
    let mut in_transaction = false;
    let mut valid_up_to = 0u64;
    let mut records = 0u64;
    let mut error: Option<ScanError> = None;

    loop {
        let record_start = decoder.offset();
        if !in_transaction {
            valid_up_to = record_start;
        }

        let argc = match decoder.read_argument_count() {
            Ok(Some(argc)) => argc,
            // Clean end of stream between records.
            Ok(None) => break,
            Err(e) => {
                error = Some(ScanError::Wire(e));
                break;
            }
        };

        if argc <= 0 {
            // An empty record at the top level means nothing is left
            // to replay; inside a transaction it is skipped.
            if in_transaction {
                records += 1;
                continue;
            }
            break;
        }

        let mut failed = false;
        for i in 0..argc {
            let arg = match decoder.read_argument() {
                Ok(arg) => arg,
                Err(e) => {
                    error = Some(ScanError::Wire(e));
                    failed = true;
                    break;
                }
            };
            if i == 0 {
                if arg.eq_ignore_ascii_case(TXN_BEGIN) {
                    if in_transaction {
                        error = Some(ScanError::UnexpectedMulti {
                            offset: record_start,
                        });
                        failed = true;
                        break;
                    }
                    in_transaction = true;
                } else if arg.eq_ignore_ascii_case(TXN_END) {
                    if !in_transaction {
                        error = Some(ScanError::UnexpectedExec {
                            offset: record_start,
                        });
                        failed = true;
                        break;
                    }
                    in_transaction = false;
                }
            }
        }
        if failed {
            break;
        }
        records += 1;
    }

    // A MULTI left open at a clean EOF is itself a failure; the open
    // record sits exactly at the last good offset.
    if error.is_none() && in_transaction {
        error = Some(ScanError::UnterminatedTransaction { offset: valid_up_to });
    }

    tracing::debug!(
        records,
        valid_up_to,
        failed = error.is_some(),
        "log scan finished"
    );

    ScanReport {
        valid_up_to,
        records,
        error,
    }
}
