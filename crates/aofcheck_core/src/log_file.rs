//! On-disk handle for an append-only command log.

use crate::error::{CoreError, CoreResult};
use crate::scanner::{scan, ScanReport};
use std::fs::OpenOptions;
use std::io::{BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// An append-only command log opened for validation and repair.
///
/// The file is opened read+write so a later [`LogFile::truncate_to`]
/// can act on the same descriptor, but nothing is written unless
/// truncation is explicitly requested. A missing file is an error;
/// this handle never creates logs.
#[derive(Debug)]
pub struct LogFile {
    path: PathBuf,
    file: std::fs::File,
}

impl LogFile {
    /// Opens an existing log file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be opened
    /// read+write.
    pub fn open(path: &Path) -> CoreResult<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Returns the path this log was opened from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the current file length in bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the file metadata cannot be read.
    pub fn len(&self) -> CoreResult<u64> {
        Ok(self.file.metadata()?.len())
    }

    /// Whether the log is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the file metadata cannot be read.
    pub fn is_empty(&self) -> CoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Runs one full validation pass over the log.
    ///
    /// # Errors
    ///
    /// Returns an error only if rewinding the file fails; structural
    /// problems found in the log are reported inside the [`ScanReport`].
    pub fn scan(&mut self) -> CoreResult<ScanReport> {
        self.file.seek(SeekFrom::Start(0))?;
        Ok(scan(BufReader::new(&mut self.file)))
    }

    /// Truncates the log to `offset` bytes and syncs the result.
    ///
    /// This discards every byte at or beyond `offset`. Callers are
    /// expected to pass the `valid_up_to` offset of a completed scan.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::TruncateBeyondEnd`] if `offset` is past the
    /// current end, or an I/O error if the filesystem operation fails.
    /// On failure no partial truncation is assumed to have occurred.
    pub fn truncate_to(&mut self, offset: u64) -> CoreResult<()> {
        let len = self.len()?;
        if offset > len {
            return Err(CoreError::TruncateBeyondEnd { offset, len });
        }
        self.file.set_len(offset)?;
        self.file.sync_all()?;
        tracing::info!(path = %self.path.display(), from = len, to = offset, "truncated log");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_log(dir: &tempfile::TempDir, bytes: &[u8]) -> PathBuf {
        let path = dir.path().join("test.aof");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(bytes).unwrap();
        path
    }

    #[test]
    fn open_missing_file_fails() {
        let dir = tempdir().unwrap();
        let result = LogFile::open(&dir.path().join("absent.aof"));
        assert!(matches!(result, Err(CoreError::Io(_))));
    }

    #[test]
    fn len_and_is_empty() {
        let dir = tempdir().unwrap();
        let path = write_log(&dir, b"*1\r\n$4\r\nPING\r\n");
        let log = LogFile::open(&path).unwrap();
        assert_eq!(log.len().unwrap(), 14);
        assert!(!log.is_empty().unwrap());
    }

    #[test]
    fn scan_clean_file() {
        let dir = tempdir().unwrap();
        let path = write_log(&dir, b"*1\r\n$4\r\nPING\r\n");
        let mut log = LogFile::open(&path).unwrap();
        let report = log.scan().unwrap();
        assert!(report.is_clean(log.len().unwrap()));
    }

    #[test]
    fn scan_rewinds_each_time() {
        let dir = tempdir().unwrap();
        let path = write_log(&dir, b"*1\r\n$4\r\nPING\r\n");
        let mut log = LogFile::open(&path).unwrap();
        let first = log.scan().unwrap();
        let second = log.scan().unwrap();
        assert_eq!(first.valid_up_to, second.valid_up_to);
        assert_eq!(first.records, second.records);
    }

    #[test]
    fn truncate_discards_trailing_garbage() {
        let dir = tempdir().unwrap();
        let path = write_log(&dir, b"*1\r\n$4\r\nPING\r\ngarbage");
        let mut log = LogFile::open(&path).unwrap();

        let report = log.scan().unwrap();
        assert!(report.error.is_some());
        assert_eq!(report.valid_up_to, 14);

        log.truncate_to(report.valid_up_to).unwrap();
        assert_eq!(log.len().unwrap(), 14);
        assert_eq!(std::fs::read(&path).unwrap(), b"*1\r\n$4\r\nPING\r\n");
    }

    #[test]
    fn truncate_beyond_end_rejected() {
        let dir = tempdir().unwrap();
        let path = write_log(&dir, b"abc");
        let mut log = LogFile::open(&path).unwrap();
        let result = log.truncate_to(100);
        assert!(matches!(
            result,
            Err(CoreError::TruncateBeyondEnd { offset: 100, len: 3 })
        ));
        assert_eq!(log.len().unwrap(), 3);
    }
}
