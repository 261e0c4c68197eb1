//! aofcheck CLI
//!
//! Validates an append-only command log (AOF) and optionally repairs it
//! by truncating trailing corruption.
//!
//! ```text
//! aofcheck appendonly.aof          report whether the log is valid
//! aofcheck --fix appendonly.aof    truncate to the last valid record
//! ```
//!
//! Exit code 0 means the log is valid (or was successfully repaired);
//! anything else means invalid, missing, empty, or a declined repair.

use aofcheck_core::LogFile;
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Check and repair append-only command log files.
#[derive(Parser)]
#[command(name = "aofcheck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Truncate the log to the last valid record (asks for confirmation)
    #[arg(long)]
    fix: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Path to the log file
    path: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(&cli, ask_user) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Scans the log and applies the requested action.
///
/// Returns `Ok(true)` when the log is valid or was repaired, and
/// `Ok(false)` for the non-fatal failure verdicts (invalid log, empty
/// file, declined confirmation). The confirmation callback is only
/// invoked in `--fix` mode when bytes would be discarded.
fn run(
    cli: &Cli,
    confirm: impl FnOnce(&str) -> io::Result<bool>,
) -> Result<bool, Box<dyn std::error::Error>> {
    let mut log = LogFile::open(&cli.path)
        .map_err(|e| format!("Cannot open file: {}: {e}", cli.path.display()))?;

    let size = log.len()?;
    if size == 0 {
        println!("Empty file: {}", cli.path.display());
        return Ok(false);
    }

    let report = log.scan()?;
    tracing::debug!(
        records = report.records,
        valid_up_to = report.valid_up_to,
        size,
        "scan complete"
    );
    if let Some(err) = &report.error {
        println!("{err}");
    }

    let diff = size - report.valid_up_to;
    if diff == 0 {
        println!("AOF is valid");
        return Ok(true);
    }

    if !cli.fix {
        println!("AOF is not valid");
        return Ok(false);
    }

    println!(
        "This will shrink the AOF from {size} bytes, with {diff} bytes, to {} bytes",
        report.valid_up_to
    );
    if !confirm("Continue? [y/N]: ")? {
        println!("Aborting...");
        return Ok(false);
    }

    log.truncate_to(report.valid_up_to)
        .map_err(|e| format!("Failed to truncate AOF: {e}"))?;
    println!("Successfully truncated AOF");
    Ok(true)
}

/// Prompts on stdout and reads one line from stdin; only a leading
/// `y` or `Y` counts as consent.
fn ask_user(prompt: &str) -> io::Result<bool> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(answer.starts_with(['y', 'Y']))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::TempDir;

    fn cli(path: PathBuf, fix: bool) -> Cli {
        Cli {
            fix,
            verbose: false,
            path,
        }
    }

    fn write_log(dir: &TempDir, bytes: &[u8]) -> PathBuf {
        let path = dir.path().join("appendonly.aof");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(bytes).unwrap();
        path
    }

    fn never_asked(_: &str) -> io::Result<bool> {
        panic!("confirmation must not be requested");
    }

    #[test]
    fn valid_log_passes() {
        let dir = TempDir::new().unwrap();
        let path = write_log(&dir, b"*1\r\n$4\r\nPING\r\n");
        assert!(run(&cli(path, false), never_asked).unwrap());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = run(&cli(dir.path().join("absent.aof"), false), never_asked);
        assert!(result.is_err());
    }

    #[test]
    fn empty_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = write_log(&dir, b"");
        assert!(!run(&cli(path, false), never_asked).unwrap());
    }

    #[test]
    fn corrupt_log_fails_without_fix() {
        let dir = TempDir::new().unwrap();
        let path = write_log(&dir, b"*1\r\n$4\r\nPING\r\n*1\r\n$3\r\nXX");
        assert!(!run(&cli(path.clone(), false), never_asked).unwrap());
        // Untouched without --fix.
        assert_eq!(std::fs::read(&path).unwrap().len(), 24);
    }

    #[test]
    fn fix_truncates_after_consent() {
        let dir = TempDir::new().unwrap();
        let path = write_log(&dir, b"*1\r\n$4\r\nPING\r\n*1\r\n$3\r\nXX");
        assert!(run(&cli(path.clone(), true), |_| Ok(true)).unwrap());
        assert_eq!(std::fs::read(&path).unwrap(), b"*1\r\n$4\r\nPING\r\n");
    }

    #[test]
    fn fix_declined_leaves_file_alone() {
        let dir = TempDir::new().unwrap();
        let path = write_log(&dir, b"*1\r\n$4\r\nPING\r\n*1\r\n$3\r\nXX");
        assert!(!run(&cli(path.clone(), true), |_| Ok(false)).unwrap());
        assert_eq!(std::fs::read(&path).unwrap().len(), 24);
    }

    #[test]
    fn fix_on_valid_log_skips_confirmation() {
        let dir = TempDir::new().unwrap();
        let path = write_log(&dir, b"*1\r\n$4\r\nPING\r\n");
        assert!(run(&cli(path, true), never_asked).unwrap());
    }
}
