// src/cli.rs
use std::path::PathBuf;

use clap::{Parser, ValueEnum, ValueHint};

use crate::parsers::{parse_positive_usize, SizeArg};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScanMode {
    /// Single-threaded baseline scan
    Serial,
    /// Fixed pool of worker threads sharing process memory
    Thread,
    /// Isolated worker processes, one batch per invocation
    Process,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Top-level CLI arguments parsed via clap.
#[derive(Parser, Debug)]
#[command(
    name = "count_loc",
    version = crate::VERSION,
    about = "Count non-empty lines of code across a directory tree, grouped by extension"
)]
pub struct Args {
    /// Directory to analyze
    #[arg(value_hint = ValueHint::DirPath, default_value = ".")]
    pub path: PathBuf,

    /// Execution mode (use processes for large repositories, threads for small ones)
    #[arg(long, value_enum, default_value = "process")]
    pub mode: ScanMode,

    /// Number of workers (default: auto-detect from CPU count)
    #[arg(long, value_parser = parse_positive_usize)]
    pub workers: Option<usize>,

    /// Maximum file size to count (e.g. 10M, 512K); larger files are skipped as likely data
    #[arg(long)]
    pub max_size: Option<SizeArg>,

    /// Follow symbolic links (already-visited directories are pruned)
    #[arg(long)]
    pub follow: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Report progress on stderr while batches complete
    #[arg(long)]
    pub progress: bool,

    /// Run as a process-mode worker: NUL-separated paths on stdin, JSON totals on stdout
    #[arg(long, hide = true)]
    pub worker: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_current_dir_process_table() {
        let args = Args::parse_from(["count_loc"]);
        assert_eq!(args.path, PathBuf::from("."));
        assert_eq!(args.mode, ScanMode::Process);
        assert_eq!(args.format, OutputFormat::Table);
        assert!(args.workers.is_none());
        assert!(!args.follow);
    }

    #[test]
    fn mode_and_workers_parse() {
        let args = Args::parse_from(["count_loc", "--mode", "thread", "--workers", "8", "/tmp"]);
        assert_eq!(args.mode, ScanMode::Thread);
        assert_eq!(args.workers, Some(8));
        assert_eq!(args.path, PathBuf::from("/tmp"));
    }

    #[test]
    fn zero_workers_is_rejected() {
        assert!(Args::try_parse_from(["count_loc", "--workers", "0"]).is_err());
    }

    #[test]
    fn max_size_accepts_suffixes() {
        let args = Args::parse_from(["count_loc", "--max-size", "10K"]);
        assert_eq!(args.max_size.unwrap().0, 10 * 1024);
    }
}
