// src/config.rs
use std::path::PathBuf;

use crate::cli::{Args, OutputFormat, ScanMode};
use crate::error::{Result, ScanError};
use crate::filter;

/// Top-level configuration derived from CLI arguments, with the root path
/// validated before any traversal begins.
#[derive(Debug, Clone)]
pub struct Config {
    pub root: PathBuf,
    pub mode: ScanMode,
    pub workers: usize,
    pub max_file_size: u64,
    pub follow: bool,
    pub format: OutputFormat,
    pub progress: bool,
}

impl TryFrom<Args> for Config {
    type Error = ScanError;

    fn try_from(args: Args) -> Result<Self> {
        let root = validate_root(args.path)?;
        let workers = args
            .workers
            .unwrap_or_else(|| default_workers(args.mode))
            .max(1);
        Ok(Self {
            root,
            mode: args.mode,
            workers,
            max_file_size: args
                .max_size
                .map_or(filter::DEFAULT_MAX_FILE_SIZE, |s| s.0),
            follow: args.follow,
            format: args.format,
            progress: args.progress,
        })
    }
}

fn validate_root(path: PathBuf) -> Result<PathBuf> {
    let resolved = std::fs::canonicalize(&path).map_err(|e| ScanError::InvalidRoot {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    if !resolved.is_dir() {
        return Err(ScanError::InvalidRoot {
            path,
            reason: "not a directory".to_string(),
        });
    }
    Ok(resolved)
}

/// Process workers default to one per core; thread workers oversubscribe
/// since their batches are mostly I/O-bound.
fn default_workers(mode: ScanMode) -> usize {
    let cpus = num_cpus::get().max(1);
    match mode {
        ScanMode::Thread => (cpus * 2).min(32),
        ScanMode::Process | ScanMode::Serial => cpus,
    }
}
