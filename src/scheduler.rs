// src/scheduler.rs
use std::io::Write;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use crate::cli::ScanMode;
use crate::config::Config;
use crate::counter;
use crate::error::{Result, ScanError};
use crate::stats::{FileRecord, ScanTotals};
use crate::walker::WalkedFile;

/// Cap on the cumulative byte size of one batch. File sizes vary by orders
/// of magnitude, so batches are balanced by bytes as well as file count.
pub const BATCH_BYTE_CAP: u64 = 8 * 1024 * 1024;

/// Coordinator-level abort flag. Set it and no further batches are
/// dispatched; only fully-completed batches are merged.
pub type CancelToken = Arc<AtomicBool>;

/// Partition the file list and dispatch batches to the configured worker
/// pool, merging the partial totals single-threaded on the way back.
pub fn run(files: Vec<WalkedFile>, config: &Config, cancel: &CancelToken) -> Result<ScanTotals> {
    match config.mode {
        ScanMode::Serial => Ok(run_serial(&files, cancel)),
        ScanMode::Thread => run_threads(files, config, cancel),
        ScanMode::Process => run_processes(files, config, cancel),
    }
}

/// Split into contiguous batches capped by count and cumulative bytes.
///
/// Larger batches go to processes to amortize spawn cost; threads get
/// smaller ones for finer load balancing.
pub fn partition(files: Vec<WalkedFile>, workers: usize, mode: ScanMode) -> Vec<Vec<WalkedFile>> {
    let per_batch = match mode {
        ScanMode::Process => (files.len() / (workers * 2)).max(10),
        ScanMode::Thread | ScanMode::Serial => (files.len() / (workers * 4)).max(5),
    };
    let mut batches = Vec::new();
    let mut batch = Vec::new();
    let mut batch_bytes = 0u64;
    for file in files {
        if !batch.is_empty() && (batch.len() >= per_batch || batch_bytes >= BATCH_BYTE_CAP) {
            batches.push(std::mem::take(&mut batch));
            batch_bytes = 0;
        }
        batch_bytes += file.size;
        batch.push(file);
    }
    if !batch.is_empty() {
        batches.push(batch);
    }
    batches
}

/// Count every file in a batch into a local partial. Read failures become
/// skips; they never abort the batch.
pub fn process_batch(batch: &[WalkedFile]) -> ScanTotals {
    let mut totals = ScanTotals::default();
    for file in batch {
        match counter::count_lines(&file.path) {
            Ok(lines) => totals.record(&FileRecord {
                path: file.path.clone(),
                ext: file.ext.clone(),
                lines,
            }),
            Err(e) => {
                eprintln!("[warn] skipping {}: {e}", file.path.display());
                totals.record_skip();
            }
        }
    }
    totals
}

fn run_serial(files: &[WalkedFile], cancel: &CancelToken) -> ScanTotals {
    let mut totals = ScanTotals::default();
    for file in files {
        if cancel.load(Ordering::Relaxed) {
            break;
        }
        totals.merge(process_batch(std::slice::from_ref(file)));
    }
    totals
}

fn run_threads(files: Vec<WalkedFile>, config: &Config, cancel: &CancelToken) -> Result<ScanTotals> {
    let batches = partition(files, config.workers, ScanMode::Thread);
    let progress = Progress::new(config.progress, batches.len());
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .build()?;
    let partials: Vec<ScanTotals> = pool.install(|| {
        batches
            .par_iter()
            .filter_map(|batch| {
                if cancel.load(Ordering::Relaxed) {
                    return None;
                }
                let totals = process_batch(batch);
                progress.tick();
                Some(totals)
            })
            .collect()
    });
    let mut totals = ScanTotals::default();
    for partial in partials {
        totals.merge(partial);
    }
    Ok(totals)
}

fn run_processes(
    files: Vec<WalkedFile>,
    config: &Config,
    cancel: &CancelToken,
) -> Result<ScanTotals> {
    let batches = partition(files, config.workers, ScanMode::Process);
    let progress = Progress::new(config.progress, batches.len());
    let exe = std::env::current_exe().map_err(|e| ScanError::WorkerStartup {
        details: format!("cannot locate own executable: {e}"),
    })?;

    let mut totals = ScanTotals::default();
    let mut running: Vec<(Child, usize)> = Vec::new();
    let mut spawned_any = false;

    for batch in &batches {
        if cancel.load(Ordering::Relaxed) {
            break;
        }
        // Fixed-size pool: wait for the oldest child before exceeding it.
        while running.len() >= config.workers {
            let (child, len) = running.remove(0);
            merge_child(child, len, &mut totals, &progress);
        }
        match spawn_worker(&exe, batch) {
            Ok(child) => {
                spawned_any = true;
                running.push((child, batch.len()));
            }
            Err(e) if !spawned_any && running.is_empty() => {
                return Err(ScanError::WorkerStartup {
                    details: e.to_string(),
                });
            }
            Err(e) => {
                eprintln!(
                    "[warn] worker spawn failed, skipping batch of {}: {e}",
                    batch.len()
                );
                totals.skipped_files += batch.len();
            }
        }
    }
    for (child, len) in running {
        merge_child(child, len, &mut totals, &progress);
    }
    Ok(totals)
}

/// Re-execute this binary in hidden worker mode and hand it the batch as
/// NUL-separated paths on stdin. The child reads all of stdin before writing
/// anything back, so writing here cannot deadlock against its output.
fn spawn_worker(exe: &Path, batch: &[WalkedFile]) -> std::io::Result<Child> {
    let mut child = Command::new(exe)
        .arg("--worker")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()?;
    if let Some(mut stdin) = child.stdin.take() {
        if let Err(e) = write_batch(&mut stdin, batch) {
            let _ = child.kill();
            let _ = child.wait();
            return Err(e);
        }
    }
    Ok(child)
}

fn write_batch(stdin: &mut impl Write, batch: &[WalkedFile]) -> std::io::Result<()> {
    for file in batch {
        stdin.write_all(file.path.to_string_lossy().as_bytes())?;
        stdin.write_all(&[0])?;
    }
    Ok(())
}

/// Collect one child's partial. A worker that dies or returns garbage costs
/// only its own batch, tallied as skips.
fn merge_child(child: Child, batch_len: usize, totals: &mut ScanTotals, progress: &Progress) {
    match child.wait_with_output() {
        Ok(out) if out.status.success() => match serde_json::from_slice::<ScanTotals>(&out.stdout)
        {
            Ok(partial) => {
                totals.merge(partial);
                progress.tick();
            }
            Err(e) => {
                eprintln!("[warn] worker result unreadable, skipping batch of {batch_len}: {e}");
                totals.skipped_files += batch_len;
            }
        },
        Ok(out) => {
            eprintln!(
                "[warn] worker exited with {}, skipping batch of {batch_len}",
                out.status
            );
            totals.skipped_files += batch_len;
        }
        Err(e) => {
            eprintln!("[warn] lost worker, skipping batch of {batch_len}: {e}");
            totals.skipped_files += batch_len;
        }
    }
}

struct Progress {
    enabled: bool,
    total: usize,
    done: AtomicUsize,
}

impl Progress {
    fn new(enabled: bool, total: usize) -> Self {
        Self {
            enabled,
            total,
            done: AtomicUsize::new(0),
        }
    }

    fn tick(&self) {
        if !self.enabled {
            return;
        }
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        let step = (self.total / 20).max(1);
        if done % step == 0 || done == self.total {
            eprintln!(
                "progress: {:.1}% ({done}/{} batches)",
                done as f64 * 100.0 / self.total as f64,
                self.total
            );
        }
    }
}
