// src/app.rs
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use crate::cli::Args;
use crate::config::Config;
use crate::scheduler::{self, CancelToken};
use crate::stats::Report;
use crate::walker::{self, WalkedFile};
use crate::{output, worker};

pub fn run() -> Result<()> {
    let args = Args::parse();
    if args.worker {
        return worker::run(std::io::stdin().lock(), std::io::stdout().lock())
            .context("worker failed");
    }

    let config = Config::try_from(args)?;
    let started = Instant::now();

    // The walker streams from its own thread while this one collects, so
    // traversal and the channel stay bounded on huge trees.
    let (tx, rx) = crossbeam_channel::bounded(1024);
    let walk_config = config.clone();
    let walk_thread = std::thread::spawn(move || walker::walk(&walk_config, &tx));
    let files: Vec<WalkedFile> = rx.into_iter().collect();
    if walk_thread.join().is_err() {
        anyhow::bail!("walker thread panicked");
    }

    if config.progress {
        eprintln!(
            "found {} files to scan in {:.3}s",
            files.len(),
            started.elapsed().as_secs_f64()
        );
    }

    let cancel = CancelToken::default();
    let totals = scheduler::run(files, &config, &cancel).context("scan failed")?;
    let report = Report::derive(&config.root, &totals, started.elapsed());
    output::emit(&report, &config).context("failed to emit report")?;
    Ok(())
}
