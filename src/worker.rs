// src/worker.rs
use std::io::{Read, Write};
use std::path::PathBuf;

use crate::counter;
use crate::error::Result;
use crate::registry;
use crate::stats::{FileRecord, ScanTotals};

/// Process-mode worker body: read one batch of NUL-separated paths from
/// `input`, count each file, and write the partial totals as a single JSON
/// object to `output`.
///
/// All of `input` is consumed before anything is written, which is what lets
/// the coordinator fill our stdin without risking a pipe deadlock. Per-file
/// failures become skips; the worker itself only fails on a broken stdio
/// channel.
pub fn run(mut input: impl Read, output: impl Write) -> Result<()> {
    let mut buf = Vec::new();
    input.read_to_end(&mut buf)?;

    let mut totals = ScanTotals::default();
    for chunk in buf.split(|&b| b == 0) {
        if chunk.is_empty() {
            continue;
        }
        let path = PathBuf::from(String::from_utf8_lossy(chunk).into_owned());
        let Some(ext) = registry::extension_of(&path) else {
            totals.record_skip();
            continue;
        };
        match counter::count_lines(&path) {
            Ok(lines) => totals.record(&FileRecord { path, ext, lines }),
            Err(e) => {
                eprintln!("[warn] skipping {}: {e}", path.display());
                totals.record_skip();
            }
        }
    }
    serde_json::to_writer(output, &totals)?;
    Ok(())
}
