// src/walker.rs
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crossbeam_channel::Sender;
use walkdir::WalkDir;

use crate::config::Config;
use crate::{filter, registry};

/// A candidate file discovered by the walker, ready for batching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedFile {
    pub path: PathBuf,
    pub ext: String,
    pub size: u64,
}

/// Identity of a directory already entered, used to break symlink cycles
/// when link-following is enabled.
#[derive(Debug, PartialEq, Eq, Hash)]
enum DirId {
    #[cfg(unix)]
    Inode(u64, u64),
    #[cfg_attr(unix, allow(dead_code))]
    Resolved(PathBuf),
}

fn dir_identity(path: &Path) -> Option<DirId> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        std::fs::metadata(path)
            .ok()
            .map(|m| DirId::Inode(m.dev(), m.ino()))
    }
    #[cfg(not(unix))]
    {
        std::fs::canonicalize(path).ok().map(DirId::Resolved)
    }
}

/// Stream every non-excluded file under the configured root, exactly once,
/// in unspecified order.
///
/// Excluded directories are pruned rather than post-filtered, so their
/// subtrees are never descended into. Symbolic links are skipped unless
/// `follow` is set; with `follow`, directories already visited (by resolved
/// identity) are pruned so cycles cannot recurse forever. Per-entry errors
/// are reported and skipped, never fatal to the walk.
pub fn walk(config: &Config, tx: &Sender<WalkedFile>) {
    let mut seen_dirs: HashSet<DirId> = HashSet::new();
    let mut it = WalkDir::new(&config.root)
        .follow_links(config.follow)
        .into_iter();

    while let Some(entry) = it.next() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                eprintln!("[warn] walk: {e}");
                continue;
            }
        };
        if entry.file_type().is_dir() {
            if entry.depth() > 0 && filter::is_excluded_dir(&entry.file_name().to_string_lossy()) {
                it.skip_current_dir();
                continue;
            }
            if config.follow {
                if let Some(id) = dir_identity(entry.path()) {
                    if !seen_dirs.insert(id) {
                        it.skip_current_dir();
                    }
                }
            }
            continue;
        }
        if !entry.file_type().is_file() {
            continue;
        }
        let size = match entry.metadata() {
            Ok(m) => m.len(),
            Err(e) => {
                eprintln!("[warn] stat {}: {e}", entry.path().display());
                continue;
            }
        };
        if filter::is_excluded_file(entry.path(), size, config.max_file_size) {
            continue;
        }
        let Some(ext) = registry::extension_of(entry.path()) else {
            continue;
        };
        // Receiver hung up: nothing left to do.
        if tx
            .send(WalkedFile {
                path: entry.into_path(),
                ext,
                size,
            })
            .is_err()
        {
            return;
        }
    }
}

/// Convenience wrapper that materializes the walk into a list.
pub fn collect(config: &Config) -> Vec<WalkedFile> {
    let (tx, rx) = crossbeam_channel::unbounded();
    walk(config, &tx);
    drop(tx);
    rx.into_iter().collect()
}
