// src/filter.rs
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::registry;

/// Files larger than this are treated as data/binary and skipped.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Files above this size get their first bytes sniffed before counting.
const SNIFF_THRESHOLD: u64 = 10 * 1024;
const SNIFF_SAMPLE: usize = 512;
const MIN_ASCII_RATIO: f64 = 0.8;

/// Directories pruned during traversal. Exact, case-sensitive match on the
/// base name; matched subtrees are never descended into.
const SKIP_DIRS: &[&str] = &[
    ".git", ".svn", ".hg", ".vscode", ".idea", ".vs", "node_modules",
    "__pycache__", ".pytest_cache", "venv", "env", ".env", "bin", "obj",
    "target", "build", "dist", "coverage", ".nyc_output", "logs", "tmp",
    ".cache", "vendor", "third_party", "external", ".gradle",
];

pub fn is_excluded_dir(name: &str) -> bool {
    SKIP_DIRS.contains(&name)
}

/// Whether a file should be skipped before any counting work: unregistered
/// extension, oversized, or failing the content sniff. Pure predicate, safe
/// to call from any number of workers.
pub fn is_excluded_file(path: &Path, size: u64, max_size: u64) -> bool {
    match registry::extension_of(path) {
        Some(ext) if registry::is_supported(&ext) => {}
        _ => return true,
    }
    if size > max_size {
        return true;
    }
    size > SNIFF_THRESHOLD && !sniff_is_text(path)
}

/// Sample the first bytes of a file: a NUL byte or too many non-ASCII bytes
/// marks it as binary. An unreadable or unsampleable file is treated as
/// binary too.
fn sniff_is_text(path: &Path) -> bool {
    let Ok(mut file) = File::open(path) else {
        return false;
    };
    let mut buf = [0u8; SNIFF_SAMPLE];
    let n = file.read(&mut buf).unwrap_or(0);
    sample_is_text(&buf[..n])
}

fn sample_is_text(sample: &[u8]) -> bool {
    if sample.is_empty() {
        return true;
    }
    if sample.contains(&0) {
        return false;
    }
    let ascii = sample.iter().filter(|&&b| b < 128).count();
    (ascii as f64 / sample.len() as f64) > MIN_ASCII_RATIO
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn version_control_and_cache_dirs_are_excluded() {
        assert!(is_excluded_dir(".git"));
        assert!(is_excluded_dir("node_modules"));
        assert!(is_excluded_dir("__pycache__"));
        assert!(!is_excluded_dir("src"));
        // Exact match only: no prefix or case-insensitive behavior.
        assert!(!is_excluded_dir(".github"));
        assert!(!is_excluded_dir("Target"));
    }

    #[test]
    fn unregistered_extension_is_excluded() {
        assert!(is_excluded_file(
            &PathBuf::from("a.exe"),
            10,
            DEFAULT_MAX_FILE_SIZE
        ));
        assert!(is_excluded_file(
            &PathBuf::from("noext"),
            10,
            DEFAULT_MAX_FILE_SIZE
        ));
    }

    #[test]
    fn oversized_file_is_excluded() {
        assert!(is_excluded_file(&PathBuf::from("a.py"), 1025, 1024));
        assert!(!is_excluded_file(&PathBuf::from("a.py"), 1024, 1024));
    }

    #[test]
    fn nul_byte_in_sample_marks_binary() {
        assert!(!sample_is_text(b"hello\0world"));
        assert!(sample_is_text(b"hello world"));
        assert!(sample_is_text(b""));
    }

    #[test]
    fn mostly_non_ascii_sample_marks_binary() {
        let noise: Vec<u8> = (0..100).map(|i| 200 + (i % 50) as u8).collect();
        assert!(!sample_is_text(&noise));
    }

    #[test]
    fn large_binary_file_is_sniffed_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.py");
        let mut file = File::create(&path).unwrap();
        file.write_all(&vec![0u8; 20 * 1024]).unwrap();
        assert!(is_excluded_file(&path, 20 * 1024, DEFAULT_MAX_FILE_SIZE));
    }

    #[test]
    fn small_files_skip_the_sniff() {
        // Below the sniff threshold no read happens, even for odd content.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.py");
        std::fs::write(&path, b"x = 1\n").unwrap();
        assert!(!is_excluded_file(&path, 6, DEFAULT_MAX_FILE_SIZE));
    }
}
