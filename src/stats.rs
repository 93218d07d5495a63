// src/stats.rs
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::registry;

/// Result of counting one file. Owned by the worker that produced it until
/// folded into its batch totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: PathBuf,
    pub ext: String,
    pub lines: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtTotals {
    pub lines: usize,
    pub files: usize,
}

/// Aggregate counts for a scan (or one worker's share of it).
///
/// Workers each build a local value and return it to the coordinator, which
/// merges single-threaded. Merging is commutative and associative, so the
/// completion order of batches never changes the result. The map is a
/// `BTreeMap` so equal totals are also byte-identical when serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanTotals {
    pub total_lines: usize,
    pub total_files: usize,
    /// Files that passed the filter but could not be read. Reported
    /// separately; never feeds the line totals.
    pub skipped_files: usize,
    pub per_extension: BTreeMap<String, ExtTotals>,
}

impl ScanTotals {
    pub fn record(&mut self, record: &FileRecord) {
        self.total_lines += record.lines;
        self.total_files += 1;
        let entry = self.per_extension.entry(record.ext.clone()).or_default();
        entry.lines += record.lines;
        entry.files += 1;
    }

    pub fn record_skip(&mut self) {
        self.skipped_files += 1;
    }

    pub fn merge(&mut self, other: ScanTotals) {
        self.total_lines += other.total_lines;
        self.total_files += other.total_files;
        self.skipped_files += other.skipped_files;
        for (ext, totals) in other.per_extension {
            let entry = self.per_extension.entry(ext).or_default();
            entry.lines += totals.lines;
            entry.files += totals.files;
        }
    }
}

/// One per-extension row of the derived report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub extension: String,
    pub language: &'static str,
    pub lines: usize,
    pub files: usize,
    /// Share of total lines, rounded to one decimal.
    pub percent: f64,
    /// Average lines per file, rounded to one decimal.
    pub avg_lines: f64,
}

/// Derived metrics over final totals, ready for presentation.
#[derive(Debug, Serialize)]
pub struct Report {
    pub root: PathBuf,
    pub total_lines: usize,
    pub total_files: usize,
    pub skipped_files: usize,
    pub elapsed_secs: f64,
    pub files_per_sec: f64,
    pub lines_per_sec: f64,
    pub rows: Vec<ReportRow>,
}

impl Report {
    pub fn derive(root: &Path, totals: &ScanTotals, elapsed: Duration) -> Self {
        let elapsed_secs = elapsed.as_secs_f64();
        let mut rows: Vec<ReportRow> = totals
            .per_extension
            .iter()
            .map(|(ext, t)| ReportRow {
                extension: ext.clone(),
                language: registry::language_for(ext).unwrap_or("Unknown"),
                lines: t.lines,
                files: t.files,
                percent: round1(ratio(t.lines, totals.total_lines) * 100.0),
                avg_lines: round1(ratio(t.lines, t.files)),
            })
            .collect();
        // Biggest contributors first; ties broken by name for determinism.
        rows.sort_by(|a, b| {
            b.lines
                .cmp(&a.lines)
                .then_with(|| a.extension.cmp(&b.extension))
        });
        let (files_per_sec, lines_per_sec) = if elapsed_secs > 0.0 {
            (
                totals.total_files as f64 / elapsed_secs,
                totals.total_lines as f64 / elapsed_secs,
            )
        } else {
            (0.0, 0.0)
        };
        Self {
            root: root.to_path_buf(),
            total_lines: totals.total_lines,
            total_files: totals.total_files,
            skipped_files: totals.skipped_files,
            elapsed_secs,
            files_per_sec,
            lines_per_sec,
            rows,
        }
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ext: &str, lines: usize) -> FileRecord {
        FileRecord {
            path: PathBuf::from(format!("f{ext}")),
            ext: ext.to_string(),
            lines,
        }
    }

    #[test]
    fn totals_track_the_per_extension_sums() {
        let mut totals = ScanTotals::default();
        totals.record(&record(".py", 10));
        totals.record(&record(".py", 5));
        totals.record(&record(".rs", 7));
        totals.record_skip();

        assert_eq!(totals.total_lines, 22);
        assert_eq!(totals.total_files, 3);
        assert_eq!(totals.skipped_files, 1);
        assert_eq!(totals.per_extension[".py"].lines, 15);
        assert_eq!(totals.per_extension[".py"].files, 2);
        assert_eq!(
            totals.total_lines,
            totals.per_extension.values().map(|t| t.lines).sum::<usize>()
        );
    }

    #[test]
    fn zero_line_files_still_count() {
        let mut totals = ScanTotals::default();
        totals.record(&record(".py", 0));
        assert_eq!(totals.total_files, 1);
        assert_eq!(totals.total_lines, 0);
        assert_eq!(totals.per_extension[".py"].files, 1);
    }

    #[test]
    fn merge_is_commutative() {
        let mut a = ScanTotals::default();
        a.record(&record(".py", 3));
        a.record(&record(".rs", 8));
        let mut b = ScanTotals::default();
        b.record(&record(".py", 4));
        b.record_skip();

        let mut ab = a.clone();
        ab.merge(b.clone());
        let mut ba = b;
        ba.merge(a);
        assert_eq!(ab, ba);
        assert_eq!(
            serde_json::to_string(&ab).unwrap(),
            serde_json::to_string(&ba).unwrap()
        );
    }

    #[test]
    fn report_rows_sort_by_lines_then_extension() {
        let mut totals = ScanTotals::default();
        totals.record(&record(".rs", 5));
        totals.record(&record(".py", 5));
        totals.record(&record(".go", 9));
        let report = Report::derive(Path::new("."), &totals, Duration::from_secs(1));
        let order: Vec<&str> = report.rows.iter().map(|r| r.extension.as_str()).collect();
        assert_eq!(order, vec![".go", ".py", ".rs"]);
    }

    #[test]
    fn derived_metrics_round_to_one_decimal() {
        let mut totals = ScanTotals::default();
        totals.record(&record(".py", 1));
        totals.record(&record(".py", 1));
        totals.record(&record(".rs", 1));
        let report = Report::derive(Path::new("."), &totals, Duration::from_secs(2));
        let py = &report.rows[0];
        assert_eq!(py.extension, ".py");
        assert_eq!(py.percent, 66.7);
        assert_eq!(py.avg_lines, 1.0);
        assert_eq!(report.files_per_sec, 1.5);
    }

    #[test]
    fn empty_scan_derives_without_dividing_by_zero() {
        let totals = ScanTotals::default();
        let report = Report::derive(Path::new("."), &totals, Duration::ZERO);
        assert_eq!(report.total_lines, 0);
        assert_eq!(report.files_per_sec, 0.0);
        assert!(report.rows.is_empty());
    }
}
