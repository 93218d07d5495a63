// src/output.rs
use std::io::Write;

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::stats::Report;

/// Emit the derived report to stdout in the configured format.
pub fn emit(report: &Report, config: &Config) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = std::io::BufWriter::new(stdout.lock());
    match config.format {
        OutputFormat::Table => write_table(report, &mut out)?,
        OutputFormat::Json => write_json(report, &mut out)?,
    }
    out.flush()?;
    Ok(())
}

fn write_table(report: &Report, out: &mut impl Write) -> anyhow::Result<()> {
    writeln!(out, "Directory: {}", report.root.display())?;
    writeln!(
        out,
        "Elapsed:   {:.3}s  ({:.0} files/sec, {:.0} lines/sec)",
        report.elapsed_secs, report.files_per_sec, report.lines_per_sec
    )?;
    writeln!(out)?;
    writeln!(out, "Total lines: {}", report.total_lines)?;
    write!(out, "Total files: {}", report.total_files)?;
    if report.skipped_files > 0 {
        write!(out, "  ({} skipped)", report.skipped_files)?;
    }
    writeln!(out)?;
    if report.rows.is_empty() {
        writeln!(out, "\nNo supported code files found.")?;
        return Ok(());
    }
    writeln!(out)?;
    writeln!(
        out,
        "{:>8}  {:<14} {:>10}  {:>7}  {:>6}  {:>8}",
        "EXT", "LANGUAGE", "LINES", "FILES", "%", "AVG"
    )?;
    writeln!(out, "{}", "-".repeat(62))?;
    for row in &report.rows {
        writeln!(
            out,
            "{:>8}  {:<14} {:>10}  {:>7}  {:>6.1}  {:>8.1}",
            row.extension, row.language, row.lines, row.files, row.percent, row.avg_lines
        )?;
    }
    Ok(())
}

fn write_json(report: &Report, out: &mut impl Write) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}
