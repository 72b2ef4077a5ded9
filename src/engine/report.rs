//! End-of-run summary and `--list` output

use anyhow::{Context, Result};
use log::info;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::utils::Colors;
use crate::utils::config::{LIST_THRESHOLD, PackagePaths};
use crate::{CopyRecord, RunSummary};

/// Print summary
pub fn print_summary(summary: &RunSummary) {
    let mut line = format!(
        "{} | {} | {}",
        Colors::colorize(
            Colors::SCOUTED,
            &format!("Directories: {}", summary.directories)
        ),
        Colors::colorize(Colors::MATCHED, &format!("Matched: {}", summary.matched)),
        Colors::colorize(
            Colors::COPIED,
            &format!("Copied: {}", summary.copied_count())
        ),
    );
    if summary.failed > 0 {
        line.push_str(&format!(
            " | {}",
            Colors::colorize(Colors::FAILED, &format!("Failed: {}", summary.failed))
        ));
    }
    info!("{}", line);
}

fn format_record(record: &CopyRecord) -> String {
    format!(
        "{} -> {}",
        record.source.display(),
        record.destination.display()
    )
}

/// Write every copy as `source -> destination`, sorted by source.
///
/// Up to [`LIST_THRESHOLD`] lines go to stdout. Longer lists go to the results file in
/// `results_dir`, whose path is returned.
pub fn write_copy_list(summary: &RunSummary, results_dir: &Path) -> Result<Option<PathBuf>> {
    let mut records: Vec<&CopyRecord> = summary.copied.iter().collect();
    records.sort_by(|a, b| a.source.cmp(&b.source));

    if records.len() <= LIST_THRESHOLD {
        for r in records {
            println!("{}", format_record(r));
        }
        return Ok(None);
    }

    let path = results_dir.join(PackagePaths::get().results_filename());
    let mut file = std::io::BufWriter::new(
        std::fs::File::create(&path).with_context(|| format!("create {}", path.display()))?,
    );
    for r in records {
        writeln!(file, "{}", format_record(r)).with_context(|| format!("write {}", path.display()))?;
    }
    file.flush()
        .with_context(|| format!("write {}", path.display()))?;
    info!(
        "{} copies listed in {}",
        summary.copied_count(),
        path.display()
    );
    Ok(Some(path))
}
