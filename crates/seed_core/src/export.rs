//! CSV export of stored seed results.

use crate::model::SeedResult;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub const CSV_HEADERS: [&str; 7] = [
    "Seed ID",
    "Filename",
    "Classification",
    "Confidence",
    "Severity",
    "Pest Count",
    "Holes Detected",
];

/// Render results as CSV: header, one `\n`-terminated line per result, no quoting.
///
/// Fields are written verbatim, so a comma inside a filename splits that row.
/// Empty input yields no bytes at all.
pub fn to_csv(results: &[SeedResult]) -> Result<Vec<u8>> {
    if results.is_empty() {
        return Ok(Vec::new());
    }
    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    wtr.write_record(CSV_HEADERS)?;

    for r in results {
        wtr.write_record([
            r.seed_id.to_string(),
            r.filename.clone(),
            r.classification.clone(),
            format!("{}", r.confidence),
            r.severity.to_string(),
            r.pest_count.to_string(),
            r.holes_detected.to_string(),
        ])?;
    }

    wtr.into_inner()
        .map_err(|e| anyhow::anyhow!("flushing CSV buffer: {}", e.error()))
}

/// Write the CSV to `path`. Returns `false` without touching the filesystem when
/// there is nothing to export.
pub fn save_csv(results: &[SeedResult], path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    let bytes = to_csv(results)?;
    if bytes.is_empty() {
        return Ok(false);
    }
    fs::write(path, &bytes).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!("exported {} rows to {}", results.len(), path.display());
    Ok(true)
}
