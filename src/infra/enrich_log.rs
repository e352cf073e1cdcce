// ============================================================
// Layer 6 — Enrichment Audit Log
// ============================================================
// Writes one CSV row per record of an enrichment pass, so an instructor
// can check which questions matched the reference spreadsheets.
//
// Output file: enrich_log.csv, next to the enriched JSON.
//
// Example:
//   index,qid,base,matched,colB_used_in_name,colC_used_in_category,old_name,old_category,new_name,new_category
//   1,TO12.04.1.F02.a,TO12.04.1.F02,YES,Ứng dụng nguyên hàm,Toán 12,Chương 1,Chương 1,...
//
// The file is rewritten on every pass.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::data::enricher::EnrichLogRow;

pub const ENRICH_LOG_FILE: &str = "enrich_log.csv";

/// Path of the audit log for an enriched JSON file.
pub fn log_path_for(json_path: &Path) -> PathBuf {
    json_path.with_file_name(ENRICH_LOG_FILE)
}

pub fn write_enrich_log(path: &Path, rows: &[EnrichLogRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Cannot create '{}'", path.display()))?;

    if rows.is_empty() {
        // serde only emits the header together with the first record
        writer.write_record([
            "index", "qid", "base", "matched",
            "colB_used_in_name", "colC_used_in_category",
            "old_name", "old_category", "new_name", "new_category",
        ])?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    tracing::debug!("Wrote {} audit rows to '{}'", rows.len(), path.display());
    Ok(())
}
