// ============================================================
// Layer 4 — Reference Table Loader
// ============================================================
// Loads every spreadsheet (.xlsx / .xls) of a mapping directory with
// calamine and concatenates the first three columns of each first
// sheet into one ReferenceTable:
//
//   column A → code, B → display label, C → category label
//
// There is no header row; every row is data. Missing cells are read
// as "", every value is trimmed. Files are visited in file-name
// order. A file that cannot be read is recorded in
// `table.failures` and the remaining files are still loaded.

use anyhow::{bail, Result};
use calamine::{open_workbook_auto, Data, Reader};
use std::{fs, path::{Path, PathBuf}};

use crate::domain::error::ReferenceFileError;
use crate::domain::reference::{ReferenceRow, ReferenceTable};

/// Load all reference rows of a mapping directory.
/// Only a missing or unreadable directory is an error.
pub fn load_mapping_dir(dir: impl AsRef<Path>) -> Result<ReferenceTable> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        bail!("Mapping directory '{}' does not exist", dir.display());
    }

    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| is_spreadsheet(p))
        .collect();
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut table = ReferenceTable::default();
    for path in files {
        match read_one_sheet(&path) {
            Ok(rows) => {
                tracing::debug!("Loaded {} rows from '{}'", rows.len(), path.display());
                table.rows.extend(rows);
            }
            Err(err) => {
                tracing::warn!("{}", err);
                table.failures.push(err);
            }
        }
    }

    tracing::info!(
        "Reference table: {} rows, {} files skipped",
        table.len(),
        table.failures.len()
    );
    Ok(table)
}

/// Rows of the first sheet of one workbook.
pub fn read_one_sheet(path: &Path) -> Result<Vec<ReferenceRow>, ReferenceFileError> {
    let fail = |reason: String| ReferenceFileError { path: path.to_path_buf(), reason };

    let mut workbook = open_workbook_auto(path).map_err(|e| fail(e.to_string()))?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| fail("workbook has no sheets".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| fail(e.to_string()))?;

    // the range starts at the first used column, not necessarily A
    let first_col = range.start().map(|(_, c)| c as usize).unwrap_or(0);

    let rows = range
        .rows()
        .map(|row| {
            let cell = |col: usize| {
                col.checked_sub(first_col)
                    .and_then(|i| row.get(i))
                    .map(cell_to_string)
                    .unwrap_or_default()
            };
            ReferenceRow::new(cell(0), cell(1), cell(2))
        })
        .collect();

    Ok(rows)
}

fn is_spreadsheet(path: &Path) -> bool {
    let is_lock_file = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with("~$"))
        .unwrap_or(false);

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    path.is_file() && !is_lock_file && matches!(ext.as_str(), "xlsx" | "xls")
}

/// Cell value as trimmed text. Whole floats are written without a
/// fractional part, so a code typed as 12 reads "12", not "12.0".
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.trim().to_string(),
        Data::DurationIso(s) => s.trim().to_string(),
        Data::Error(_) | Data::Empty => String::new(),
    }
}
