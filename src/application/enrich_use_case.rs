// ============================================================
// Layer 2 — EnrichUseCase
// ============================================================
// Fills question names and categories from reference spreadsheets:
//
//   Step 1: Load the mapping directory   (Layer 4 - data/reference_loader)
//   Step 2: Read the question JSON       (Layer 6 - infra/question_store)
//   Step 3: Look up and update records   (Layer 4 - data/enricher)
//   Step 4: Write JSON + enrich_log.csv  (Layer 6 - infra)
//
// The reference table is loaded once and reused for every file,
// which matters for batch runs over many documents.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::data::enricher::enrich;
use crate::data::reference_loader::load_mapping_dir;
use crate::domain::reference::ReferenceTable;
use crate::infra::enrich_log::{log_path_for, write_enrich_log};
use crate::infra::question_store::{read_questions, write_questions};

#[derive(Debug, Clone)]
pub struct EnrichOutcome {
    pub json_path: PathBuf,
    pub log_path:  PathBuf,
    pub matched:   usize,
    pub total:     usize,
}

pub struct EnrichUseCase {
    table:     ReferenceTable,
    overwrite: bool,
}

impl EnrichUseCase {
    /// Load every spreadsheet of `mapping_dir`. Fails only when the
    /// directory itself is missing; unreadable files are skipped.
    pub fn load(mapping_dir: &Path, overwrite: bool) -> Result<Self> {
        let table = load_mapping_dir(mapping_dir)
            .with_context(|| format!("Cannot load mapping directory '{}'", mapping_dir.display()))?;
        Ok(Self::with_table(table, overwrite))
    }

    pub fn with_table(table: ReferenceTable, overwrite: bool) -> Self {
        Self { table, overwrite }
    }

    pub fn table(&self) -> &ReferenceTable {
        &self.table
    }

    /// Enrich `json_path`, writing to `out` (or in place).
    pub fn run(&self, json_path: &Path, out: Option<&Path>) -> Result<EnrichOutcome> {
        let mut records = read_questions(json_path)?;
        let log = enrich(&mut records, &self.table.rows, self.overwrite);

        let out_path = out.unwrap_or(json_path).to_path_buf();
        write_questions(&out_path, &records)?;

        let log_path = log_path_for(&out_path);
        write_enrich_log(&log_path, &log)?;

        let matched = log.iter().filter(|r| r.matched == "YES").count();
        tracing::info!(
            "Enriched '{}': {}/{} matched, audit log '{}'",
            out_path.display(),
            matched,
            records.len(),
            log_path.display()
        );

        Ok(EnrichOutcome { json_path: out_path, log_path, matched, total: records.len() })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::question::QuestionRecord;
    use crate::domain::reference::ReferenceRow;

    #[test]
    fn test_missing_mapping_dir_is_error() {
        assert!(EnrichUseCase::load(Path::new("/no/such/mapping"), true).is_err());
    }

    #[test]
    fn test_enrich_in_place_with_log() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("questionsTF.json");
        let records = vec![
            QuestionRecord::open("TO12.04.a", "x", "Chương 1", vec![], "GV"),
            QuestionRecord::open("Q002", "y", "Chương 1", vec![], "GV"),
        ];
        write_questions(&json, &records).unwrap();

        let table = ReferenceTable::from_rows(vec![ReferenceRow::new("TO12.04", "Hàm số", "Toán 12")]);
        let outcome = EnrichUseCase::with_table(table, true).run(&json, None).unwrap();

        assert_eq!(outcome.matched, 1);
        assert_eq!(outcome.total, 2);
        assert!(outcome.log_path.ends_with("enrich_log.csv"));
        assert!(outcome.log_path.exists());

        let back = read_questions(&json).unwrap();
        assert_eq!(back[0].name, "TO12.04.a Hàm số");
        assert_eq!(back[0].category, "Toán 12/TO12.04.a Hàm số");
        assert_eq!(back[1].category, "Chương 1");
    }

    #[test]
    fn test_separate_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("questionsTF.json");
        write_questions(&json, &[QuestionRecord::open("A1", "x", "", vec![], "GV")]).unwrap();

        let out = dir.path().join("enriched").join("questions.json");
        let outcome = EnrichUseCase::with_table(ReferenceTable::default(), true)
            .run(&json, Some(&out))
            .unwrap();
        assert_eq!(outcome.json_path, out);
        assert!(dir.path().join("enriched").join("enrich_log.csv").exists());
    }
}
