// ============================================================
// Layer 4 — Enricher
// ============================================================
// Rewrites question names and categories from a reference table.
//
// Update rules, per record:
//   name      — replaced when the lookup found one and
//               (overwrite || current name is empty)
//   category  — replaced only when the lookup produced one and
//               (overwrite || current category is empty);
//               a miss leaves the existing value untouched
//
// Every record produces one EnrichLogRow for the audit CSV
// (written by infra/enrich_log.rs).

use serde::Serialize;

use crate::data::code_normalizer::base_code;
use crate::data::matcher::lookup;
use crate::domain::question::QuestionRecord;
use crate::domain::reference::ReferenceRow;

/// One audit row of an enrichment pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichLogRow {
    /// 1-based position of the record
    pub index: usize,
    pub qid:   String,
    pub base:  String,

    /// "YES" or "NO"
    pub matched: String,

    #[serde(rename = "colB_used_in_name")]
    pub display_label_used: String,

    #[serde(rename = "colC_used_in_category")]
    pub category_label_used: String,

    pub old_name:     String,
    pub old_category: String,
    pub new_name:     String,
    pub new_category: String,
}

/// Enrich all records in place and return the audit rows.
pub fn enrich(
    records:   &mut [QuestionRecord],
    rows:      &[ReferenceRow],
    overwrite: bool,
) -> Vec<EnrichLogRow> {
    let mut log     = Vec::with_capacity(records.len());
    let mut matched = 0usize;

    for (i, record) in records.iter_mut().enumerate() {
        let qid  = record.id.trim().to_string();
        let base = base_code(&qid);

        let old_name     = record.name.clone();
        let old_category = record.category.clone();

        let (hit_name, hit_category) = lookup(&qid, rows);

        let display_label_used = hit_name
            .as_deref()
            .and_then(|n| n.strip_prefix(qid.as_str()))
            .map(|rest| rest.trim().to_string())
            .unwrap_or_default();

        let category_label_used = hit_category
            .as_deref()
            .and_then(|c| c.split_once('/'))
            .map(|(label, _)| label.trim().to_string())
            .unwrap_or_default();

        if let Some(name) = &hit_name {
            if overwrite || old_name.is_empty() {
                record.name = name.clone();
            }
        }
        if let Some(category) = &hit_category {
            if overwrite || old_category.is_empty() {
                record.category = category.clone();
            }
        }

        let found = hit_name.is_some() || hit_category.is_some();
        if found {
            matched += 1;
        } else {
            tracing::debug!("No reference row for '{}' (base '{}')", qid, base);
        }

        log.push(EnrichLogRow {
            index: i + 1,
            qid,
            base,
            matched: if found { "YES" } else { "NO" }.to_string(),
            display_label_used,
            category_label_used,
            old_name,
            old_category,
            new_name:     record.name.clone(),
            new_category: record.category.clone(),
        });
    }

    tracing::info!("Enriched {}/{} questions", matched, records.len());
    log
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, name: &str, category: &str) -> QuestionRecord {
        QuestionRecord {
            id:       id.into(),
            name:     name.into(),
            category: category.into(),
            ..QuestionRecord::default()
        }
    }

    fn table() -> Vec<ReferenceRow> {
        vec![
            ReferenceRow::new("TO12.04.1.F02", "Ứng dụng nguyên hàm", "Toán 10"),
            ReferenceRow::new("LY11.01", "Dao động", "0"),
        ]
    }

    #[test]
    fn test_hit_overwrites_name_and_category() {
        let mut recs = vec![record("TO12.04.1.F02.a", "Chương 1", "Chương 1")];
        let log = enrich(&mut recs, &table(), true);

        assert_eq!(recs[0].name, "TO12.04.1.F02.a Ứng dụng nguyên hàm");
        assert_eq!(recs[0].category, "Toán 10/TO12.04.1.F02.a Ứng dụng nguyên hàm");

        let row = &log[0];
        assert_eq!(row.index, 1);
        assert_eq!(row.base, "TO12.04.1.F02");
        assert_eq!(row.matched, "YES");
        assert_eq!(row.display_label_used, "Ứng dụng nguyên hàm");
        assert_eq!(row.category_label_used, "Toán 10");
        assert_eq!(row.old_category, "Chương 1");
    }

    #[test]
    fn test_miss_preserves_existing_category() {
        let mut recs = vec![record("ZZ99", "Tên cũ", "Nhóm cũ")];
        let log = enrich(&mut recs, &table(), true);

        assert_eq!(recs[0].name, "Tên cũ");
        assert_eq!(recs[0].category, "Nhóm cũ");
        assert_eq!(log[0].matched, "NO");
        assert_eq!(log[0].new_category, "Nhóm cũ");
    }

    #[test]
    fn test_no_category_label_keeps_category() {
        let mut recs = vec![record("LY11.01", "", "Chương 2")];
        enrich(&mut recs, &table(), true);

        assert_eq!(recs[0].name, "LY11.01 Dao động");
        assert_eq!(recs[0].category, "Chương 2");
    }

    #[test]
    fn test_no_overwrite_fills_only_empty_fields() {
        let mut recs = vec![
            record("TO12.04.1.F02", "Giữ tên", ""),
            record("TO12.04.1.F02.b", "", "Giữ nhóm"),
        ];
        enrich(&mut recs, &table(), false);

        assert_eq!(recs[0].name, "Giữ tên");
        assert_eq!(recs[0].category, "Toán 10/TO12.04.1.F02 Ứng dụng nguyên hàm");
        assert_eq!(recs[1].name, "TO12.04.1.F02.b Ứng dụng nguyên hàm");
        assert_eq!(recs[1].category, "Giữ nhóm");
    }

    #[test]
    fn test_empty_table_is_all_misses() {
        let mut recs = vec![record("A1", "n", "c"), record("A2", "", "")];
        let log = enrich(&mut recs, &[], true);
        assert!(log.iter().all(|r| r.matched == "NO"));
        assert_eq!(recs[1].category, "");
    }
}
