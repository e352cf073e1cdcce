// ============================================================
// Layer 4 — Reference Lookup
// ============================================================
// Maps a question id to a reference row and derives the display
// name and category path:
//
//   id "TO12.04.1.F02.a"  →  base "TO12.04.1.F02"
//   candidates: rows with code == base, then rows whose code starts
//               with base (literal, case-sensitive), table order
//   pick:       first candidate with a usable category label,
//               otherwise the first candidate
//   name:       "{id} {display_label}"
//   category:   "{category_label}/{name}", or None without a label
//
// Codes are compared as written; the normalized forms on each row
// are not used here.

use crate::data::code_normalizer::base_code;
use crate::domain::reference::ReferenceRow;

/// Best reference row for a question id, if any.
pub fn find_row<'t>(question_id: &str, rows: &'t [ReferenceRow]) -> Option<&'t ReferenceRow> {
    let qid = question_id.trim();
    if rows.is_empty() || qid.is_empty() {
        return None;
    }

    let base = base_code(qid);

    let exact    = rows.iter().filter(|r| r.code == base);
    let prefixed = rows.iter().filter(|r| r.code != base && r.code.starts_with(&base));
    let candidates: Vec<&ReferenceRow> = exact.chain(prefixed).collect();

    candidates
        .iter()
        .find(|r| r.has_category())
        .or_else(|| candidates.first())
        .copied()
}

/// Name and category for a question id. A miss is (None, None).
pub fn lookup(question_id: &str, rows: &[ReferenceRow]) -> (Option<String>, Option<String>) {
    let Some(row) = find_row(question_id, rows) else {
        return (None, None);
    };

    let qid  = question_id.trim();
    let name = format!("{} {}", qid, row.display_label).trim().to_string();

    let category = if row.has_category() {
        Some(format!("{}/{}", row.category_label.trim(), name))
    } else {
        None
    };

    (Some(name), category)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn row(code: &str, b: &str, c: &str) -> ReferenceRow {
        ReferenceRow::new(code, b, c)
    }

    #[test]
    fn test_suffix_is_stripped_for_lookup() {
        let rows = vec![row("TO12.04.1.F02", "Ứng dụng nguyên hàm", "Toán 10")];
        let (name, cat) = lookup("TO12.04.1.F02.a", &rows);
        assert_eq!(name.as_deref(), Some("TO12.04.1.F02.a Ứng dụng nguyên hàm"));
        assert_eq!(cat.as_deref(), Some("Toán 10/TO12.04.1.F02.a Ứng dụng nguyên hàm"));
    }

    #[test]
    fn test_miss_and_empty_table() {
        assert_eq!(lookup("X.1", &[]), (None, None));
        let rows = vec![row("TO12", "a", "b")];
        assert_eq!(lookup("LY11.01", &rows), (None, None));
        assert_eq!(lookup("   ", &rows), (None, None));
    }

    #[test]
    fn test_prefix_rows_are_candidates() {
        let rows = vec![row("TO12.04.1.F02.x1", "Mở rộng", "Toán 12")];
        let (name, cat) = lookup("TO12.04.1.F02", &rows);
        assert_eq!(name.as_deref(), Some("TO12.04.1.F02 Mở rộng"));
        assert_eq!(cat.as_deref(), Some("Toán 12/TO12.04.1.F02 Mở rộng"));
    }

    #[test]
    fn test_prefers_row_with_category() {
        let rows = vec![
            row("TO12.04", "Không có nhóm", "0"),
            row("TO12.04", "Cũng không", ""),
            row("TO12.04.9", "Có nhóm", "Toán 12"),
        ];
        let picked = find_row("TO12.04", &rows).unwrap();
        assert_eq!(picked.display_label, "Có nhóm");
    }

    #[test]
    fn test_no_category_is_none_not_name() {
        let rows = vec![row("TO12.04", "Chủ đề", "0")];
        let (name, cat) = lookup("TO12.04", &rows);
        assert_eq!(name.as_deref(), Some("TO12.04 Chủ đề"));
        assert_eq!(cat, None);
    }

    #[test]
    fn test_exact_match_listed_before_prefix() {
        let rows = vec![
            row("TO12.04.1", "prefix", "A"),
            row("TO12.04", "exact", "B"),
        ];
        assert_eq!(find_row("TO12.04", &rows).unwrap().display_label, "exact");
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let rows = vec![row("to12.04", "x", "y")];
        assert_eq!(lookup("TO12.04", &rows), (None, None));
    }

    #[test]
    fn test_empty_label_gives_bare_id() {
        let rows = vec![row("Q1", "", "Nhóm")];
        let (name, cat) = lookup("Q1", &rows);
        assert_eq!(name.as_deref(), Some("Q1"));
        assert_eq!(cat.as_deref(), Some("Nhóm/Q1"));
    }
}
