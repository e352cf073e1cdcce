// ============================================================
// Layer 3 — Reference Table Domain Types
// ============================================================
// A reference table maps question codes to a display label and a
// category label. It is the concatenation of the first three
// columns of every spreadsheet in a mapping directory:
//
//   A: code            e.g. "TO12.04.1.F02"
//   B: display label   e.g. "Ứng dụng nguyên hàm"
//   C: category label  e.g. "Toán 12"
//
// Rows are immutable once loaded, so a loaded table can be shared
// across threads and queried without locking.

use crate::data::code_normalizer::{norm_alnum_upper, norm_ws_upper};
use crate::domain::error::ReferenceFileError;

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceRow {
    pub code:           String,
    pub display_label:  String,
    pub category_label: String,

    /// Whitespace removed, uppercased
    pub code_ws_upper: String,

    /// Accents and punctuation removed, uppercased
    pub code_alnum_upper: String,

    /// Dots removed
    pub code_nodot: String,

    /// Dots removed, then accents and punctuation removed, uppercased
    pub code_nodot_alnum_upper: String,
}

impl ReferenceRow {
    /// Build a row from raw cell values; every value is trimmed and
    /// the normalized forms of the code are computed once here.
    pub fn new(
        code:           impl AsRef<str>,
        display_label:  impl AsRef<str>,
        category_label: impl AsRef<str>,
    ) -> Self {
        let code       = code.as_ref().trim().to_string();
        let code_nodot = code.replace('.', "");

        Self {
            code_ws_upper:          norm_ws_upper(&code),
            code_alnum_upper:       norm_alnum_upper(&code),
            code_nodot_alnum_upper: norm_alnum_upper(&code_nodot),
            code_nodot,
            code,
            display_label:  display_label.as_ref().trim().to_string(),
            category_label: category_label.as_ref().trim().to_string(),
        }
    }

    /// True when the category label carries a usable value
    /// (not empty and not the spreadsheet placeholder "0").
    pub fn has_category(&self) -> bool {
        let c = self.category_label.trim();
        !c.is_empty() && c != "0"
    }
}

/// Rows loaded from a directory, plus the files that failed to load.
#[derive(Debug, Default)]
pub struct ReferenceTable {
    pub rows:     Vec<ReferenceRow>,
    pub failures: Vec<ReferenceFileError>,
}

impl ReferenceTable {
    pub fn from_rows(rows: Vec<ReferenceRow>) -> Self {
        Self { rows, failures: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}
