// ============================================================
// Layer 4 — Code Normalizer
// ============================================================
// Question ids look like "TO12.04.1.F02.a": dot-separated segments,
// optionally ending in an alphabetic sub-part suffix. This module
// computes the base grouping code and the canonical string forms
// used to compare codes typed by different people:
//
//   raw            "TO12.04.1.F02 "  → "TO12.04.1.F02"
//   no dots        "TO12041F02"
//   ws + upper     whitespace removed, uppercased
//   alnum + upper  accents stripped, non [0-9A-Z] removed, uppercased

use std::collections::BTreeSet;

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Strip a trailing purely alphabetic segment:
/// "TO12.04.1.F02.a" → "TO12.04.1.F02". Any other id is returned
/// unchanged (after trimming).
pub fn base_code(id: &str) -> String {
    let id = id.trim();
    if id.is_empty() {
        return String::new();
    }

    let parts: Vec<&str> = id.split('.').collect();
    match parts.split_last() {
        Some((last, head))
            if !head.is_empty()
                && !last.is_empty()
                && last.chars().all(char::is_alphabetic) =>
        {
            head.join(".")
        }
        _ => id.to_string(),
    }
}

/// Remove combining marks after canonical decomposition.
/// "Đ" has no decomposition and is kept as is.
pub fn strip_accents(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Remove all whitespace and uppercase; dots are kept.
pub fn norm_ws_upper(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// Strip accents, uppercase, then keep only ASCII [0-9A-Z].
pub fn norm_alnum_upper(s: &str) -> String {
    strip_accents(s)
        .to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        .collect()
}

/// All six comparison forms of a code. Forms that coincide collapse
/// through set semantics.
pub fn normalize_variants(s: &str) -> BTreeSet<String> {
    let raw   = s.trim().to_string();
    let nodot = raw.replace('.', "");

    BTreeSet::from([
        norm_ws_upper(&raw),
        norm_ws_upper(&nodot),
        norm_alnum_upper(&raw),
        norm_alnum_upper(&nodot),
        raw,
        nodot,
    ])
}
