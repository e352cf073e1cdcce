// ============================================================
// Layer 4 — Key / Answer Extractor
// ============================================================
// Short-answer questions carry their numeric key in one of two ways:
//
//   1. An inline marker in the question body:   "... <Key=3,5>"
//   2. An answer phrase in the worked solution: "Đáp số: 3,5"
//      (also "Trả lời", "Đáp án", "Kết quả", with ":" or "：")
//
// The marker wins and is removed from the content. Decimal answers
// are returned in both separator forms because students type either.

use once_cell::sync::Lazy;
use regex::Regex;

static KEY_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<\s*Key\s*=\s*([-+]?\d+(?:[.,]\d+)?)\s*>").unwrap()
});

static ANSWER_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:Tr(?:ả|a)\s*l(?:ờ|o)i|Đáp\s*án|Đáp\s*số|Kết\s*quả)\s*[:：]\s*([-+]?\d+(?:[.,]\d+)?)",
    )
    .unwrap()
});

static BARE_INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-+]?\d+$").unwrap());

/// Result of scanning a question for its key.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KeyExtraction {
    /// Accepted answer strings; empty when no key was found
    pub answers: Vec<String>,

    /// Content with every `<Key=..>` marker removed and trimmed
    /// when a marker was found; the input unchanged otherwise
    pub cleaned_content: String,
}

/// Scan `content` for an inline key marker, then `explanation` for an
/// answer phrase. Pure: inputs are only read.
pub fn extract_key(content: &str, explanation: &str) -> KeyExtraction {
    if let Some(caps) = KEY_MARKER.captures(content) {
        let answers = number_variants(&caps[1]);
        let cleaned = KEY_MARKER.replace_all(content, "").trim().to_string();
        return KeyExtraction { answers, cleaned_content: cleaned };
    }

    let answers = if explanation.trim().is_empty() {
        Vec::new()
    } else {
        ANSWER_PHRASE
            .captures(explanation)
            .map(|caps| number_variants(&caps[1]))
            .unwrap_or_default()
    };

    KeyExtraction { answers, cleaned_content: content.to_string() }
}

/// Accepted spellings of a captured number.
///
///   "+7"   → ["7"]
///   "3.5"  → ["3.5", "3,5"]
///   "-0,25"→ ["-0.25", "-0,25"]
pub fn number_variants(num: &str) -> Vec<String> {
    let s = num.trim();
    if s.is_empty() {
        return Vec::new();
    }
    if BARE_INTEGER.is_match(s) {
        return vec![s.trim_start_matches('+').to_string()];
    }

    let dot   = s.replace(',', ".").trim_start_matches('+').to_string();
    let comma = s.replace('.', ",").trim_start_matches('+').to_string();

    let mut out = vec![dot];
    if !out.contains(&comma) {
        out.push(comma);
    }
    out
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_is_extracted_and_removed() {
        let r = extract_key("Tính x. <Key=3.5>", "");
        assert_eq!(r.answers, vec!["3.5", "3,5"]);
        assert_eq!(r.cleaned_content, "Tính x.");
    }

    #[test]
    fn test_marker_is_case_insensitive_and_spaced() {
        let r = extract_key("< key = -12 > Tìm m", "");
        assert_eq!(r.answers, vec!["-12"]);
        assert_eq!(r.cleaned_content, "Tìm m");
    }

    #[test]
    fn test_plus_sign_is_dropped() {
        assert_eq!(number_variants("+7"), vec!["7"]);
        assert_eq!(number_variants("+0,5"), vec!["0.5", "0,5"]);
    }

    #[test]
    fn test_explanation_phrase_is_fallback() {
        let r = extract_key("Tính tích phân", "Ta có ...\nĐáp số: 2,25");
        assert_eq!(r.answers, vec!["2.25", "2,25"]);
        assert_eq!(r.cleaned_content, "Tính tích phân");

        let r = extract_key("x", "tra loi：4");
        assert_eq!(r.answers, vec!["4"]);
    }

    #[test]
    fn test_no_key_keeps_content_untouched() {
        let r = extract_key("  Nội dung  ", "Lời giải dài, không có số");
        assert!(r.answers.is_empty());
        assert_eq!(r.cleaned_content, "  Nội dung  ");
    }

    #[test]
    fn test_second_pass_finds_nothing() {
        let first  = extract_key("Câu hỏi <Key=1,5>", "");
        let second = extract_key(&first.cleaned_content, "");
        assert!(second.answers.is_empty());
        assert_eq!(second.cleaned_content, first.cleaned_content);
    }

    #[test]
    fn test_marker_wins_over_phrase() {
        let r = extract_key("<Key=1>", "Đáp án: 2");
        assert_eq!(r.answers, vec!["1"]);
        assert_eq!(r.cleaned_content, "");
    }
}
