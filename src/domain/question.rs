// ============================================================
// Layer 3 — QuestionRecord Domain Type
// ============================================================
// One record per recognised question. This is the interchange
// format between parsing, enrichment and Moodle export, and it is
// written to disk as JSON using the field names of the original
// question bank tooling (question_type, question_id, ...).
//
// Lifecycle:
//   opened     — when a "Câu N" header line is seen
//   mutated    — content / options / explanation appended
//   finalized  — type decided, key extracted, source stamped
//   enriched   — name / category only, by the enricher

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::block::TableData;

/// Fixed option order that `correct_answer` indices refer to.
pub const OPTION_LETTERS: &str = "ABCD";

/// The three question types produced by the segmenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    #[default]
    Multichoice,
    Kprime,
    Shortanswer,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Multichoice => "multichoice",
            QuestionType::Kprime      => "kprime",
            QuestionType::Shortanswer => "shortanswer",
        }
    }
}

/// One answer option, stored under its uppercase letter.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OptionRecord {
    #[serde(default)]
    pub letter: char,

    #[serde(rename = "option_text", default)]
    pub text: String,

    #[serde(rename = "option_image", default)]
    pub image: Option<String>,

    #[serde(rename = "option_table", default)]
    pub table: Option<TableData>,
}

/// Correct answers.
///
/// Choice questions store zero-based indices into the fixed letter
/// order "ABCD"; short-answer questions store accepted strings.
///
/// Reading is lenient: a list of non-negative integers is indices,
/// any other list (numbers, mixed, strings) is texts, a scalar is a
/// one-element list and null is empty. `QuestionRecord::normalize_answers`
/// then converts to the form the question type needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CorrectAnswer {
    Indices(Vec<usize>),
    Texts(Vec<String>),
}

impl<'de> Deserialize<'de> for CorrectAnswer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let v = Value::deserialize(deserializer)?;
        Ok(CorrectAnswer::from_value(&v))
    }
}

impl Default for CorrectAnswer {
    fn default() -> Self {
        CorrectAnswer::Indices(Vec::new())
    }
}

impl CorrectAnswer {
    pub fn from_value(v: &Value) -> Self {
        let items = match v {
            Value::Null       => return CorrectAnswer::default(),
            Value::Array(arr) => arr.as_slice(),
            scalar            => std::slice::from_ref(scalar),
        };

        let indices: Option<Vec<usize>> = items
            .iter()
            .map(|i| i.as_u64().map(|n| n as usize))
            .collect();

        match indices {
            Some(idx) => CorrectAnswer::Indices(idx),
            None => CorrectAnswer::Texts(
                items
                    .iter()
                    .filter(|i| !i.is_null())
                    .map(|i| match i {
                        Value::String(s) => s.clone(),
                        other            => other.to_string(),
                    })
                    .collect(),
            ),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CorrectAnswer::Indices(v) => v.is_empty(),
            CorrectAnswer::Texts(v)   => v.is_empty(),
        }
    }

    /// Indices for choice questions; a text list yields nothing.
    pub fn indices(&self) -> &[usize] {
        match self {
            CorrectAnswer::Indices(v) => v,
            CorrectAnswer::Texts(_)   => &[],
        }
    }

    /// Answers as strings, whichever form they were stored in.
    pub fn texts(&self) -> Vec<String> {
        match self {
            CorrectAnswer::Indices(v) => v.iter().map(|i| i.to_string()).collect(),
            CorrectAnswer::Texts(v)   => v.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Explanation {
    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub image: Option<String>,

    #[serde(rename = "table", default)]
    pub tables: Vec<TableData>,
}

/// Where a record came from in the source document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SourceInfo {
    #[serde(default)]
    pub file_name: String,

    #[serde(default)]
    pub full_path: String,

    /// 1-based position among finalized questions of the document
    #[serde(default)]
    pub question_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default = "default_difficulty")]
    pub difficulty: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub author: String,

    #[serde(default)]
    pub source: SourceInfo,
}

fn default_difficulty() -> String {
    "medium".to_string()
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            difficulty: default_difficulty(),
            tags:       Vec::new(),
            author:     String::new(),
            source:     SourceInfo::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuestionRecord {
    #[serde(rename = "question_type", default)]
    pub kind: QuestionType,

    #[serde(rename = "question_id", default)]
    pub id: String,

    #[serde(rename = "question_name", default)]
    pub name: String,

    #[serde(rename = "question_category", default)]
    pub category: String,

    #[serde(rename = "question_content", default)]
    pub content: String,

    #[serde(rename = "question_image", default)]
    pub content_image: Option<String>,

    #[serde(rename = "question_table", default)]
    pub content_tables: Vec<TableData>,

    #[serde(default)]
    pub options: Vec<OptionRecord>,

    #[serde(default)]
    pub correct_answer: CorrectAnswer,

    #[serde(default)]
    pub explanation: Explanation,

    #[serde(default)]
    pub metadata: Metadata,
}

impl QuestionRecord {
    /// Put `correct_answer` in the form the question type uses.
    /// Choice questions keep indices, reading "1" as 1 and a letter
    /// as its "ABCD" position; unreadable entries are dropped.
    /// Short-answer questions keep strings.
    pub fn normalize_answers(&mut self) {
        self.correct_answer = match (&self.kind, &self.correct_answer) {
            (QuestionType::Shortanswer, CorrectAnswer::Indices(_)) => {
                CorrectAnswer::Texts(self.correct_answer.texts())
            }
            (QuestionType::Multichoice | QuestionType::Kprime, CorrectAnswer::Texts(texts)) => {
                CorrectAnswer::Indices(texts.iter().filter_map(|t| choice_index(t)).collect())
            }
            _ => return,
        };
    }

    /// Open a fresh record. Name and category start as the nearest
    /// preceding heading text; the enricher may replace them later.
    pub fn open(
        id:      impl Into<String>,
        content: impl Into<String>,
        title:   &str,
        tags:    Vec<String>,
        author:  &str,
    ) -> Self {
        Self {
            id:       id.into(),
            name:     title.to_string(),
            category: title.to_string(),
            content:  content.into(),
            metadata: Metadata {
                tags,
                author: author.to_string(),
                ..Metadata::default()
            },
            ..Self::default()
        }
    }
}

fn choice_index(text: &str) -> Option<usize> {
    let t = text.trim();
    if let Ok(n) = t.parse::<usize>() {
        return Some(n);
    }
    let mut chars = t.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => OPTION_LETTERS.find(c.to_ascii_uppercase()),
        _ => None,
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_original_field_names() {
        let q = QuestionRecord::open("Q001", "1 + 1 = ?", "Chương 1", vec![], "GV");
        let v = serde_json::to_value(&q).unwrap();
        assert_eq!(v["question_type"], "multichoice");
        assert_eq!(v["question_id"], "Q001");
        assert_eq!(v["question_category"], "Chương 1");
        assert_eq!(v["metadata"]["difficulty"], "medium");
        assert!(v["explanation"]["table"].is_array());
    }

    #[test]
    fn test_correct_answer_shapes() {
        let idx: CorrectAnswer = serde_json::from_str("[0, 2]").unwrap();
        assert_eq!(idx, CorrectAnswer::Indices(vec![0, 2]));

        let txt: CorrectAnswer = serde_json::from_str(r#"["3.5", "3,5"]"#).unwrap();
        assert_eq!(txt.texts(), vec!["3.5", "3,5"]);
        assert!(txt.indices().is_empty());
    }

    #[test]
    fn test_legacy_answer_shapes() {
        let numeric: CorrectAnswer = serde_json::from_str("[3.5]").unwrap();
        assert_eq!(numeric, CorrectAnswer::Texts(vec!["3.5".into()]));

        let mixed: CorrectAnswer = serde_json::from_str(r#"[0, "1"]"#).unwrap();
        assert_eq!(mixed.texts(), vec!["0", "1"]);

        let scalar: CorrectAnswer = serde_json::from_str("2").unwrap();
        assert_eq!(scalar, CorrectAnswer::Indices(vec![2]));

        let null: CorrectAnswer = serde_json::from_str("null").unwrap();
        assert!(null.is_empty());
    }

    #[test]
    fn test_normalize_answers_by_type() {
        let mut choice = QuestionRecord {
            correct_answer: CorrectAnswer::Texts(vec!["0".into(), "c".into(), "x".into()]),
            ..QuestionRecord::default()
        };
        choice.normalize_answers();
        assert_eq!(choice.correct_answer, CorrectAnswer::Indices(vec![0, 2]));

        let mut short = QuestionRecord {
            kind:           QuestionType::Shortanswer,
            correct_answer: CorrectAnswer::Indices(vec![12]),
            ..QuestionRecord::default()
        };
        short.normalize_answers();
        assert_eq!(short.correct_answer, CorrectAnswer::Texts(vec!["12".into()]));
    }

    #[test]
    fn test_minimal_json_gets_defaults() {
        let q: QuestionRecord =
            serde_json::from_str(r#"{"question_type": "shortanswer", "question_id": "X"}"#).unwrap();
        assert_eq!(q.kind, QuestionType::Shortanswer);
        assert_eq!(q.metadata.difficulty, "medium");
        assert!(q.correct_answer.is_empty());
    }
}
