// ============================================================
// Layer 3 — AnswerEntry
// ============================================================
// Moodle answers have historically been written in three shapes:
//
//   "text"                              bare scalar
//   ["text", fraction]                  array / tuple
//   ["text", fraction, "feedback"]
//   {"text": .., "fraction": .., "feedback_html": ..}
//
// They are normalized once, on ingestion, into one tagged union.
// Renderers only ever see AnswerEntry.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum AnswerEntry {
    /// Text without a grade; the renderer supplies the default
    TextOnly(String),

    TextWithFraction {
        text:     String,
        fraction: f64,
    },

    TextWithFractionAndFeedback {
        text:     String,
        fraction: f64,
        feedback: String,
    },
}

impl AnswerEntry {
    pub fn graded(text: impl Into<String>, fraction: f64) -> Self {
        AnswerEntry::TextWithFraction { text: text.into(), fraction }
    }

    pub fn text(&self) -> &str {
        match self {
            AnswerEntry::TextOnly(t) => t,
            AnswerEntry::TextWithFraction { text, .. } => text,
            AnswerEntry::TextWithFractionAndFeedback { text, .. } => text,
        }
    }

    /// Grade as a Moodle percentage. Fractions in 0..=1 are read as
    /// ratios and scaled to 0..=100.
    pub fn percent(&self, default: i64) -> i64 {
        let raw = match self {
            AnswerEntry::TextOnly(_) => return default,
            AnswerEntry::TextWithFraction { fraction, .. } => *fraction,
            AnswerEntry::TextWithFractionAndFeedback { fraction, .. } => *fraction,
        };
        if (0.0..=1.0).contains(&raw) {
            (raw * 100.0) as i64
        } else {
            raw as i64
        }
    }

    pub fn feedback(&self) -> Option<&str> {
        match self {
            AnswerEntry::TextWithFractionAndFeedback { feedback, .. } if !feedback.is_empty() => {
                Some(feedback)
            }
            _ => None,
        }
    }

    /// Normalize any of the legacy JSON shapes.
    pub fn from_value(v: &Value) -> Self {
        match v {
            Value::Object(map) => {
                let text = map
                    .get("text")
                    .or_else(|| map.get("answer"))
                    .map(value_to_text)
                    .unwrap_or_default();
                let fraction = map.get("fraction").and_then(value_to_f64);
                let feedback = map
                    .get("feedback_html")
                    .or_else(|| map.get("feedback"))
                    .map(value_to_text)
                    .unwrap_or_default();
                Self::assemble(text, fraction, feedback)
            }
            Value::Array(items) => {
                let text     = items.first().map(value_to_text).unwrap_or_default();
                let fraction = items.get(1).and_then(value_to_f64);
                let feedback = items.get(2).map(value_to_text).unwrap_or_default();
                Self::assemble(text, fraction, feedback)
            }
            other => AnswerEntry::TextOnly(value_to_text(other)),
        }
    }

    fn assemble(text: String, fraction: Option<f64>, feedback: String) -> Self {
        match (fraction, feedback.is_empty()) {
            (None, _)          => AnswerEntry::TextOnly(text),
            (Some(f), true)    => AnswerEntry::TextWithFraction { text, fraction: f },
            (Some(f), false)   => AnswerEntry::TextWithFractionAndFeedback {
                text,
                fraction: f,
                feedback,
            },
        }
    }
}

impl<'de> Deserialize<'de> for AnswerEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let v = Value::deserialize(deserializer)?;
        Ok(AnswerEntry::from_value(&v))
    }
}

fn value_to_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null      => String::new(),
        other            => other.to_string(),
    }
}

fn value_to_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_is_text_only() {
        let a = AnswerEntry::from_value(&json!("42"));
        assert_eq!(a, AnswerEntry::TextOnly("42".into()));
        assert_eq!(a.percent(100), 100);
        assert_eq!(a.percent(0), 0);
    }

    #[test]
    fn test_ratio_fraction_is_scaled() {
        let a = AnswerEntry::from_value(&json!(["x", 0.5]));
        assert_eq!(a.percent(0), 50);
        let b = AnswerEntry::from_value(&json!(["x", 100]));
        assert_eq!(b.percent(0), 100);
    }

    #[test]
    fn test_object_with_feedback() {
        let a: AnswerEntry = serde_json::from_value(json!({
            "text": "Hà Nội",
            "fraction": 100,
            "feedback_html": "<b>đúng</b>"
        }))
        .unwrap();
        assert_eq!(a.text(), "Hà Nội");
        assert_eq!(a.feedback(), Some("<b>đúng</b>"));
    }
}
