// ============================================================
// Layer 6 — Question JSON Store
// ============================================================
// Reads and writes the question list as pretty-printed UTF-8 JSON.
//
// Reading is lenient about what older tools left in the file:
//   - a single object instead of a list
//   - separator entries such as {"//": "===== Câu 3 ====="}
//   - question types this tool does not render (read as multichoice)
// Entries that are not objects or carry no "question_type" are skipped.

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::{fs, path::Path};

use crate::domain::question::QuestionRecord;

/// File name used for the parsed question list
pub const QUESTIONS_FILE: &str = "questionsTF.json";

const KNOWN_TYPES: [&str; 3] = ["multichoice", "kprime", "shortanswer"];

pub fn write_questions(path: impl AsRef<Path>, records: &[QuestionRecord]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json).with_context(|| format!("Cannot write '{}'", path.display()))?;

    tracing::info!("Wrote {} questions to '{}'", records.len(), path.display());
    Ok(())
}

pub fn read_questions(path: impl AsRef<Path>) -> Result<Vec<QuestionRecord>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;
    let root: Value = serde_json::from_str(&raw)
        .with_context(|| format!("'{}' is not valid JSON", path.display()))?;

    let items = match root {
        Value::Array(items) => items,
        obj @ Value::Object(_) => vec![obj],
        _ => bail!("'{}' holds neither a question list nor a question", path.display()),
    };

    let mut records = Vec::with_capacity(items.len());
    for (i, mut item) in items.into_iter().enumerate() {
        let Some(obj) = item.as_object_mut() else {
            continue;
        };
        let Some(kind) = obj.get("question_type") else {
            continue;
        };

        let kind = kind.as_str().unwrap_or_default().to_string();
        if !KNOWN_TYPES.contains(&kind.as_str()) {
            tracing::warn!("Entry {}: unsupported type '{}', exported as multichoice", i, kind);
            obj.insert("question_type".into(), Value::from("multichoice"));
        }

        let mut record: QuestionRecord = serde_json::from_value(item)
            .with_context(|| format!("'{}': entry {} is not a question record", path.display(), i))?;
        record.normalize_answers();
        records.push(record);
    }

    tracing::debug!("Read {} questions from '{}'", records.len(), path.display());
    Ok(records)
}
