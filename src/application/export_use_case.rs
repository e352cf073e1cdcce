// ============================================================
// Layer 2 — ExportUseCase
// ============================================================
// Question JSON → Moodle XML:
//
//   Step 1: Read the question JSON   (Layer 6 - infra/question_store)
//   Step 2: Build the quiz           (Layer 5 - moodle/builder)
//   Step 3: Write the XML file       (Layer 5 - moodle/quiz)

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::domain::question::QuestionRecord;
use crate::infra::question_store::read_questions;
use crate::moodle::builder::{build_quiz, ExportCounts};

/// Default XML file name inside an output directory
pub const MOODLE_XML_FILE: &str = "moodle.xml";

#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub xml_path: PathBuf,
    pub counts:   ExportCounts,
}

pub struct ExportUseCase;

impl ExportUseCase {
    /// Export the questions of `json_path` to `xml_out`.
    pub fn run(json_path: &Path, xml_out: &Path) -> Result<ExportOutcome> {
        let records = read_questions(json_path)?;
        Self::export_records(&records, xml_out)
    }

    pub fn export_records(records: &[QuestionRecord], xml_out: &Path) -> Result<ExportOutcome> {
        let (quiz, counts) = build_quiz(records);
        quiz.export(xml_out)?;

        tracing::info!(
            "Exported '{}' | MCQ: {} | KPrime: {} | SA: {}",
            xml_out.display(),
            counts.multichoice,
            counts.kprime,
            counts.shortanswer
        );
        Ok(ExportOutcome { xml_path: xml_out.to_path_buf(), counts })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::question_store::write_questions;
    use std::fs;

    #[test]
    fn test_json_to_xml() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("questionsTF.json");
        fs::write(
            &json,
            r#"[
                {"//": "===== Câu 1 ====="},
                {"question_type": "shortanswer", "question_id": "S1",
                 "question_category": "Toán 12", "question_content": "1 + 2 = ?",
                 "correct_answer": ["3"]}
            ]"#,
        )
        .unwrap();

        let xml = dir.path().join("out").join(MOODLE_XML_FILE);
        let outcome = ExportUseCase::run(&json, &xml).unwrap();
        assert_eq!(outcome.counts.shortanswer, 1);

        let text = fs::read_to_string(&xml).unwrap();
        assert!(text.contains("<category><text>Toán 12</text></category>"));
        assert!(text.contains(r#"<question type="shortanswer">"#));
        assert!(text.contains("<![CDATA[3]]>"));
    }

    #[test]
    fn test_empty_list_gives_empty_quiz() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("q.json");
        write_questions(&json, &[]).unwrap();

        let xml = dir.path().join("q.xml");
        let outcome = ExportUseCase::run(&json, &xml).unwrap();
        assert_eq!(outcome.counts.total(), 0);
        assert_eq!(fs::read_to_string(&xml).unwrap(), "<?xml version=\"1.0\" ?>\n<quiz>\n</quiz>");
    }
}
