// ============================================================
// Layer 5 — Quiz Document
// ============================================================
// A quiz is an ordered list of items. Each question may be preceded
// by a category entry; Moodle files every following question under
// the most recent category, so a category is only written when it
// differs from the previous one.
//
//   <?xml version="1.0" ?>
//   <quiz>
//   <question type="category"> ... </question>
//   <question type="multichoice"> ... </question>
//   ...
//   </quiz>

use anyhow::{Context, Result};
use std::{fs, path::Path};

use crate::moodle::html::xml_escape;
use crate::moodle::question::MoodleQuestion;

#[derive(Debug)]
enum QuizItem {
    Category(String),
    Question(Box<dyn MoodleQuestion>),
}

#[derive(Debug, Default)]
pub struct MoodleQuiz {
    items:         Vec<QuizItem>,
    last_category: Option<String>,
}

impl MoodleQuiz {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a category entry before the next question.
    /// Surrounding whitespace and slashes are trimmed; empty and "0"
    /// are ignored, as is a repeat of the previous category.
    pub fn add_category(&mut self, category: &str) {
        let cat = category.trim().trim_matches('/').trim();
        if cat.is_empty() || cat == "0" {
            return;
        }
        if self.last_category.as_deref() == Some(cat) {
            return;
        }
        self.items.push(QuizItem::Category(cat.to_string()));
        self.last_category = Some(cat.to_string());
    }

    pub fn add_question(&mut self, question: Box<dyn MoodleQuestion>) {
        self.items.push(QuizItem::Question(question));
    }

    pub fn question_count(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i, QuizItem::Question(_)))
            .count()
    }

    pub fn category_count(&self) -> usize {
        self.items.len() - self.question_count()
    }

    pub fn to_xml(&self) -> String {
        let mut parts = vec![r#"<?xml version="1.0" ?>"#.to_string(), "<quiz>".to_string()];

        for item in &self.items {
            match item {
                QuizItem::Category(cat) => parts.push(format!(
                    "<question type=\"category\">\n  <category><text>{}</text></category>\n</question>",
                    xml_escape(cat)
                )),
                QuizItem::Question(q) => parts.push(q.to_xml()),
            }
        }

        parts.push("</quiz>".to_string());
        parts.join("\n")
    }

    /// Write the quiz as UTF-8, creating parent directories.
    pub fn export(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create directory '{}'", parent.display()))?;
        }
        fs::write(path, self.to_xml())
            .with_context(|| format!("Cannot write quiz '{}'", path.display()))?;
        tracing::info!(
            "Wrote '{}' ({} questions, {} categories)",
            path.display(),
            self.question_count(),
            self.category_count()
        );
        Ok(())
    }
}
