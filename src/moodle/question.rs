// ============================================================
// Layer 5 — Question Renderers
// ============================================================
// Each renderer emits exactly one <question type="..."> element.
// Categories are never rendered here; MoodleQuiz interleaves them.
//
// Fixed grading settings per type:
//
//   type         defaultgrade  penalty    extras
//   multichoice  1             0.3333333  single, shuffled, ABCD
//   kprime       1             0.3333333  2 columns True/False
//   shortanswer  1             0.1        usecase 0

use crate::domain::answer::AnswerEntry;
use crate::domain::question::QuestionType;
use crate::moodle::html::{cdata, xml_escape};

/// A question that can be written into a Moodle quiz.
pub trait MoodleQuestion: std::fmt::Debug {
    fn kind(&self) -> QuestionType;

    fn to_xml(&self) -> String;
}

fn push_header(lines: &mut Vec<String>, kind: QuestionType, name: &str, text_html: &str) {
    lines.push(format!(r#"<question type="{}">"#, kind.as_str()));
    lines.push(format!("  <name><text>{}</text></name>", xml_escape(name)));
    lines.push(r#"  <questiontext format="html">"#.to_string());
    lines.push(format!("    <text>{}</text>", cdata(text_html)));
    lines.push("  </questiontext>".to_string());
}

fn push_general_feedback(lines: &mut Vec<String>, feedback_html: &str) {
    lines.push(r#"  <generalfeedback format="html">"#.to_string());
    lines.push(format!("    <text>{}</text>", cdata(feedback_html)));
    lines.push("  </generalfeedback>".to_string());
}

fn push_answers(lines: &mut Vec<String>, answers: &[AnswerEntry], default_percent: i64) {
    for answer in answers {
        lines.push(format!(r#"  <answer fraction="{}">"#, answer.percent(default_percent)));
        lines.push(format!("    <text>{}</text>", cdata(&answer.text())));
        if let Some(feedback) = answer.feedback() {
            lines.push(r#"    <feedback format="html">"#.to_string());
            lines.push(format!("      <text>{}</text>", cdata(&feedback)));
            lines.push("    </feedback>".to_string());
        }
        lines.push("  </answer>".to_string());
    }
}

fn flag(b: bool) -> &'static str {
    if b { "true" } else { "false" }
}

// ─── Multichoice ──────────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq)]
pub struct MultiChoiceQuestion {
    pub name:          String,
    pub text_html:     String,
    pub answers:       Vec<AnswerEntry>,
    pub feedback_html: String,
    pub shuffle:       bool,
    pub single:        bool,
    pub numbering:     String,
    pub default_grade: f64,
    pub penalty:       f64,
}

impl MultiChoiceQuestion {
    pub fn new(
        name:          impl Into<String>,
        text_html:     impl Into<String>,
        answers:       Vec<AnswerEntry>,
        feedback_html: impl Into<String>,
    ) -> Self {
        Self {
            name:          name.into(),
            text_html:     text_html.into(),
            answers,
            feedback_html: feedback_html.into(),
            shuffle:       true,
            single:        true,
            numbering:     "ABCD".to_string(),
            default_grade: 1.0,
            penalty:       0.3333333,
        }
    }
}

impl MoodleQuestion for MultiChoiceQuestion {
    fn kind(&self) -> QuestionType {
        QuestionType::Multichoice
    }

    fn to_xml(&self) -> String {
        let mut lines = Vec::new();
        push_header(&mut lines, self.kind(), &self.name, &self.text_html);
        push_general_feedback(&mut lines, &self.feedback_html);
        lines.push(format!("  <shuffleanswers>{}</shuffleanswers>", flag(self.shuffle)));
        lines.push(format!("  <single>{}</single>", flag(self.single)));
        lines.push(format!("  <answernumbering>{}</answernumbering>", xml_escape(&self.numbering)));
        lines.push(format!("  <defaultgrade>{}</defaultgrade>", self.default_grade));
        lines.push(format!("  <penalty>{}</penalty>", self.penalty));
        lines.push("  <hidden>0</hidden>".to_string());
        push_answers(&mut lines, &self.answers, 0);
        lines.push("</question>".to_string());
        lines.join("\n")
    }
}

// ─── Short answer ─────────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq)]
pub struct ShortAnswerQuestion {
    pub name:          String,
    pub text_html:     String,
    pub answers:       Vec<AnswerEntry>,
    pub feedback_html: String,
    pub default_grade: f64,
    pub penalty:       f64,

    /// 0 = case-insensitive
    pub use_case: u8,
}

impl ShortAnswerQuestion {
    pub fn new(
        name:          impl Into<String>,
        text_html:     impl Into<String>,
        answers:       Vec<AnswerEntry>,
        feedback_html: impl Into<String>,
    ) -> Self {
        Self {
            name:          name.into(),
            text_html:     text_html.into(),
            answers,
            feedback_html: feedback_html.into(),
            default_grade: 1.0,
            penalty:       0.1,
            use_case:      0,
        }
    }
}

impl MoodleQuestion for ShortAnswerQuestion {
    fn kind(&self) -> QuestionType {
        QuestionType::Shortanswer
    }

    fn to_xml(&self) -> String {
        let mut lines = Vec::new();
        push_header(&mut lines, self.kind(), &self.name, &self.text_html);
        push_general_feedback(&mut lines, &self.feedback_html);
        lines.push(format!("  <defaultgrade>{}</defaultgrade>", self.default_grade));
        lines.push(format!("  <penalty>{}</penalty>", self.penalty));
        lines.push("  <hidden>0</hidden>".to_string());
        lines.push(format!("  <usecase>{}</usecase>", self.use_case));
        // a bare accepted answer is full credit
        push_answers(&mut lines, &self.answers, 100);
        lines.push("</question>".to_string());
        lines.join("\n")
    }
}

// ─── Kprime ───────────────────────────────────────────────────────────────────
/// One true/false statement of a kprime question.
#[derive(Debug, Clone, PartialEq)]
pub struct KprimeRow {
    pub statement_html: String,
    pub is_true:        bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KprimeQuestion {
    pub name:          String,
    pub text_html:     String,
    pub rows:          Vec<KprimeRow>,
    pub feedback_html: String,
    pub shuffle:       bool,
}

impl KprimeQuestion {
    pub fn new(
        name:          impl Into<String>,
        text_html:     impl Into<String>,
        rows:          Vec<KprimeRow>,
        feedback_html: impl Into<String>,
    ) -> Self {
        Self {
            name:          name.into(),
            text_html:     text_html.into(),
            rows,
            feedback_html: feedback_html.into(),
            shuffle:       true,
        }
    }
}

impl MoodleQuestion for KprimeQuestion {
    fn kind(&self) -> QuestionType {
        QuestionType::Kprime
    }

    fn to_xml(&self) -> String {
        let mut lines = Vec::new();
        push_header(&mut lines, self.kind(), &self.name, &self.text_html);
        if !self.feedback_html.is_empty() {
            push_general_feedback(&mut lines, &self.feedback_html);
        }
        lines.push("  <defaultgrade>1</defaultgrade>".to_string());
        lines.push("  <penalty>0.3333333</penalty>".to_string());
        lines.push("  <hidden>0</hidden>".to_string());
        lines.push("  <scoringmethod>kprime</scoringmethod>".to_string());
        lines.push(format!("  <shuffleanswers>{}</shuffleanswers>", flag(self.shuffle)));
        lines.push(format!("  <numberofrows>{}</numberofrows>", self.rows.len()));
        lines.push("  <numberofcolumns>2</numberofcolumns>".to_string());

        for (i, row) in self.rows.iter().enumerate() {
            lines.push(format!(r#"  <row number="{}">"#, i + 1));
            lines.push(r#"    <optiontext format="html">"#.to_string());
            lines.push(format!("      <text>{}</text>", cdata(&row.statement_html)));
            lines.push("    </optiontext>".to_string());
            lines.push(r#"    <feedbacktext format="html"><text></text></feedbacktext>"#.to_string());
            lines.push("  </row>".to_string());
        }

        for (n, label) in [(1, "True"), (2, "False")] {
            lines.push(format!(r#"  <column number="{n}">"#));
            lines.push(format!("    <responsetext>{label}</responsetext>"));
            lines.push("  </column>".to_string());
        }

        for (i, row) in self.rows.iter().enumerate() {
            let (t, f) = if row.is_true { ("1.000", "0.000") } else { ("0.000", "1.000") };
            lines.push(format!(
                r#"  <weight rownumber="{}" columnnumber="1"><value>{t}</value></weight>"#,
                i + 1
            ));
            lines.push(format!(
                r#"  <weight rownumber="{}" columnnumber="2"><value>{f}</value></weight>"#,
                i + 1
            ));
        }

        lines.push("</question>".to_string());
        lines.join("\n")
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multichoice_xml() {
        let q = MultiChoiceQuestion::new(
            "Q1 & co",
            "1 + 1 = ?",
            vec![AnswerEntry::graded("2", 100.0), AnswerEntry::graded("3", 0.0)],
            "",
        );
        let xml = q.to_xml();
        assert!(xml.starts_with(r#"<question type="multichoice">"#));
        assert!(xml.contains("<name><text>Q1 &amp; co</text></name>"));
        assert!(xml.contains("<![CDATA[1 + 1 = ?]]>"));
        assert!(xml.contains("<single>true</single>"));
        assert!(xml.contains("<defaultgrade>1</defaultgrade>"));
        assert!(xml.contains("<penalty>0.3333333</penalty>"));
        assert!(xml.contains(r#"<answer fraction="100">"#));
        assert!(xml.contains(r#"<answer fraction="0">"#));
        assert!(xml.ends_with("</question>"));
    }

    #[test]
    fn test_ratio_fraction_and_feedback() {
        let q = MultiChoiceQuestion::new(
            "q",
            "t",
            vec![AnswerEntry::TextWithFractionAndFeedback {
                text:     "x".into(),
                fraction: 0.5,
                feedback: "<b>ok</b>".into(),
            }],
            "",
        );
        let xml = q.to_xml();
        assert!(xml.contains(r#"<answer fraction="50">"#));
        assert!(xml.contains("<![CDATA[<b>ok</b>]]>"));
    }

    #[test]
    fn test_cdata_terminator_in_content_stays_inside() {
        let q = MultiChoiceQuestion::new(
            "q",
            "a[b[0]]>c",
            vec![AnswerEntry::graded("x]]>", 100.0)],
            "f]]>",
        );
        let xml = q.to_xml();
        assert!(xml.contains("<![CDATA[a[b[0]]]]><![CDATA[>c]]>"));
        assert!(xml.contains("<![CDATA[x]]]]><![CDATA[>]]>"));
        assert_eq!(xml.matches("]]>").count(), xml.matches("<![CDATA[").count());
    }

    #[test]
    fn test_shortanswer_defaults_to_full_credit() {
        let q = ShortAnswerQuestion::new(
            "SA",
            "Tính x",
            vec![AnswerEntry::TextOnly("3.5".into()), AnswerEntry::TextOnly("3,5".into())],
            "Đáp số: 3,5",
        );
        let xml = q.to_xml();
        assert!(xml.contains("<penalty>0.1</penalty>"));
        assert!(xml.contains("<usecase>0</usecase>"));
        assert_eq!(xml.matches(r#"<answer fraction="100">"#).count(), 2);
    }

    #[test]
    fn test_kprime_weights() {
        let q = KprimeQuestion::new(
            "K",
            "Xét các mệnh đề",
            vec![
                KprimeRow { statement_html: "a".into(), is_true: true },
                KprimeRow { statement_html: "b".into(), is_true: false },
            ],
            "",
        );
        let xml = q.to_xml();
        assert!(!xml.contains("generalfeedback"));
        assert!(xml.contains("<numberofrows>2</numberofrows>"));
        assert!(xml.contains(r#"<weight rownumber="1" columnnumber="1"><value>1.000</value></weight>"#));
        assert!(xml.contains(r#"<weight rownumber="2" columnnumber="2"><value>1.000</value></weight>"#));
        assert!(xml.contains(r#"<weight rownumber="2" columnnumber="1"><value>0.000</value></weight>"#));
        assert!(xml.contains("<responsetext>False</responsetext>"));
    }
}
