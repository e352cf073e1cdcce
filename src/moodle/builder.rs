// ============================================================
// Layer 5 — Quiz Builder
// ============================================================
// Turns question records into Moodle questions.
//
// Body assembly, per record:
//   question text  = content + image block + tables
//   feedback       = explanation image + explanation text + tables
//   option text    = option text + image block + table
//
// Short-answer keys are looked up in order:
//   1. <Key=..> marker in the text, or an answer phrase in the feedback
//   2. the first number in the stored correct answers, else the
//      first stored answer verbatim
//   3. the first number anywhere in text + feedback
//   4. a single empty answer, so the file still imports

use once_cell::sync::Lazy;
use regex::Regex;

use crate::data::key_extractor::{extract_key, number_variants};
use crate::domain::answer::AnswerEntry;
use crate::domain::question::{OptionRecord, QuestionRecord, QuestionType, OPTION_LETTERS};
use crate::moodle::html::{img_html, table_html, tables_html};
use crate::moodle::question::{
    KprimeQuestion, KprimeRow, MoodleQuestion, MultiChoiceQuestion, ShortAnswerQuestion,
};
use crate::moodle::quiz::MoodleQuiz;

static FIRST_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-+]?\d+(?:[.,]\d+)?").unwrap());

/// Number of questions rendered per type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportCounts {
    pub multichoice: usize,
    pub kprime:      usize,
    pub shortanswer: usize,
}

impl ExportCounts {
    pub fn total(&self) -> usize {
        self.multichoice + self.kprime + self.shortanswer
    }
}

pub fn build_quiz(records: &[QuestionRecord]) -> (MoodleQuiz, ExportCounts) {
    let mut quiz   = MoodleQuiz::new();
    let mut counts = ExportCounts::default();

    for record in records {
        quiz.add_category(&record.category);

        let question: Box<dyn MoodleQuestion> = match record.kind {
            QuestionType::Multichoice => {
                counts.multichoice += 1;
                Box::new(multichoice(record))
            }
            QuestionType::Kprime => {
                counts.kprime += 1;
                Box::new(kprime(record))
            }
            QuestionType::Shortanswer => {
                counts.shortanswer += 1;
                Box::new(shortanswer(record))
            }
        };
        quiz.add_question(question);
    }

    tracing::info!(
        "Built quiz: {} multichoice, {} kprime, {} shortanswer",
        counts.multichoice,
        counts.kprime,
        counts.shortanswer
    );
    (quiz, counts)
}

fn question_name(record: &QuestionRecord) -> String {
    let id = record.id.trim();
    let id = if id.is_empty() { "noid" } else { id };
    match record.name.trim() {
        ""   => id.to_string(),
        name => name.to_string(),
    }
}

fn question_html(record: &QuestionRecord, qname: &str) -> String {
    let mut html = record.content.clone();
    if let Some(src) = &record.content_image {
        html.push_str(&img_html(src, qname));
    }
    html.push_str(&tables_html(&record.content_tables));
    html
}

fn feedback_html(record: &QuestionRecord, qname: &str) -> String {
    let exp = &record.explanation;
    let mut html = exp
        .image
        .as_deref()
        .map(|src| img_html(src, &format!("explain-{qname}")))
        .unwrap_or_default();
    html.push_str(&exp.text);
    html.push_str(&tables_html(&exp.tables));
    html
}

fn option_html(option: &OptionRecord, position: usize, qname: &str) -> String {
    let mut html = option.text.clone();
    if let Some(src) = &option.image {
        html.push_str(&img_html(src, &format!("opt-{}-{qname}", position + 1)));
    }
    if let Some(table) = &option.table {
        html.push_str(&table_html(table));
    }
    html
}

/// Position of an option in the fixed "ABCD" order, which is what
/// `correct_answer` indexes. Records without letters use list order.
fn letter_slot(option: &OptionRecord, position: usize) -> usize {
    OPTION_LETTERS
        .find(option.letter.to_ascii_uppercase())
        .unwrap_or(position)
}

fn multichoice(record: &QuestionRecord) -> MultiChoiceQuestion {
    let qname   = question_name(record);
    let correct = record.correct_answer.indices();

    let answers = record
        .options
        .iter()
        .enumerate()
        .map(|(i, opt)| {
            let grade = if correct.contains(&letter_slot(opt, i)) { 100.0 } else { 0.0 };
            AnswerEntry::graded(option_html(opt, i, &qname), grade)
        })
        .collect();

    MultiChoiceQuestion::new(
        qname.clone(),
        question_html(record, &qname),
        answers,
        feedback_html(record, &qname),
    )
}

fn kprime(record: &QuestionRecord) -> KprimeQuestion {
    let qname   = question_name(record);
    let correct = record.correct_answer.indices();

    let rows = record
        .options
        .iter()
        .enumerate()
        .map(|(i, opt)| KprimeRow {
            statement_html: option_html(opt, i, &qname),
            is_true:        correct.contains(&letter_slot(opt, i)),
        })
        .collect();

    KprimeQuestion::new(
        qname.clone(),
        question_html(record, &qname),
        rows,
        feedback_html(record, &qname),
    )
}

fn shortanswer(record: &QuestionRecord) -> ShortAnswerQuestion {
    let qname    = question_name(record);
    let text     = question_html(record, &qname);
    let feedback = feedback_html(record, &qname);

    let key = extract_key(&text, &feedback);
    let mut answers = key.answers;

    if answers.is_empty() && !record.correct_answer.is_empty() {
        let stored = record.correct_answer.texts();
        answers = match FIRST_NUMBER.find(&stored.join(" ")) {
            Some(m) => number_variants(m.as_str()),
            None    => stored.first().map(|s| vec![s.trim().to_string()]).unwrap_or_default(),
        };
    }

    if answers.is_empty() {
        if let Some(m) = FIRST_NUMBER.find(&format!("{text} {feedback}")) {
            answers = number_variants(m.as_str());
        }
    }

    if answers.is_empty() {
        tracing::warn!("'{}': no short-answer key found, exporting an empty answer", qname);
        answers.push(String::new());
    }

    ShortAnswerQuestion::new(
        qname,
        key.cleaned_content.trim(),
        answers.into_iter().map(AnswerEntry::TextOnly).collect(),
        feedback,
    )
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::block::TableData;
    use crate::domain::question::{CorrectAnswer, Explanation};

    fn option(letter: char, text: &str) -> OptionRecord {
        OptionRecord { letter, text: text.into(), image: None, table: None }
    }

    fn choice(kind: QuestionType, correct: Vec<usize>) -> QuestionRecord {
        QuestionRecord {
            kind,
            id:             "Q1".into(),
            category:       "Toán 12".into(),
            content:        "Chọn mệnh đề đúng".into(),
            options:        vec![option('A', "a"), option('B', "b"), option('C', "c"), option('D', "d")],
            correct_answer: CorrectAnswer::Indices(correct),
            ..QuestionRecord::default()
        }
    }

    fn short(content: &str, explanation: &str, stored: Vec<&str>) -> QuestionRecord {
        QuestionRecord {
            kind:           QuestionType::Shortanswer,
            id:             "SA1".into(),
            content:        content.into(),
            correct_answer: CorrectAnswer::Texts(stored.into_iter().map(String::from).collect()),
            explanation:    Explanation { text: explanation.into(), ..Explanation::default() },
            ..QuestionRecord::default()
        }
    }

    #[test]
    fn test_counts_and_category_entries() {
        let records = vec![
            choice(QuestionType::Multichoice, vec![1]),
            choice(QuestionType::Kprime, vec![0, 2]),
            short("x <Key=2>", "", vec![]),
        ];
        let (quiz, counts) = build_quiz(&records);
        assert_eq!(counts, ExportCounts { multichoice: 1, kprime: 1, shortanswer: 1 });
        assert_eq!(counts.total(), 3);
        // two consecutive "Toán 12" collapse, the short answer has none
        assert_eq!(quiz.category_count(), 1);
    }

    #[test]
    fn test_multichoice_marks_correct_index() {
        let xml = multichoice(&choice(QuestionType::Multichoice, vec![1])).to_xml();
        let b = xml.find("<![CDATA[b]]>").unwrap();
        let full = xml.find(r#"<answer fraction="100">"#).unwrap();
        assert!(full < b);
        assert_eq!(xml.matches(r#"<answer fraction="0">"#).count(), 3);
        assert!(xml.contains("<name><text>Q1</text></name>"));
    }

    #[test]
    fn test_correct_index_follows_letters_not_positions() {
        let mut record = choice(QuestionType::Multichoice, vec![3]);
        record.options = vec![option('C', "c"), option('D', "d")];

        let xml = multichoice(&record).to_xml();
        let d = xml.find("<![CDATA[d]]>").unwrap();
        let full = xml.find(r#"<answer fraction="100">"#).unwrap();
        assert!(full < d);
        assert_eq!(xml.matches(r#"<answer fraction="100">"#).count(), 1);

        record.kind = QuestionType::Kprime;
        record.options = vec![option('A', "a"), option('B', "b"), option('D', "d")];
        let truth: Vec<bool> = kprime(&record).rows.iter().map(|r| r.is_true).collect();
        assert_eq!(truth, vec![false, false, true]);
    }

    #[test]
    fn test_unlettered_options_use_list_order() {
        let mut record = choice(QuestionType::Multichoice, vec![0]);
        record.options = vec![option('\0', "x"), option('\0', "y")];
        let xml = multichoice(&record).to_xml();
        let x = xml.find("<![CDATA[x]]>").unwrap();
        assert!(xml.find(r#"<answer fraction="100">"#).unwrap() < x);
    }

    #[test]
    fn test_kprime_rows_follow_options() {
        let q = kprime(&choice(QuestionType::Kprime, vec![0, 2]));
        let truth: Vec<bool> = q.rows.iter().map(|r| r.is_true).collect();
        assert_eq!(truth, vec![true, false, true, false]);
    }

    #[test]
    fn test_images_and_tables_are_embedded() {
        let mut rec = choice(QuestionType::Multichoice, vec![0]);
        rec.content_image = Some("images/Q1_content_0_0_0.png".into());
        rec.content_tables = vec![TableData { headers: vec!["x".into()], rows: vec![] }];
        rec.options[0].image = Some("images/Q1_optA_1_0_0.png".into());
        rec.explanation = Explanation {
            text:   "Vì vậy".into(),
            image:  Some("images/Q1_explanation_5_0_0.png".into()),
            tables: vec![],
        };

        let q = multichoice(&rec);
        assert!(q.text_html.starts_with("Chọn mệnh đề đúng<div"));
        assert!(q.text_html.ends_with("</table></div>"));
        assert!(q.answers[0].text().contains(r#"alt="opt-1-Q1""#));
        assert!(q.feedback_html.starts_with("<div"));
        assert!(q.feedback_html.ends_with("Vì vậy"));
    }

    #[test]
    fn test_shortanswer_marker_wins() {
        let q = shortanswer(&short("Tính x <Key=1,5>", "Đáp số: 9", vec!["7"]));
        let texts: Vec<&str> = q.answers.iter().map(|a| a.text()).collect();
        assert_eq!(texts, vec!["1.5", "1,5"]);
        assert_eq!(q.text_html, "Tính x");
    }

    #[test]
    fn test_shortanswer_answer_phrase_in_feedback() {
        let q = shortanswer(&short("Tính x", "Trả lời: 42", vec![]));
        assert_eq!(q.answers, vec![AnswerEntry::TextOnly("42".into())]);
    }

    #[test]
    fn test_shortanswer_stored_answers() {
        let q = shortanswer(&short("Tính x", "", vec!["khoảng 2.25 mét"]));
        let texts: Vec<&str> = q.answers.iter().map(|a| a.text()).collect();
        assert_eq!(texts, vec!["2.25", "2,25"]);

        let q = shortanswer(&short("Thủ đô?", "", vec![" Hà Nội "]));
        assert_eq!(q.answers, vec![AnswerEntry::TextOnly("Hà Nội".into())]);
    }

    #[test]
    fn test_shortanswer_number_in_text_then_empty() {
        let q = shortanswer(&short("Có bao nhiêu cạnh, biết n = 6?", "", vec![]));
        assert_eq!(q.answers, vec![AnswerEntry::TextOnly("6".into())]);

        let q = shortanswer(&short("Nêu tên", "", vec![]));
        assert_eq!(q.answers, vec![AnswerEntry::TextOnly(String::new())]);
        assert!(q.to_xml().contains(r#"<answer fraction="100">"#));
    }

    #[test]
    fn test_name_falls_back_to_id() {
        let mut rec = choice(QuestionType::Multichoice, vec![]);
        rec.name = "  ".into();
        assert_eq!(question_name(&rec), "Q1");
        rec.id = String::new();
        assert_eq!(question_name(&rec), "noid");
        rec.name = "Q1 Hàm số".into();
        assert_eq!(question_name(&rec), "Q1 Hàm số");
    }
}
