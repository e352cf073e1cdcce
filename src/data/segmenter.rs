// ============================================================
// Layer 4 — Question Segmenter
// ============================================================
// Turns the flat block sequence of an exam bank into question
// records. Documents follow a loose layout:
//
//   Heading 1: Chương 2 - Nguyên hàm          ← tag / title context
//   Câu 1: [TO12.04.1.F02.a] Tìm nguyên hàm   ← question header
//   (more content, images, tables)
//   A. x²        B. 2x                        ← options, underlined = correct
//   a) ...       b) ...                       ← lowercase letters = kprime
//   Lời giải: ...                             ← explanation section
//
// State machine, evaluated per block:
//
//   OutsideQuestion ──header──▶ InQuestionContent ──"Lời giải"──▶ InExplanation
//          ▲                        │  ▲  options / content            │
//          └──────── flush ◀────────┴──┴──── next header / end ◀────────┘
//
// All counters live in an explicit SegmenterSession so that ids and
// indices are scoped to one document run.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::data::key_extractor::extract_key;
use crate::domain::block::{ContentBlock, TableBlock, TableData, TextBlock};
use crate::domain::question::{
    CorrectAnswer, OptionRecord, QuestionRecord, QuestionType, SourceInfo, OPTION_LETTERS,
};
use crate::domain::traits::{ImageSink, ImageSlot};

static QUESTION_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^Câu\s+(\d+)\s*[.:\-]?\s*(.*)$").unwrap());

static ID_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[([^\]]+)\]\s*(.*)").unwrap());

static OPTION_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([A-Da-d])[.)]\s*(.+)").unwrap());

static RESULT_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(Đáp án|Đáp số|Kết quả)\s*[:：]\s*(.+)").unwrap());


/// Both spellings of the solution marker are eight characters long.
const SOLUTION_MARKERS: [&str; 2] = ["lời giải", "loi giai"];

// ─── Session ──────────────────────────────────────────────────────────────────
/// Per-document state that outlives a single question.
#[derive(Debug, Clone)]
pub struct SegmenterSession {
    file_name: String,
    full_path: String,
    author:    String,

    /// When false, lowercase option letters no longer mean kprime
    kprime_lowercase_option: bool,

    /// Last auto-generated id number (Q001, Q002, ...)
    auto_id: usize,

    /// Number of questions finalized so far
    finalized: usize,

    current_tags:    Vec<String>,
    title_candidate: String,
}

impl SegmenterSession {
    pub fn new(
        file_name: impl Into<String>,
        full_path: impl Into<String>,
        author:    impl Into<String>,
    ) -> Self {
        Self {
            file_name:               file_name.into(),
            full_path:               full_path.into(),
            author:                  author.into(),
            kprime_lowercase_option: true,
            auto_id:                 0,
            finalized:               0,
            current_tags:            Vec::new(),
            title_candidate:         String::new(),
        }
    }

    pub fn with_kprime_lowercase_option(mut self, enabled: bool) -> Self {
        self.kprime_lowercase_option = enabled;
        self
    }

    fn next_auto_id(&mut self) -> String {
        self.auto_id += 1;
        format!("Q{:03}", self.auto_id)
    }

    fn next_question_index(&mut self) -> usize {
        self.finalized += 1;
        self.finalized
    }

    pub fn finalized(&self) -> usize {
        self.finalized
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmenterState {
    OutsideQuestion,
    InQuestionContent,
    InExplanation,
}

/// The one record currently being built, with its accumulators.
#[derive(Debug)]
struct OpenQuestion {
    record:           QuestionRecord,
    options:          Vec<OptionRecord>,
    correct:          Vec<usize>,
    has_lower_option: bool,
}

// ─── Segmenter ────────────────────────────────────────────────────────────────
pub struct Segmenter<'a> {
    session: SegmenterSession,
    sink:    &'a mut dyn ImageSink,
    state:   SegmenterState,
    current: Option<OpenQuestion>,
    done:    Vec<QuestionRecord>,
}

impl<'a> Segmenter<'a> {
    pub fn new(session: SegmenterSession, sink: &'a mut dyn ImageSink) -> Self {
        Self {
            session,
            sink,
            state:   SegmenterState::OutsideQuestion,
            current: None,
            done:    Vec::new(),
        }
    }

    pub fn state(&self) -> SegmenterState {
        self.state
    }

    /// Consume every block and return the finalized records.
    pub fn segment<I>(mut self, blocks: I) -> Vec<QuestionRecord>
    where
        I: IntoIterator<Item = ContentBlock>,
    {
        for block in blocks {
            self.feed(block);
        }
        self.finish()
    }

    /// Process one block.
    pub fn feed(&mut self, block: ContentBlock) {
        match block {
            ContentBlock::Text(t)  => self.feed_text(&t),
            ContentBlock::Table(t) => self.feed_table(&t),
        }
    }

    /// Flush any trailing open question and return all records.
    pub fn finish(mut self) -> Vec<QuestionRecord> {
        self.flush();
        tracing::debug!(
            "Segmented {} questions from '{}'",
            self.done.len(),
            self.session.file_name
        );
        self.done
    }

    fn feed_text(&mut self, block: &TextBlock) {
        let text = block.text.trim();
        if text.is_empty() && block.runs.is_empty() {
            return;
        }

        if block.is_heading() {
            self.session.current_tags    = vec![text.to_string()];
            self.session.title_candidate = text.to_string();
            return;
        }

        if let Some(caps) = QUESTION_HEADER.captures(text) {
            let tail = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
            self.open_question(tail);
            return;
        }

        if self.current.is_none() {
            tracing::trace!("Block {} outside any question, skipped", block.index);
            return;
        }

        if self.state != SegmenterState::InExplanation {
            if let Some(tail) = solution_marker_tail(text) {
                self.start_explanation(block, tail);
                return;
            }
            if let Some(caps) = OPTION_LINE.captures(text) {
                let letter = caps[1].chars().next().unwrap_or('A');
                self.add_option(block, letter, caps[2].trim());
                return;
            }
        }

        match self.state {
            SegmenterState::InExplanation => self.append_explanation(block, text),
            _                             => self.append_content(block, text),
        }
    }

    fn feed_table(&mut self, block: &TableBlock) {
        let state = self.state;
        let Some(open) = self.current.as_mut() else {
            return;
        };

        let table = TableData::from(block);
        if state == SegmenterState::InExplanation {
            open.record.explanation.tables.push(table);
        } else {
            open.record.content_tables.push(table);
        }
    }

    fn open_question(&mut self, tail: &str) {
        self.flush();

        let (id, content) = match ID_TAG.captures(tail) {
            Some(caps) => (caps[1].trim().to_string(), caps[2].trim().to_string()),
            None       => (self.session.next_auto_id(), tail.to_string()),
        };

        tracing::debug!("Opened question {}", id);

        let record = QuestionRecord::open(
            id,
            content,
            &self.session.title_candidate,
            self.session.current_tags.clone(),
            &self.session.author,
        );
        self.current = Some(OpenQuestion {
            record,
            options:          Vec::new(),
            correct:          Vec::new(),
            has_lower_option: false,
        });
        self.state = SegmenterState::InQuestionContent;
    }

    fn start_explanation(&mut self, block: &TextBlock, tail: String) {
        self.state = SegmenterState::InExplanation;
        let image = self.store_images(block, "explanation");

        if let Some(open) = self.current.as_mut() {
            let expl = &mut open.record.explanation;
            expl.text = tail;
            if expl.image.is_none() {
                expl.image = image;
            }
        }
    }

    fn add_option(&mut self, block: &TextBlock, raw_letter: char, text: &str) {
        let letter = raw_letter.to_ascii_uppercase();
        let part   = format!("opt{letter}");
        let image  = self.store_images(block, &part);

        let Some(open) = self.current.as_mut() else {
            return;
        };

        if raw_letter.is_ascii_lowercase() {
            open.has_lower_option = true;
        }
        if block.has_underlined_text() {
            if let Some(pos) = OPTION_LETTERS.find(letter) {
                open.correct.push(pos);
            }
        }

        open.options.push(OptionRecord {
            letter,
            text: text.to_string(),
            image,
            table: None,
        });
    }

    fn append_content(&mut self, block: &TextBlock, text: &str) {
        let image = self.store_images(block, "content");
        let Some(open) = self.current.as_mut() else {
            return;
        };

        let record = &mut open.record;
        if !text.is_empty() {
            if record.content.is_empty() {
                record.content = text.to_string();
            } else {
                record.content.push('\n');
                record.content.push_str(text);
            }
        }
        if record.content_image.is_none() {
            record.content_image = image;
        }
    }

    fn append_explanation(&mut self, block: &TextBlock, text: &str) {
        let image = self.store_images(block, "explanation");
        let Some(open) = self.current.as_mut() else {
            return;
        };

        let expl = &mut open.record.explanation;
        if !text.is_empty() {
            if !expl.text.is_empty() {
                expl.text.push('\n');
            }
            expl.text.push_str(text);
        }
        if expl.image.is_none() {
            expl.image = image;
        }
    }

    /// Store every image of the block and return the first reference.
    fn store_images(&mut self, block: &TextBlock, part: &str) -> Option<String> {
        let qid = self.current.as_ref()?.record.id.clone();
        let slot = ImageSlot {
            question_id: &qid,
            part,
            block_index: block.index,
        };

        let mut first = None;
        for image in &block.images {
            match self.sink.store(image, &slot) {
                Some(reference) => {
                    first.get_or_insert(reference);
                }
                None => tracing::warn!(
                    "Image {} of question {} could not be stored",
                    slot.file_name(image),
                    qid
                ),
            }
        }
        first
    }

    /// Finalize the open question, if any, and reset accumulators.
    fn flush(&mut self) {
        self.state = SegmenterState::OutsideQuestion;
        let Some(open) = self.current.take() else {
            return;
        };

        let OpenQuestion { mut record, mut options, correct, has_lower_option } = open;

        let key = extract_key(&record.content, &record.explanation.text);
        record.content = key.cleaned_content;

        if options.is_empty() {
            record.kind = QuestionType::Shortanswer;
            record.correct_answer = if !key.answers.is_empty() {
                CorrectAnswer::Texts(key.answers)
            } else {
                CorrectAnswer::Texts(result_line(&record.explanation.text).into_iter().collect())
            };
        } else {
            record.kind = if has_lower_option && self.session.kprime_lowercase_option {
                QuestionType::Kprime
            } else {
                QuestionType::Multichoice
            };
            options.sort_by(|a, b| a.letter.cmp(&b.letter));
            record.options = options;
            record.correct_answer = CorrectAnswer::Indices(correct);
        }

        record.metadata.source = SourceInfo {
            file_name:      self.session.file_name.clone(),
            full_path:      self.session.full_path.clone(),
            question_index: self.session.next_question_index(),
        };

        tracing::debug!(
            "Finalized {} as {} ({} options)",
            record.id,
            record.kind.as_str(),
            record.options.len()
        );
        self.done.push(record);
    }
}

/// Text after a leading "Lời giải" / "loi giai" marker, stripped of
/// spaces and colons. None when the line is not a solution marker.
fn solution_marker_tail(text: &str) -> Option<String> {
    let lower = text.to_lowercase();
    let marker = SOLUTION_MARKERS.iter().find(|m| lower.starts_with(*m))?;

    let tail: String = text.chars().skip(marker.chars().count()).collect();
    Some(
        tail.trim_start_matches([' ', ':', '：'])
            .trim()
            .to_string(),
    )
}

/// First "Đáp án/Đáp số/Kết quả: ..." line of an explanation, trimmed.
fn result_line(explanation: &str) -> Option<String> {
    let caps = RESULT_LINE.captures(explanation)?;
    let line = caps[2].trim().lines().next()?.trim().to_string();
    if line.is_empty() {
        None
    } else {
        Some(line)
    }
}
