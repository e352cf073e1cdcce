// ============================================================
// Layer 5 — Moodle XML Layer
// ============================================================
// This layer contains all knowledge of Moodle's quiz XML dialect.
// No other layer writes XML; records go in, a quiz document
// comes out.
//
// What's in this layer:
//
//   html.rs      — escaping, centered image blocks and inline-styled
//                  tables for question / feedback bodies
//
//   question.rs  — one renderer per supported question type:
//                  • multichoice (single answer, ABCD numbering)
//                  • kprime      (true/false grid, 2 columns)
//                  • shortanswer (numeric keys, case-insensitive)
//
//   quiz.rs      — the <quiz> document: questions interleaved with
//                  <question type="category"> entries
//
//   builder.rs   — QuestionRecord list → MoodleQuiz

/// Escaping and HTML fragments for question bodies
pub mod html;

/// Per-type question renderers
pub mod question;

/// The quiz document and its category interleaving
pub mod quiz;

/// Builds a quiz from question records
pub mod builder;
