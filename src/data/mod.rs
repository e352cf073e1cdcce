// ============================================================
// Layer 4 — Parsing and Lookup Core
// ============================================================
// Everything between a .docx file and a list of enriched records.
//
//   .docx file
//       │
//       ▼
//   DocxBlockReader   → ContentBlocks in document order
//       │
//       ▼
//   Segmenter         → QuestionRecords (uses the key extractor)
//       │
//       ▼
//   Enricher          → names / categories from the reference table
//                       (reference loader + matcher + code normalizer)
//
// Nothing here writes files except through an injected ImageSink.

/// Reads .docx bodies into ContentBlocks using docx-rs
pub mod block_reader;

/// Picture crop rectangles from word/document.xml
pub mod crop_reader;

/// Finds numeric answer keys in question text
pub mod key_extractor;

/// State machine turning blocks into question records
pub mod segmenter;

/// Question code normalization and base-code derivation
pub mod code_normalizer;

/// Loads reference spreadsheets with calamine
pub mod reference_loader;

/// Question id → reference row lookup
pub mod matcher;

pub mod enricher;
