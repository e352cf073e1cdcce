// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure structs, enums and traits. No docx-rs, calamine or file
// I/O types appear here.

/// Content blocks produced by the block reader
pub mod block;

/// The question record and its parts
pub mod question;

/// Reference table rows used for name / category lookup
pub mod reference;

/// Normalized Moodle answer entries
pub mod answer;

/// Fatal and non-fatal error kinds
pub mod error;

/// Seams between the segmenter and its collaborators
pub mod traits;
