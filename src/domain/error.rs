// ============================================================
// Layer 3 — Error Taxonomy
// ============================================================
// Only FormatError is fatal, and only for the document at hand.
// The other kinds are absorbed where they happen:
//
//   ReferenceFileError    — collected next to the loaded rows
//   ImageExtractionError  — image stored as raw bytes instead
//
// A lookup miss is an ordinary (None, None) result and a block that
// matches no pattern is handled by the segmenter, so neither has an
// error type.

use std::path::PathBuf;
use thiserror::Error;

/// The document could not be opened or is not a .docx container.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("cannot read '{}': {source}", .path.display())]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{}' is not a valid .docx document: {reason}", .path.display())]
    InvalidContainer {
        path:   PathBuf,
        reason: String,
    },
}

/// A single spreadsheet in a mapping directory failed to load.
#[derive(Debug, Clone, Error)]
#[error("skipped reference file '{}': {reason}", .path.display())]
pub struct ReferenceFileError {
    pub path:   PathBuf,
    pub reason: String,
}

/// An embedded image could not be decoded or re-encoded.
#[derive(Debug, Error)]
pub enum ImageExtractionError {
    #[error("cannot decode image '{name}': {reason}")]
    Decode { name: String, reason: String },

    #[error("cannot re-encode image '{name}': {reason}")]
    Encode { name: String, reason: String },
}
