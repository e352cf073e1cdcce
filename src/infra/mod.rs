// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Handles all file-system concerns that don't belong in the
// parsing core or the Moodle layer:
//
//   config.rs          — Application settings
//                        Optional JSON file with defaults for the
//                        image directory, author and kprime rule.
//
//   question_store.rs  — Question list persistence
//                        Writes questionsTF.json and reads it back,
//                        tolerating entries left by older tools.
//
//   image_store.rs     — Directory image sink
//                        Implements ImageSink by writing extracted
//                        images under the output directory.
//
//   enrich_log.rs      — Enrichment audit log
//                        Writes enrich_log.csv with one row per
//                        record of an enrichment pass.
//
// Keeping these here lets the segmenter, matcher and renderers be
// tested without touching disk.

/// Application settings loaded from JSON
pub mod config;

/// Question JSON reading and writing
pub mod question_store;

/// ImageSink writing into a directory
pub mod image_store;

/// Enrichment audit CSV
pub mod enrich_log;
