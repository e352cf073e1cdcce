// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates the other layers to accomplish one
// user-visible goal (parse, enrich, export, or a whole batch).
//
// Rules for this layer:
//   - No parsing or matching logic here (that's Layer 4)
//   - No XML templating here (that's Layer 5)
//   - No printing here (that's Layer 1)
//   - Only workflow coordination

// .docx → questionsTF.json
pub mod parse_use_case;

// questionsTF.json + mapping spreadsheets → enriched JSON
pub mod enrich_use_case;

// questionsTF.json → moodle.xml
pub mod export_use_case;

// Folder of documents → one quiz per document
pub mod pipeline_use_case;
