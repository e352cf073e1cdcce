// ============================================================
// docx-moodle-quiz
// ============================================================
// Converts Word exam banks into Moodle XML quizzes.
//
//   Layer 1  cli/          argument parsing and dispatch
//   Layer 2  application/  use cases (parse, enrich, export, batch)
//   Layer 3  domain/       pure types and seam traits
//   Layer 4  data/         docx reading, segmentation, lookup
//   Layer 5  moodle/       Moodle XML rendering
//   Layer 6  infra/        config, JSON store, images, audit log

pub mod cli;
pub mod application;
pub mod domain;
pub mod data;
pub mod moodle;
pub mod infra;
