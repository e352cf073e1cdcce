// ============================================================
// Layer 2 — ParseUseCase
// ============================================================
// Converts one .docx exam bank into the question JSON:
//
//   Step 1: Open the document          (Layer 4 - data/block_reader)
//   Step 2: Segment blocks → records   (Layer 4 - data/segmenter)
//           images → <outdir>/<image_dir>  (Layer 6 - infra/image_store)
//   Step 3: Write questionsTF.json     (Layer 6 - infra/question_store)

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::data::block_reader::DocxBlockReader;
use crate::data::segmenter::{Segmenter, SegmenterSession};
use crate::domain::question::QuestionRecord;
use crate::infra::config::AppConfig;
use crate::infra::image_store::DirImageSink;
use crate::infra::question_store::{write_questions, QUESTIONS_FILE};

/// What a parse run produced.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub json_path: PathBuf,
    pub questions: usize,
    pub images:    usize,
}

pub struct ParseUseCase {
    config: AppConfig,
}

impl ParseUseCase {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Parse `docx` and write `<outdir>/questionsTF.json`.
    pub fn run(&self, docx: &Path, outdir: &Path) -> Result<ParseOutcome> {
        let (records, images) = self.parse(docx, outdir)?;

        let json_path = outdir.join(QUESTIONS_FILE);
        write_questions(&json_path, &records)?;

        Ok(ParseOutcome { json_path, questions: records.len(), images })
    }

    /// Parse `docx` into records, storing images under `outdir`.
    /// Returns the records and the number of images written.
    pub fn parse(&self, docx: &Path, outdir: &Path) -> Result<(Vec<QuestionRecord>, usize)> {
        tracing::info!("Parsing '{}'", docx.display());

        fs::create_dir_all(outdir)
            .with_context(|| format!("Cannot create output directory '{}'", outdir.display()))?;

        let reader = DocxBlockReader::open(docx)
            .with_context(|| format!("Cannot parse '{}'", docx.display()))?;

        let file_name = docx
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let full_path = fs::canonicalize(docx)
            .unwrap_or_else(|_| docx.to_path_buf())
            .to_string_lossy()
            .into_owned();

        let session = SegmenterSession::new(file_name, full_path, self.config.author.clone())
            .with_kprime_lowercase_option(self.config.kprime_lowercase_option);

        let mut sink = DirImageSink::new(outdir.join(&self.config.image_dir));
        let records  = Segmenter::new(session, &mut sink).segment(reader);

        tracing::info!(
            "Parsed {} questions and {} images from '{}'",
            records.len(),
            sink.written(),
            docx.display()
        );
        Ok((records, sink.written()))
    }
}
