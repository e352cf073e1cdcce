// ============================================================
// Layer 2 — PipelineUseCase
// ============================================================
// Batch conversion of a whole input folder.
//
// DOCX mode — any *.docx below the input folder (Word lock files
// "~$*" skipped), in path order:
//
//   <input>/a/bank.docx  →  <output>/bank/questionsTF.json
//                           <output>/bank/images/...
//                           <output>/bank/enrich_log.csv  (with a mapping)
//                           <output>/bank/moodle.xml
//
// JSON mode — only when no .docx exists: every *questionsTF.json is
// exported to the mirrored path with an .xml extension.
//
// A failing file is logged and recorded; the batch continues.

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::application::enrich_use_case::EnrichUseCase;
use crate::application::export_use_case::{ExportUseCase, MOODLE_XML_FILE};
use crate::application::parse_use_case::ParseUseCase;
use crate::infra::config::AppConfig;
use crate::infra::question_store::QUESTIONS_FILE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineMode {
    Docx,
    Json,
}

/// Result of one input file.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub input:  PathBuf,
    pub xml:    Option<PathBuf>,
    pub error:  Option<String>,
}

impl FileOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub mode:     PipelineMode,
    pub outcomes: Vec<FileOutcome>,
}

impl PipelineReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

pub struct PipelineUseCase {
    parser:   ParseUseCase,
    enricher: Option<EnrichUseCase>,
}

impl PipelineUseCase {
    pub fn new(config: AppConfig, enricher: Option<EnrichUseCase>) -> Self {
        Self { parser: ParseUseCase::new(config), enricher }
    }

    /// One document end to end: parse → (enrich) → export.
    /// Returns the path of the written moodle.xml.
    pub fn convert_docx(&self, docx: &Path, outdir: &Path) -> Result<PathBuf> {
        let parsed = self.parser.run(docx, outdir)?;

        if let Some(enricher) = &self.enricher {
            enricher.run(&parsed.json_path, None)?;
        }

        let xml = outdir.join(MOODLE_XML_FILE);
        ExportUseCase::run(&parsed.json_path, &xml)?;
        Ok(xml)
    }

    pub fn run(&self, input: &Path, output: &Path) -> Result<PipelineReport> {
        if !input.is_dir() {
            bail!("Input folder '{}' does not exist", input.display());
        }

        let docs = find_files(input, |name| name.to_lowercase().ends_with(".docx"));
        if !docs.is_empty() {
            tracing::info!("DOCX mode: {} file(s) in '{}'", docs.len(), input.display());
            let outcomes = docs
                .iter()
                .map(|docx| {
                    let stem = docx.file_stem().unwrap_or_default();
                    let result = self.convert_docx(docx, &output.join(stem));
                    outcome(docx, result)
                })
                .collect();
            return Ok(self.report(PipelineMode::Docx, outcomes));
        }

        let jsons = find_files(input, |name| name.ends_with(QUESTIONS_FILE));
        if jsons.is_empty() {
            bail!("No .docx or {} found in '{}'", QUESTIONS_FILE, input.display());
        }

        tracing::info!("JSON mode: {} file(s) in '{}'", jsons.len(), input.display());
        let outcomes = jsons
            .iter()
            .map(|json| {
                let rel = json.strip_prefix(input).unwrap_or(json);
                let xml = output.join(rel).with_extension("xml");
                let result = ExportUseCase::run(json, &xml).map(|o| o.xml_path);
                outcome(json, result)
            })
            .collect();
        Ok(self.report(PipelineMode::Json, outcomes))
    }

    fn report(&self, mode: PipelineMode, outcomes: Vec<FileOutcome>) -> PipelineReport {
        let report = PipelineReport { mode, outcomes };
        tracing::info!(
            "Batch finished: {} ok, {} failed",
            report.succeeded(),
            report.failed()
        );
        report
    }
}

fn outcome(input: &Path, result: Result<PathBuf>) -> FileOutcome {
    match result {
        Ok(xml) => {
            tracing::info!("OK   '{}' -> '{}'", input.display(), xml.display());
            FileOutcome { input: input.to_path_buf(), xml: Some(xml), error: None }
        }
        Err(e) => {
            tracing::warn!("FAIL '{}': {:#}", input.display(), e);
            FileOutcome { input: input.to_path_buf(), xml: None, error: Some(format!("{e:#}")) }
        }
    }
}

/// Files below `root` whose name passes `accept`, lock files
/// excluded, sorted by path.
fn find_files(root: &Path, accept: impl Fn(&str) -> bool) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_string_lossy();
            !name.starts_with("~$") && accept(&name)
        })
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}
