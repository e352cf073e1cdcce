// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the subcommands and their flags:
//
//   parse     .docx → questionsTF.json (+ images)
//   enrich    questionsTF.json + mapping spreadsheets → names/categories
//   build     questionsTF.json → moodle.xml
//   one-shot  parse → (enrich) → build for one document
//   run       the same for every document in a folder
//
// clap's derive macros generate help text, error messages for
// missing arguments and the path conversions.

use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a .docx exam bank into questionsTF.json
    Parse(ParseArgs),

    /// Fill question names and categories from mapping spreadsheets
    Enrich(EnrichArgs),

    /// Build a Moodle XML quiz from questionsTF.json
    Build(BuildArgs),

    /// Parse, optionally enrich, and build one document
    OneShot(OneShotArgs),

    /// Convert every document (or questionsTF.json) below a folder
    Run(RunArgs),
}

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// The .docx file to parse
    pub docx_file: PathBuf,

    /// Output directory for questionsTF.json and images
    #[arg(long, default_value = "output_questions")]
    pub outdir: PathBuf,
}

#[derive(Args, Debug)]
pub struct EnrichArgs {
    /// Question JSON to enrich
    pub json_file: PathBuf,

    /// Directory holding the .xlsx/.xls reference files
    pub mapping_dir: PathBuf,

    /// Write the enriched JSON here instead of in place
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Only fill names and categories that are currently empty
    #[arg(long)]
    pub no_overwrite: bool,
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Question JSON to export
    pub json_file: PathBuf,

    /// Where to write the Moodle XML
    #[arg(long, default_value = "output_questions/moodle.xml")]
    pub xml_out: PathBuf,
}

#[derive(Args, Debug)]
pub struct OneShotArgs {
    /// The .docx file to convert
    pub docx_file: PathBuf,

    /// Output directory for JSON, images and moodle.xml
    #[arg(long, default_value = "output_questions")]
    pub outdir: PathBuf,

    /// Enrich with the reference files of this directory
    #[arg(long)]
    pub mapping_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Folder searched recursively for .docx (or questionsTF.json)
    pub input: PathBuf,

    /// Folder receiving one sub-folder per document
    pub output: PathBuf,

    /// Enrich with the reference files of this directory
    #[arg(long)]
    pub mapping_dir: Option<PathBuf>,
}
