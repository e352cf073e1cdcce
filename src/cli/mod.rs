// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All work is delegated to Layer 2 (application); this layer only
// loads the config, routes, and prints the result paths.

pub mod commands;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use commands::{BuildArgs, Commands, EnrichArgs, OneShotArgs, ParseArgs, RunArgs};

use crate::application::enrich_use_case::EnrichUseCase;
use crate::application::export_use_case::ExportUseCase;
use crate::application::parse_use_case::ParseUseCase;
use crate::application::pipeline_use_case::PipelineUseCase;
use crate::infra::config::AppConfig;

#[derive(Parser, Debug)]
#[command(
    name = "docx-moodle-quiz",
    version,
    about = "Convert Word exam banks (.docx) into Moodle XML quizzes."
)]
pub struct Cli {
    /// JSON config file (image_dir, author, kprime_lowercase_option)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Load the config, then dispatch to the matching use case.
    pub fn run(self) -> Result<()> {
        let config = AppConfig::load(self.config.as_deref());

        match self.command {
            Commands::Parse(args)   => run_parse(config, args),
            Commands::Enrich(args)  => run_enrich(args),
            Commands::Build(args)   => run_build(args),
            Commands::OneShot(args) => run_one_shot(config, args),
            Commands::Run(args)     => run_batch(config, args),
        }
    }
}

fn run_parse(config: AppConfig, args: ParseArgs) -> Result<()> {
    let outcome = ParseUseCase::new(config).run(&args.docx_file, &args.outdir)?;
    println!("JSON: {}", outcome.json_path.display());
    Ok(())
}

fn run_enrich(args: EnrichArgs) -> Result<()> {
    let use_case = EnrichUseCase::load(&args.mapping_dir, !args.no_overwrite)?;
    let outcome  = use_case.run(&args.json_file, args.out.as_deref())?;
    println!(
        "Enriched JSON: {} ({}/{} matched)",
        outcome.json_path.display(),
        outcome.matched,
        outcome.total
    );
    Ok(())
}

fn run_build(args: BuildArgs) -> Result<()> {
    let outcome = ExportUseCase::run(&args.json_file, &args.xml_out)?;
    println!(
        "XML: {} | MCQ: {} | KPrime: {} | SA: {}",
        outcome.xml_path.display(),
        outcome.counts.multichoice,
        outcome.counts.kprime,
        outcome.counts.shortanswer
    );
    Ok(())
}

fn run_one_shot(config: AppConfig, args: OneShotArgs) -> Result<()> {
    let enricher = args
        .mapping_dir
        .as_deref()
        .map(|dir| EnrichUseCase::load(dir, true))
        .transpose()?;

    let xml = PipelineUseCase::new(config, enricher).convert_docx(&args.docx_file, &args.outdir)?;
    println!("Done: {}", xml.display());
    Ok(())
}

fn run_batch(config: AppConfig, args: RunArgs) -> Result<()> {
    let enricher = args
        .mapping_dir
        .as_deref()
        .map(|dir| EnrichUseCase::load(dir, true))
        .transpose()?;

    let report = PipelineUseCase::new(config, enricher).run(&args.input, &args.output)?;
    for o in &report.outcomes {
        match (&o.xml, &o.error) {
            (Some(xml), _)  => println!("OK    {} -> {}", o.input.display(), xml.display()),
            (_, Some(err))  => println!("FAIL  {} :: {}", o.input.display(), err),
            (None, None)    => {}
        }
    }
    println!(
        "Finished {} file(s): {} ok, {} failed",
        report.outcomes.len(),
        report.succeeded(),
        report.failed()
    );
    Ok(())
}
