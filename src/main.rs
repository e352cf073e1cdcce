use anyhow::Result;
use clap::Parser;
use docx_moodle_quiz::cli::Cli;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("docx_moodle_quiz=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    cli.run()
}
