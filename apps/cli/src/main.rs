//! readmepack CLI — package a Markdown documentation tree into a zip
//! archive with normalized front matter.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);

    let result = commands::run(cli).await;
    if let Err(err) = &result {
        commands::report_failure(err);
    }
    result
}
