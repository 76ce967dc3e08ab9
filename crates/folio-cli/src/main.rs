//! Folio CLI - Command-line interface for the Folio document tools.

use clap::Parser;
use folio_cli::commands;
use folio_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr so stdout stays clean for documents; `FOLIO_LOG` sets the filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("FOLIO_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> folio_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;

    // Determine output format
    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Split(args) => commands::execute_split(args, &formatter)?,
        Command::Renumber(args) => commands::execute_renumber(args, &formatter)?,
        Command::Annotate(args) => commands::execute_annotate(args, &formatter)?,
        Command::Repair(args) => commands::execute_repair(args, &formatter)?,
        Command::Ranges(args) => commands::execute_ranges(args, &formatter)?,
        Command::Rank(args) => commands::execute_rank(args, &formatter)?,
        Command::Rewrite(args) => commands::execute_rewrite(args, &config, &formatter).await?,
    }

    Ok(())
}
