//! mdweave CLI - Markdown to document converter.
//!
//! Provides commands for:
//! - `docx`: Convert markdown files to DOCX documents
//! - `gdocs`: Convert markdown files to Google Docs

mod commands;
mod error;
mod output;
mod pipeline;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{DocxArgs, GdocsArgs};
use output::Output;

/// mdweave - Markdown to document converter.
#[derive(Parser)]
#[command(name = "mdweave", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert markdown to DOCX files.
    Docx(DocxArgs),
    /// Convert markdown to Google Docs.
    Gdocs(GdocsArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Docx(args) => args.verbose,
        Commands::Gdocs(args) => args.verbose,
    };

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Docx(args) => args.execute(),
        Commands::Gdocs(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
