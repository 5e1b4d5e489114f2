//! `mdweave docx` command implementation.

use std::path::PathBuf;

use clap::Args;
use mdweave_config::{CliSettings, Config};

use crate::error::CliError;
use crate::output::Output;
use crate::pipeline;

/// Arguments for the docx command.
#[derive(Args)]
pub(crate) struct DocxArgs {
    /// Path to a markdown file or a directory of markdown files.
    path: PathBuf,

    /// Output directory for generated files (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Remote mermaid rendering URL (overrides config).
    #[arg(long)]
    mermaid_url: Option<String>,

    /// Use the local mermaid CLI instead of the remote renderer.
    #[arg(long)]
    use_cli: bool,

    /// Path to configuration file (default: auto-discover mdweave.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl DocxArgs {
    /// Execute the docx command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            mermaid_url: self.mermaid_url.clone(),
            use_local: self.use_cli.then_some(true),
            output_dir: self.output_dir.clone(),
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        pipeline::run_over_path(&self.path, &output, |path| {
            output.info(&format!("Converting {}...", path.display()));

            let blocks = pipeline::load_blocks(path, &config.diagrams_resolved, &output)?;
            let title = pipeline::document_title(path);
            let out_path = config
                .docx_resolved
                .output_dir
                .join(format!("{title}.docx"));

            mdweave_docx::emit_to_path(&title, &blocks, &out_path)?;
            output.success(&format!("Created: {}", out_path.display()));
            Ok(())
        })
    }
}
