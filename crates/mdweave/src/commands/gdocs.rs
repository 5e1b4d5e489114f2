//! `mdweave gdocs` command implementation.

use std::path::PathBuf;

use clap::Args;
use mdweave_config::{CliSettings, Config};
use mdweave_gdocs::{DocsEmitter, GdocsClient, load_access_token};

use crate::error::CliError;
use crate::output::Output;
use crate::pipeline;

/// Arguments for the gdocs command.
#[derive(Args)]
pub(crate) struct GdocsArgs {
    /// Path to a markdown file or a directory of markdown files.
    path: PathBuf,

    /// Title for the document (default: filename without extension).
    /// Only used for single files.
    #[arg(long)]
    title: Option<String>,

    /// Path to the access token file (overrides config).
    #[arg(long)]
    token_file: Option<PathBuf>,

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

impl GdocsArgs {
    /// Execute the gdocs command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            mermaid_url: self.mermaid_url.clone(),
            use_local: self.use_cli.then_some(true),
            token_file: self.token_file.clone(),
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let token = load_access_token(&config.gdocs_resolved.token_file)?;
        let client = GdocsClient::with_endpoints(
            &token,
            &config.gdocs_resolved.docs_endpoint,
            &config.gdocs_resolved.drive_endpoint,
        );
        let emitter = DocsEmitter::new(client);

        let explicit_title = self.title.as_deref().filter(|_| self.path.is_file());

        pipeline::run_over_path(&self.path, &output, |path| {
            output.info(&format!("Converting {}...", path.display()));

            let blocks = pipeline::load_blocks(path, &config.diagrams_resolved, &output)?;
            let title = explicit_title
                .map_or_else(|| pipeline::document_title(path), str::to_owned);

            let url = emitter.emit(&title, &blocks)?;
            output.success("Document created successfully!");
            output.document_url(&url);
            Ok(())
        })
    }
}
