//! CLI error types.

use mdweave_config::ConfigError;
use mdweave_docx::DocxError;
use mdweave_gdocs::GdocsError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Docx(#[from] DocxError),

    #[error("{0}")]
    Gdocs(#[from] GdocsError),

    #[error("{0}")]
    Validation(String),
}
