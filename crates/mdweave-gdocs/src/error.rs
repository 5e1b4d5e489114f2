//! Error types for the Google Docs integration.

/// Error from Docs or Drive API operations.
#[derive(Debug, thiserror::Error)]
pub enum GdocsError {
    /// HTTP request error.
    #[error("HTTP error: {status} - {body}")]
    Http { status: u16, body: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// Access token file was missing or unreadable.
    #[error("token error: {0}")]
    Token(String),
}

impl From<serde_json::Error> for GdocsError {
    fn from(e: serde_json::Error) -> Self {
        GdocsError::Json(e.to_string())
    }
}

impl From<ureq::Error> for GdocsError {
    fn from(e: ureq::Error) -> Self {
        GdocsError::Http {
            status: 0,
            body: e.to_string(),
        }
    }
}
