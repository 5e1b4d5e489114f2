//! Access token loading.

use std::path::Path;

use crate::error::GdocsError;

/// Load a bearer access token from a file.
///
/// Accepts either a bare token string or a JSON object with a `token`
/// field, the format OAuth tooling typically writes.
pub fn load_access_token(path: &Path) -> Result<String, GdocsError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| GdocsError::Token(format!("{}: {}", path.display(), e)))?;
    let trimmed = content.trim();

    if trimmed.starts_with('{') {
        let value: serde_json::Value = serde_json::from_str(trimmed)
            .map_err(|e| GdocsError::Token(format!("{}: {}", path.display(), e)))?;
        return value["token"]
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| {
                GdocsError::Token(format!("{}: no 'token' field", path.display()))
            });
    }

    if trimmed.is_empty() {
        return Err(GdocsError::Token(format!("{}: empty file", path.display())));
    }
    Ok(trimmed.to_owned())
}
