//! Path expansion for configuration strings.
//!
//! Supports:
//! - `~` and `~/...` - home directory expansion
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

use std::path::PathBuf;

use crate::ConfigError;

/// Expand `~` and environment variable references in a path string.
///
/// Returns the original string unchanged if no expansion is needed.
/// Bare `$VAR` syntax is not expanded (only `${VAR}` with braces).
pub(crate) fn expand_path(value: &str, field: &str) -> Result<PathBuf, ConfigError> {
    // Fast path: no expansion needed
    if !value.contains("${") && !value.starts_with('~') {
        return Ok(PathBuf::from(value));
    }

    let tilde = shellexpand::tilde(value);

    let expanded = shellexpand::env_with_context(
        tilde.as_ref(),
        |var| -> Result<Option<String>, LookupError> {
            match std::env::var(var) {
                Ok(val) => Ok(Some(val)),
                Err(_) => Err(LookupError {
                    var_name: var.to_string(),
                }),
            }
        },
    )
    .map(|cow| cow.into_owned())
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_string(),
        message: format!("${{{0}}} not set", e.cause.var_name),
    })?;

    Ok(PathBuf::from(expanded))
}

/// Error returned when environment variable lookup fails.
struct LookupError {
    var_name: String,
}
