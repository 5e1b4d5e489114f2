//! Google Docs / Drive REST API client.
//!
//! Sync HTTP client over a bearer access token. Endpoints are injectable so
//! an emitter can be pointed at a compatible service.

mod docs;
mod drive;

use std::time::Duration;

use ureq::Agent;

use crate::error::GdocsError;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Default Docs API endpoint.
pub const DOCS_ENDPOINT: &str = "https://docs.googleapis.com";

/// Default Drive API endpoint.
pub const DRIVE_ENDPOINT: &str = "https://www.googleapis.com";

/// Docs and Drive REST API client.
pub struct GdocsClient {
    agent: Agent,
    docs_url: String,
    drive_url: String,
    token: String,
}

impl GdocsClient {
    /// Create a client with the default Google endpoints.
    pub fn new(access_token: &str) -> Self {
        Self::with_endpoints(access_token, DOCS_ENDPOINT, DRIVE_ENDPOINT)
    }

    /// Create a client against explicit endpoints.
    pub fn with_endpoints(access_token: &str, docs_url: &str, drive_url: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            docs_url: docs_url.trim_end_matches('/').to_string(),
            drive_url: drive_url.trim_end_matches('/').to_string(),
            token: access_token.to_string(),
        }
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Read the response body, mapping HTTP error statuses to `GdocsError::Http`.
fn check_status(
    response: ureq::http::Response<ureq::Body>,
) -> Result<ureq::Body, GdocsError> {
    let status = response.status().as_u16();
    let mut body = response.into_body();

    if status >= 400 {
        let error_body = body
            .read_to_string()
            .unwrap_or_else(|_| "(unable to read error body)".to_string());
        return Err(GdocsError::Http {
            status,
            body: error_body,
        });
    }

    Ok(body)
}
