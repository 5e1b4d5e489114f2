//! Document operations for the Docs API.

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use super::{GdocsClient, check_status};
use crate::error::GdocsError;

#[derive(Debug, Deserialize)]
struct CreatedDocument {
    #[serde(rename = "documentId")]
    document_id: String,
}

impl GdocsClient {
    /// Create an empty document and return its id.
    pub fn create_document(&self, title: &str) -> Result<String, GdocsError> {
        let url = format!("{}/v1/documents", self.docs_url);

        info!("Creating document '{}'", title);

        let payload = serde_json::to_vec(&json!({"title": title}))?;
        let response = self
            .agent
            .post(&url)
            .header("Authorization", &self.bearer())
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(&payload[..])?;

        let mut body = check_status(response)?;
        let created: CreatedDocument = body.read_json()?;
        info!("Created document {}", created.document_id);
        Ok(created.document_id)
    }

    /// Submit a batch of update requests as one atomic call.
    ///
    /// Rejection is surfaced as-is and never retried; a rejected batch
    /// leaves the document untouched.
    pub fn batch_update(&self, document_id: &str, requests: &[Value]) -> Result<(), GdocsError> {
        let url = format!("{}/v1/documents/{}:batchUpdate", self.docs_url, document_id);

        info!(
            "Submitting batch of {} requests to document {}",
            requests.len(),
            document_id
        );

        let payload = serde_json::to_vec(&json!({"requests": requests}))?;
        let response = self
            .agent
            .post(&url)
            .header("Authorization", &self.bearer())
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(&payload[..])?;

        check_status(response)?;
        Ok(())
    }
}
