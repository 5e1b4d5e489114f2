//! File upload operations for the Drive API.

use rand::RngExt;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::{GdocsClient, check_status};
use crate::error::GdocsError;

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

impl GdocsClient {
    /// Upload a PNG and make it readable by anyone with the link.
    ///
    /// Returns a URI the Docs API can fetch the image from.
    pub fn upload_public_png(&self, name: &str, data: &[u8]) -> Result<String, GdocsError> {
        let id = self.upload_png(name, data)?;
        self.allow_public_read(&id)?;
        Ok(format!("https://drive.google.com/uc?id={id}"))
    }

    /// Multipart upload: one JSON metadata part, one binary media part.
    fn upload_png(&self, name: &str, data: &[u8]) -> Result<String, GdocsError> {
        let url = format!(
            "{}/upload/drive/v3/files?uploadType=multipart&fields=id",
            self.drive_url
        );

        info!("Uploading '{}' ({} bytes) to Drive", name, data.len());

        let metadata = serde_json::to_vec(&json!({
            "name": name,
            "mimeType": "image/png"
        }))?;

        let boundary = format!(
            "----MdweaveFormBoundary{:016x}",
            rand::rng().random::<u64>()
        );
        let mut body = Vec::new();

        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
        body.extend_from_slice(&metadata);
        body.extend_from_slice(b"\r\n");

        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");

        body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());

        let response = self
            .agent
            .post(&url)
            .header("Authorization", &self.bearer())
            .header(
                "Content-Type",
                &format!("multipart/related; boundary={}", boundary),
            )
            .header("Accept", "application/json")
            .send(&body[..])?;

        let mut body_reader = check_status(response)?;
        let file: DriveFile = body_reader.read_json()?;
        Ok(file.id)
    }

    fn allow_public_read(&self, file_id: &str) -> Result<(), GdocsError> {
        let url = format!("{}/drive/v3/files/{}/permissions", self.drive_url, file_id);

        let payload = serde_json::to_vec(&json!({
            "type": "anyone",
            "role": "reader"
        }))?;

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
