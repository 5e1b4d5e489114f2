//! Document emission: uploads, creation, and the single update batch.

use mdweave_document::Block;
use tracing::info;

use crate::batch::{ImageRefs, build_batch};
use crate::client::GdocsClient;
use crate::error::GdocsError;

/// Emits a block sequence as a new Google Doc.
pub struct DocsEmitter {
    client: GdocsClient,
}

impl DocsEmitter {
    pub fn new(client: GdocsClient) -> Self {
        Self { client }
    }

    /// Create a document titled `title` from `blocks` and return its URL.
    ///
    /// Every resolved diagram image is uploaded to Drive first; an upload
    /// failure aborts before any document exists. The content itself is
    /// applied as one atomic batch, so a rejected batch leaves an empty
    /// document rather than a half-formatted one.
    pub fn emit(&self, title: &str, blocks: &[Block]) -> Result<String, GdocsError> {
        let mut uris = Vec::new();
        for (i, block) in blocks.iter().enumerate() {
            if let Block::Diagram {
                image: Some(image), ..
            } = block
            {
                let name = format!("mermaid_{i}.png");
                uris.push(self.client.upload_public_png(&name, &image.bytes)?);
            }
        }

        let document_id = self.client.create_document(title)?;

        let batch = build_batch(blocks, &ImageRefs::new(uris));
        if !batch.is_empty() {
            self.client.batch_update(&document_id, &batch.requests)?;
        }

        let url = format!("https://docs.google.com/document/d/{document_id}/edit");
        info!("Document created: {}", url);
        Ok(url)
    }
}
