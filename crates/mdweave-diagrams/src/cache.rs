//! Per-run diagram cache.
//!
//! One cache lives for one converted document. It maps a content hash of the
//! diagram source to the render outcome, failures included, so a second
//! identical diagram in the same document neither re-renders nor re-fails
//! against the collaborator.

use std::collections::HashMap;

use mdweave_document::Image;
use sha2::{Digest, Sha256};

use crate::renderer::RenderError;

/// Cache key for a diagram source.
#[derive(Debug)]
pub struct DiagramKey<'a> {
    /// Diagram source text, exactly as it appeared in the fence body.
    pub source: &'a str,
}

impl DiagramKey<'_> {
    /// SHA-256 of the source, hex-encoded.
    #[must_use]
    pub fn compute_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.source.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Process-scoped cache for one conversion run.
#[derive(Debug, Default)]
pub struct DiagramCache {
    entries: HashMap<String, Result<Image, RenderError>>,
}

impl DiagramCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the outcome for a diagram source.
    #[must_use]
    pub fn get(&self, source: &str) -> Option<&Result<Image, RenderError>> {
        self.entries.get(&DiagramKey { source }.compute_hash())
    }

    /// Record the outcome for a diagram source.
    pub fn insert(&mut self, source: &str, result: Result<Image, RenderError>) {
        self.entries
            .insert(DiagramKey { source }.compute_hash(), result);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
