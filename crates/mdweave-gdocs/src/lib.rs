//! Google Docs output for mdweave.
//!
//! A conversion is three phases: upload every resolved diagram image to
//! Drive and make it link-readable, create an empty document, then apply
//! the whole document body as one atomic `batchUpdate`. Batch construction
//! is pure ([`build_batch`]) so the index bookkeeping is testable without
//! any HTTP.

mod batch;
mod client;
mod emitter;
mod error;
mod token;

pub use batch::{Batch, ImageRefs, build_batch};
pub use client::{DOCS_ENDPOINT, DRIVE_ENDPOINT, GdocsClient};
pub use emitter::DocsEmitter;
pub use error::GdocsError;
pub use token::load_access_token;
