//! Mermaid diagram rendering for mdweave.
//!
//! Diagram blocks extracted by the parser are rasterized to PNG through one
//! of two strategies, chosen once per run:
//! - [`RenderStrategy::Remote`]: a mermaid.ink-style HTTP endpoint that takes
//!   the base64url-encoded source in the URL
//! - [`RenderStrategy::Local`]: an `mmdc`-style executable invoked with
//!   scoped temporary input/output files
//!
//! Results (including failures) are cached per conversion run keyed by the
//! diagram source, so identical diagrams render at most once per document.
//! [`resolve_diagrams`] walks a block sequence, fills in rendered images and
//! substitutes a plain code block for every diagram that could not be
//! rendered, so content is never dropped.

mod cache;
mod png;
mod renderer;
mod resolve;

pub use cache::{DiagramCache, DiagramKey};
pub use png::png_dimensions;
pub use renderer::{DiagramRenderer, RenderBackend, RenderError, RenderStrategy};
pub use resolve::resolve_diagrams;
