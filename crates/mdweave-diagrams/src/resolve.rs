//! Diagram resolution pass over a parsed block sequence.

use mdweave_document::Block;
use tracing::warn;

use crate::renderer::DiagramRenderer;

/// Render every diagram block in place.
///
/// Successful renders fill `Block::Diagram::image`. A diagram that fails to
/// render is replaced by a `CodeBlock` carrying its raw source with language
/// `mermaid`, so conversion continues with the content visible instead of
/// dropped. Returns one warning per failed diagram.
pub fn resolve_diagrams(blocks: &mut [Block], renderer: &mut DiagramRenderer) -> Vec<String> {
    let mut warnings = Vec::new();

    for block in blocks.iter_mut() {
        let Block::Diagram { source, image } = block else {
            continue;
        };
        match renderer.render(source) {
            Ok(rendered) => *image = Some(rendered),
            Err(err) => {
                warn!("diagram rendering failed: {err}");
                warnings.push(format!("diagram kept as code block: {err}"));
                *block = Block::CodeBlock {
                    language: Some("mermaid".to_owned()),
                    lines: source.lines().map(str::to_owned).collect(),
                };
            }
        }
    }

    warnings
}
