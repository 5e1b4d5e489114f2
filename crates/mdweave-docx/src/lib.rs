//! Self-contained DOCX output for mdweave.
//!
//! Walks a parsed block sequence and produces a complete `.docx` package in
//! memory: headings as styled paragraphs, code blocks as bordered monospace
//! paragraphs, tables as grids with an emphasized header row, resolved
//! diagrams as embedded PNGs scaled to a fixed page width, lists as
//! indented bullet/numbered paragraphs.
//!
//! The package is fully constructed before anything touches the filesystem;
//! [`emit_to_path`] writes the finished bytes in one step so a failed
//! conversion can never corrupt a previously written output file.

mod document_xml;
mod package;

use std::path::Path;

use mdweave_document::Block;
use tracing::info;

/// DOCX emission failure.
#[derive(Debug, thiserror::Error)]
pub enum DocxError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Build a complete DOCX package for the given blocks.
pub fn emit(title: &str, blocks: &[Block]) -> Result<Vec<u8>, DocxError> {
    package::build(title, blocks)
}

/// Build the package, then write it to `path` in a single step.
///
/// Parent directories are created as needed. Nothing is written unless the
/// whole package was constructed successfully.
pub fn emit_to_path(title: &str, blocks: &[Block], path: &Path) -> Result<(), DocxError> {
    let bytes = emit(title, blocks)?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, &bytes)?;
    info!("wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_to_path_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docx").join("out.docx");

        emit_to_path("Doc", &[], &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        // Zip local file header magic.
        assert_eq!(&bytes[..2], b"PK");
    }
}
