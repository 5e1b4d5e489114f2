//! Shared conversion pipeline: read, parse, resolve diagrams.

use std::path::{Path, PathBuf};

use mdweave_config::{DiagramsConfig, RendererKind};
use mdweave_diagrams::{DiagramRenderer, RenderStrategy, resolve_diagrams};
use mdweave_document::{Block, parse};

use crate::error::CliError;
use crate::output::Output;

/// Build a renderer for the configured strategy.
///
/// Each converted file gets a fresh renderer, so the diagram cache never
/// outlives a single conversion.
pub(crate) fn renderer_for(config: &DiagramsConfig) -> DiagramRenderer {
    let strategy = match config.renderer {
        RendererKind::Remote => RenderStrategy::Remote {
            base_url: config.base_url.clone(),
            timeout: config.timeout,
        },
        RendererKind::Local => RenderStrategy::Local {
            command: config.command.clone(),
        },
    };
    DiagramRenderer::new(strategy)
}

/// Read and parse a markdown file, rendering its diagrams.
///
/// Diagram failures degrade to code blocks and are reported as warnings;
/// only I/O failures are errors.
pub(crate) fn load_blocks(
    path: &Path,
    diagrams: &DiagramsConfig,
    output: &Output,
) -> Result<Vec<Block>, CliError> {
    let source = std::fs::read_to_string(path)?;
    let mut blocks = parse(&source);

    let mut renderer = renderer_for(diagrams);
    for warning in resolve_diagrams(&mut blocks, &mut renderer) {
        output.warning(&format!("{}: {}", path.display(), warning));
    }

    Ok(blocks)
}

/// Document title: the file name without its extension.
pub(crate) fn document_title(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| "Document".to_owned(), |stem| stem.to_string_lossy().into_owned())
}

/// Markdown files directly inside `dir`, sorted by name. Not recursive.
pub(crate) fn markdown_files(dir: &Path) -> Result<Vec<PathBuf>, CliError> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().is_some_and(|ext| ext == "md")
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Convert a file or every markdown file in a directory.
///
/// In directory mode each file is processed to completion before the next;
/// one file's failure does not abort the rest, and per-file outcomes are
/// summarized at the end.
pub(crate) fn run_over_path<F>(
    path: &Path,
    output: &Output,
    mut convert: F,
) -> Result<(), CliError>
where
    F: FnMut(&Path) -> Result<(), CliError>,
{
    if !path.exists() {
        return Err(CliError::Validation(format!(
            "Path '{}' not found",
            path.display()
        )));
    }

    if path.is_file() {
        return convert(path);
    }

    let files = markdown_files(path)?;
    if files.is_empty() {
        output.info(&format!(
            "No markdown files found in '{}'",
            path.display()
        ));
        return Ok(());
    }

    output.info(&format!(
        "Found {} markdown file(s) in '{}'",
        files.len(),
        path.display()
    ));

    let mut converted = 0;
    for file in &files {
        output.processing(&document_title(file));
        match convert(file) {
            Ok(()) => converted += 1,
            Err(err) => {
                output.error(&format!("Error processing {}: {}", file.display(), err));
            }
        }
    }

    output.summary(converted, files.len());

    Ok(())
}
