//! CLI command implementations.

pub(crate) mod docx;
pub(crate) mod gdocs;

pub(crate) use docx::DocxArgs;
pub(crate) use gdocs::GdocsArgs;
