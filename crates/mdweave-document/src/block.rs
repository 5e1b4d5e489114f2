//! Document model types.

/// A maximal span of text sharing one style combination.
///
/// Concatenating the `text` of all runs in a block yields the source text
/// with the style markers removed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub code: bool,
    /// Target URL when the run came from a `[text](url)` link. The link
    /// markup itself never reaches `text`.
    pub link: Option<String>,
}

impl InlineRun {
    /// Create an unstyled run.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
            code: false,
            link: None,
        }
    }

    /// True when no style flag is set.
    #[must_use]
    pub fn is_plain(&self) -> bool {
        !self.bold && !self.italic && !self.code && self.link.is_none()
    }
}

/// A rendered diagram image with pixel dimensions.
///
/// Owned by the [`Block::Diagram`] that produced it until an emitter consumes
/// the block; emitters keep their own derived representation (embedded bytes
/// or an uploaded-file reference).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    pub bytes: Vec<u8>,
    pub width_px: u32,
    pub height_px: u32,
}

/// One item of a [`Block::List`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListItem {
    /// Nesting depth derived from leading indentation, starting at 0.
    pub depth: usize,
    /// True for `1.`-style markers, false for `-`/`*`/`+`.
    pub ordered: bool,
    pub text: Vec<InlineRun>,
}

/// One structural unit of a parsed document.
///
/// Block order equals source order; no reordering ever occurs. Blocks are
/// immutable after parsing except that diagram resolution fills
/// [`Block::Diagram::image`] exactly once before any emitter runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    Heading {
        /// Heading level, 1..=6.
        level: u8,
        text: Vec<InlineRun>,
    },
    Paragraph {
        text: Vec<InlineRun>,
    },
    CodeBlock {
        /// Fence info string, if any. No syntax coloring is derived from it.
        language: Option<String>,
        lines: Vec<String>,
    },
    /// A fenced block whose info string was `mermaid`. The body is kept
    /// verbatim for the renderer.
    Diagram {
        source: String,
        image: Option<Image>,
    },
    Table {
        header: Vec<Vec<InlineRun>>,
        /// Every row has exactly `header.len()` cells.
        rows: Vec<Vec<Vec<InlineRun>>>,
    },
    List {
        items: Vec<ListItem>,
    },
    Divider,
}
