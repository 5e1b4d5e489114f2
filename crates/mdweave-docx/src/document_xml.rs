//! WordprocessingML generation for `word/document.xml`.
//!
//! The XML is built by pushing escaped strings, one block at a time. Sizes
//! follow OOXML conventions: font sizes in half-points, indentation in
//! twentieths of a point (twips), image extents in EMUs.

use std::fmt::Write;

use mdweave_document::{Block, Image, InlineRun, ListItem};

/// Fixed target width for embedded images: 6 inches in EMUs.
const IMAGE_WIDTH_EMU: u64 = 6 * 914_400;

/// Indentation per list depth level: half an inch in twips.
const LIST_INDENT_TWIPS: usize = 720;

/// An image embedded in the package, with its relationship id.
pub(crate) struct EmbeddedImage<'a> {
    pub rel_id: String,
    pub image: &'a Image,
}

/// Collect every resolved diagram image in block order and assign
/// relationship ids. `rId1` is reserved for the styles part.
pub(crate) fn collect_images(blocks: &[Block]) -> Vec<EmbeddedImage<'_>> {
    blocks
        .iter()
        .filter_map(|block| match block {
            Block::Diagram {
                image: Some(image), ..
            } => Some(image),
            _ => None,
        })
        .enumerate()
        .map(|(i, image)| EmbeddedImage {
            rel_id: format!("rId{}", i + 2),
            image,
        })
        .collect()
}

/// Render the full document part.
pub(crate) fn render(title: &str, blocks: &[Block], images: &[EmbeddedImage<'_>]) -> String {
    let mut out = String::with_capacity(8192);
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push_str(
        r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture"><w:body>"#,
    );

    // Document title, mirrored from the markdown file name.
    if !title.is_empty() {
        out.push_str(r#"<w:p><w:pPr><w:pStyle w:val="Title"/></w:pPr>"#);
        text_run(&mut out, title, false, false, false, false);
        out.push_str("</w:p>");
    }

    let mut next_image = 0;
    let mut writer = BlockWriter::new(&mut out);
    for block in blocks {
        match block {
            Block::Heading { level, text } => writer.heading(*level, text),
            Block::Paragraph { text } => writer.paragraph(text),
            Block::CodeBlock { lines, .. } => writer.code_block(lines),
            Block::Diagram { image, source } => match image {
                Some(_) => {
                    writer.image(&images[next_image], next_image);
                    next_image += 1;
                }
                // Unresolved diagram: keep the source visible as code.
                None => writer.code_block(&source.lines().map(str::to_owned).collect::<Vec<_>>()),
            },
            Block::Table { header, rows } => writer.table(header, rows),
            Block::List { items } => writer.list(items),
            Block::Divider => writer.divider(),
        }
    }

    out.push_str(r#"<w:sectPr/></w:body></w:document>"#);
    out
}

/// Emits one `w:p`/`w:tbl` element per block.
struct BlockWriter<'a> {
    out: &'a mut String,
}

impl<'a> BlockWriter<'a> {
    fn new(out: &'a mut String) -> Self {
        Self { out }
    }

    fn heading(&mut self, level: u8, text: &[InlineRun]) {
        let _ = write!(
            self.out,
            r#"<w:p><w:pPr><w:pStyle w:val="Heading{level}"/></w:pPr>"#
        );
        runs(self.out, text);
        self.out.push_str("</w:p>");
    }

    fn paragraph(&mut self, text: &[InlineRun]) {
        self.out.push_str("<w:p>");
        runs(self.out, text);
        self.out.push_str("</w:p>");
    }

    /// One shaded, boxed, monospace paragraph per source line. The language
    /// is intentionally ignored: plain monospace, no syntax coloring.
    fn code_block(&mut self, lines: &[String]) {
        let empty = [String::new()];
        let rendered = if lines.is_empty() { &empty[..] } else { lines };

        for line in rendered {
            self.out.push_str("<w:p><w:pPr>");
            self.out.push_str(code_borders());
            self.out
                .push_str(r#"<w:shd w:val="clear" w:fill="F2F2F2"/></w:pPr>"#);
            code_run(self.out, line);
            self.out.push_str("</w:p>");
        }
    }

    fn table(&mut self, header: &[Vec<InlineRun>], rows: &[Vec<Vec<InlineRun>>]) {
        self.out.push_str(
            r#"<w:tbl><w:tblPr><w:tblW w:w="0" w:type="auto"/><w:tblBorders><w:top w:val="single" w:sz="4" w:color="auto"/><w:left w:val="single" w:sz="4" w:color="auto"/><w:bottom w:val="single" w:sz="4" w:color="auto"/><w:right w:val="single" w:sz="4" w:color="auto"/><w:insideH w:val="single" w:sz="4" w:color="auto"/><w:insideV w:val="single" w:sz="4" w:color="auto"/></w:tblBorders></w:tblPr>"#,
        );
        self.out.push_str("<w:tblGrid>");
        for _ in header {
            self.out.push_str(r#"<w:gridCol/>"#);
        }
        self.out.push_str("</w:tblGrid>");

        self.table_row(header, true);
        for row in rows {
            self.table_row(row, false);
        }

        // Spacing after the grid, as a plain empty paragraph.
        self.out.push_str("</w:tbl><w:p/>");
    }

    fn table_row(&mut self, cells: &[Vec<InlineRun>], header: bool) {
        self.out.push_str("<w:tr>");
        for cell in cells {
            self.out.push_str("<w:tc>");
            if header {
                self.out
                    .push_str(r#"<w:tcPr><w:shd w:val="clear" w:fill="D9E2F3"/></w:tcPr>"#);
            }
            self.out.push_str("<w:p>");
            if header {
                // Header cells are emphasized regardless of source styling.
                for run in cell {
                    text_run(
                        self.out,
                        &run.text,
                        true,
                        run.italic,
                        run.code,
                        run.link.is_some(),
                    );
                }
            } else {
                runs(self.out, cell);
            }
            self.out.push_str("</w:p></w:tc>");
        }
        self.out.push_str("</w:tr>");
    }

    fn list(&mut self, items: &[ListItem]) {
        // Ordered-item counters per depth; deeper counters reset whenever a
        // shallower item appears.
        let mut counters: Vec<usize> = Vec::new();
        for item in items {
            counters.truncate(item.depth + 1);
            counters.resize(item.depth + 1, 0);

            let prefix = if item.ordered {
                counters[item.depth] += 1;
                format!("{}. ", counters[item.depth])
            } else {
                "\u{2022} ".to_owned()
            };

            let _ = write!(
                self.out,
                r#"<w:p><w:pPr><w:ind w:left="{}"/></w:pPr>"#,
                LIST_INDENT_TWIPS * (item.depth + 1)
            );
            text_run(self.out, &prefix, false, false, false, false);
            runs(self.out, &item.text);
            self.out.push_str("</w:p>");
        }
    }

    fn divider(&mut self) {
        self.out.push_str(
            r#"<w:p><w:pPr><w:pBdr><w:bottom w:val="single" w:sz="6" w:space="1" w:color="auto"/></w:pBdr></w:pPr></w:p>"#,
        );
    }

    /// Inline image scaled to a fixed width, height preserving the source
    /// aspect ratio.
    fn image(&mut self, embedded: &EmbeddedImage<'_>, index: usize) {
        let image = embedded.image;
        let height_emu = if image.width_px == 0 {
            IMAGE_WIDTH_EMU
        } else {
            IMAGE_WIDTH_EMU * u64::from(image.height_px) / u64::from(image.width_px)
        };
        let name = format!("diagram{}.png", index + 1);

        let _ = write!(
            self.out,
            concat!(
                r#"<w:p><w:r><w:drawing><wp:inline distT="0" distB="0" distL="0" distR="0">"#,
                r#"<wp:extent cx="{cx}" cy="{cy}"/>"#,
                r#"<wp:docPr id="{id}" name="{name}"/>"#,
                r#"<a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
                r#"<pic:pic><pic:nvPicPr><pic:cNvPr id="{id}" name="{name}"/><pic:cNvPicPr/></pic:nvPicPr>"#,
                r#"<pic:blipFill><a:blip r:embed="{rel}"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>"#,
                r#"<pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#,
                r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr>"#,
                r#"</pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r></w:p><w:p/>"#,
            ),
            cx = IMAGE_WIDTH_EMU,
            cy = height_emu,
            id = index + 1,
            name = name,
            rel = embedded.rel_id,
        );
    }
}

fn runs(out: &mut String, text: &[InlineRun]) {
    for run in text {
        text_run(
            out,
            &run.text,
            run.bold,
            run.italic,
            run.code,
            run.link.is_some(),
        );
    }
}

fn text_run(out: &mut String, text: &str, bold: bool, italic: bool, code: bool, link: bool) {
    out.push_str("<w:r>");
    if bold || italic || code || link {
        out.push_str("<w:rPr>");
        if code {
            out.push_str(r#"<w:rFonts w:ascii="Courier New" w:hAnsi="Courier New"/>"#);
        }
        if bold {
            out.push_str("<w:b/>");
        }
        if italic {
            out.push_str("<w:i/>");
        }
        if link {
            // Link text keeps the label only, shown in the conventional
            // blue-underline style.
            out.push_str(r#"<w:color w:val="0000FF"/><w:u w:val="single"/>"#);
        }
        out.push_str("</w:rPr>");
    }
    let _ = write!(out, r#"<w:t xml:space="preserve">{}</w:t>"#, escape_text(text));
    out.push_str("</w:r>");
}

fn code_run(out: &mut String, line: &str) {
    out.push_str(
        r#"<w:r><w:rPr><w:rFonts w:ascii="Courier New" w:hAnsi="Courier New"/><w:sz w:val="20"/></w:rPr>"#,
    );
    let _ = write!(out, r#"<w:t xml:space="preserve">{}</w:t>"#, escape_text(line));
    out.push_str("</w:r>");
}

fn code_borders() -> &'static str {
    concat!(
        r#"<w:pBdr>"#,
        r#"<w:top w:val="single" w:sz="4" w:space="10" w:color="000000"/>"#,
        r#"<w:left w:val="single" w:sz="4" w:space="10" w:color="000000"/>"#,
        r#"<w:bottom w:val="single" w:sz="4" w:space="10" w:color="000000"/>"#,
        r#"<w:right w:val="single" w:sz="4" w:space="10" w:color="000000"/>"#,
        r#"</w:pBdr>"#,
    )
}

/// Escape XML special characters for text content.
pub(crate) fn escape_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(ch),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use mdweave_document::parse;
    use pretty_assertions::assert_eq;

    use super::*;

    fn render_source(source: &str) -> String {
        let blocks = parse(source);
        let images = collect_images(&blocks);
        render("Test", &blocks, &images)
    }

    #[test]
    fn test_heading_uses_heading_style() {
        let xml = render_source("## Section");
        assert!(xml.contains(r#"<w:pStyle w:val="Heading2"/>"#));
        assert!(xml.contains(r#"<w:t xml:space="preserve">Section</w:t>"#));
    }

    #[test]
    fn test_bold_and_italic_runs() {
        let xml = render_source("has **bold** and *italic*");
        assert!(xml.contains("<w:b/>"));
        assert!(xml.contains("<w:i/>"));
    }

    #[test]
    fn test_link_shows_label_blue_and_underlined() {
        let xml = render_source("see [the docs](https://example.com) here");
        assert!(xml.contains(r#"<w:color w:val="0000FF"/><w:u w:val="single"/>"#));
        assert!(xml.contains(r#"<w:t xml:space="preserve">the docs</w:t>"#));
        // Only the label survives; the markup and URL do not.
        assert!(!xml.contains("example.com"));
        assert!(!xml.contains("[the docs]"));
    }

    #[test]
    fn test_code_block_shading_and_monospace() {
        let xml = render_source("```rust\nfn main() {}\n```");
        assert!(xml.contains(r#"w:fill="F2F2F2""#));
        assert!(xml.contains("Courier New"));
        // Language never leaks into the output.
        assert!(!xml.contains("rust"));
    }

    #[test]
    fn test_code_block_one_paragraph_per_line() {
        let xml = render_source("```\nalpha\nbeta\n```");
        assert_eq!(xml.matches(r#"w:fill="F2F2F2""#).count(), 2);
    }

    #[test]
    fn test_table_header_shaded() {
        let xml = render_source("| A | B |\n|---|---|\n| 1 | 2 |");
        assert!(xml.contains("<w:tbl>"));
        assert_eq!(xml.matches(r#"w:fill="D9E2F3""#).count(), 2);
        assert_eq!(xml.matches("<w:tr>").count(), 2);
    }

    #[test]
    fn test_list_indent_scales_with_depth() {
        let xml = render_source("- a\n  - b\n");
        assert!(xml.contains(r#"<w:ind w:left="720"/>"#));
        assert!(xml.contains(r#"<w:ind w:left="1440"/>"#));
        assert!(xml.contains("\u{2022} "));
    }

    #[test]
    fn test_ordered_list_numbering_resets_per_depth() {
        let xml = render_source("1. a\n2. b\n    1. c\n3. d\n");
        assert!(xml.contains(">1. </w:t>"));
        assert!(xml.contains(">2. </w:t>"));
        assert!(xml.contains(">3. </w:t>"));
        // Nested counter starts over.
        assert_eq!(xml.matches(">1. </w:t>").count(), 2);
    }

    #[test]
    fn test_divider_is_bottom_border() {
        let xml = render_source("---");
        assert!(xml.contains("<w:pBdr><w:bottom"));
    }

    #[test]
    fn test_text_is_escaped() {
        let xml = render_source("a < b & c > d");
        assert!(xml.contains("a &lt; b &amp; c &gt; d"));
    }

    #[test]
    fn test_image_scaled_to_fixed_width() {
        use mdweave_document::{Block, Image};

        let blocks = vec![Block::Diagram {
            source: "graph TD".to_owned(),
            image: Some(Image {
                bytes: vec![0; 32],
                width_px: 400,
                height_px: 200,
            }),
        }];
        let images = collect_images(&blocks);
        let xml = render("T", &blocks, &images);

        // 2:1 aspect ratio kept: height is half the fixed width.
        assert!(xml.contains(&format!(r#"cx="{IMAGE_WIDTH_EMU}""#)));
        assert!(xml.contains(&format!(r#"cy="{}""#, IMAGE_WIDTH_EMU / 2)));
        assert!(xml.contains(r#"r:embed="rId2""#));
    }

    #[test]
    fn test_unresolved_diagram_rendered_as_code() {
        use mdweave_document::Block;

        let blocks = vec![Block::Diagram {
            source: "graph TD".to_owned(),
            image: None,
        }];
        let xml = render("T", &blocks, &[]);
        assert!(xml.contains("graph TD"));
        assert!(xml.contains("Courier New"));
    }
}
