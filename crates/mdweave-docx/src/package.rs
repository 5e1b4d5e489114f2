//! OPC package assembly: the `.docx` zip container and its fixed parts.

use std::io::{Cursor, Write};

use mdweave_document::Block;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::DocxError;
use crate::document_xml::{self, EmbeddedImage};

/// Build the complete document package in memory.
pub(crate) fn build(title: &str, blocks: &[Block]) -> Result<Vec<u8>, DocxError> {
    let images = document_xml::collect_images(blocks);
    let document = document_xml::render(title, blocks, &images);

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    writer.start_file("[Content_Types].xml", options)?;
    writer.write_all(CONTENT_TYPES.as_bytes())?;

    writer.start_file("_rels/.rels", options)?;
    writer.write_all(PACKAGE_RELS.as_bytes())?;

    writer.start_file("word/document.xml", options)?;
    writer.write_all(document.as_bytes())?;

    writer.start_file("word/_rels/document.xml.rels", options)?;
    writer.write_all(document_rels(&images).as_bytes())?;

    writer.start_file("word/styles.xml", options)?;
    writer.write_all(STYLES.as_bytes())?;

    for (i, embedded) in images.iter().enumerate() {
        writer.start_file(format!("word/media/image{}.png", i + 1), options)?;
        writer.write_all(&embedded.image.bytes)?;
    }

    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}

/// Relationships for the document part: styles first, then one entry per
/// embedded image, matching the ids assigned during rendering.
fn document_rels(images: &[EmbeddedImage<'_>]) -> String {
    let mut out = String::with_capacity(512);
    out.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    out.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    out.push_str(
        r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
    );
    for (i, embedded) in images.iter().enumerate() {
        out.push_str(&format!(
            r#"<Relationship Id="{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/image{}.png"/>"#,
            embedded.rel_id,
            i + 1,
        ));
    }
    out.push_str("</Relationships>");
    out
}

const CONTENT_TYPES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Default Extension="png" ContentType="image/png"/>"#,
    r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
    r#"<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>"#,
    r#"</Types>"#,
);

const PACKAGE_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
    r#"</Relationships>"#,
);

/// Minimal style sheet: Normal, Title, and the six heading levels with
/// descending sizes (half-points).
const STYLES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
    r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:rPr><w:sz w:val="22"/></w:rPr></w:style>"#,
    r#"<w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/><w:pPr><w:spacing w:after="240"/></w:pPr><w:rPr><w:b/><w:sz w:val="52"/></w:rPr></w:style>"#,
    r#"<w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:pPr><w:spacing w:before="240" w:after="120"/></w:pPr><w:rPr><w:b/><w:sz w:val="36"/></w:rPr></w:style>"#,
    r#"<w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/><w:basedOn w:val="Normal"/><w:pPr><w:spacing w:before="240" w:after="120"/></w:pPr><w:rPr><w:b/><w:sz w:val="32"/></w:rPr></w:style>"#,
    r#"<w:style w:type="paragraph" w:styleId="Heading3"><w:name w:val="heading 3"/><w:basedOn w:val="Normal"/><w:pPr><w:spacing w:before="200" w:after="100"/></w:pPr><w:rPr><w:b/><w:sz w:val="28"/></w:rPr></w:style>"#,
    r#"<w:style w:type="paragraph" w:styleId="Heading4"><w:name w:val="heading 4"/><w:basedOn w:val="Normal"/><w:pPr><w:spacing w:before="200" w:after="100"/></w:pPr><w:rPr><w:b/><w:sz w:val="26"/></w:rPr></w:style>"#,
    r#"<w:style w:type="paragraph" w:styleId="Heading5"><w:name w:val="heading 5"/><w:basedOn w:val="Normal"/><w:pPr><w:spacing w:before="160" w:after="80"/></w:pPr><w:rPr><w:b/><w:sz w:val="24"/></w:rPr></w:style>"#,
    r#"<w:style w:type="paragraph" w:styleId="Heading6"><w:name w:val="heading 6"/><w:basedOn w:val="Normal"/><w:pPr><w:spacing w:before="160" w:after="80"/></w:pPr><w:rPr><w:b/><w:i/><w:sz w:val="22"/></w:rPr></w:style>"#,
    r#"</w:styles>"#,
);

#[cfg(test)]
mod tests {
    use std::io::Read;

    use mdweave_document::{Block, Image, parse};
    use pretty_assertions::assert_eq;
    use zip::ZipArchive;

    use super::*;

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        let mut part = archive.by_name(name).unwrap();
        let mut content = String::new();
        part.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn test_package_has_required_parts() {
        let blocks = parse("# Hello\n\nWorld\n");
        let bytes = build("Doc", &blocks).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "[Content_Types].xml",
                "_rels/.rels",
                "word/document.xml",
                "word/_rels/document.xml.rels",
                "word/styles.xml",
            ]
        );
    }

    #[test]
    fn test_document_part_contains_content() {
        let blocks = parse("# Hello\n\nplain text\n");
        let bytes = build("Doc", &blocks).unwrap();
        let document = read_part(&bytes, "word/document.xml");
        assert!(document.contains("Hello"));
        assert!(document.contains("plain text"));
        assert!(document.contains(r#"<w:pStyle w:val="Title"/>"#));
    }

    #[test]
    fn test_image_stored_with_matching_relationship() {
        let blocks = vec![Block::Diagram {
            source: "graph TD".to_owned(),
            image: Some(Image {
                bytes: vec![1, 2, 3, 4],
                width_px: 100,
                height_px: 50,
            }),
        }];
        let bytes = build("Doc", &blocks).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(bytes.clone())).unwrap();
        let mut media = archive.by_name("word/media/image1.png").unwrap();
        let mut stored = Vec::new();
        media.read_to_end(&mut stored).unwrap();
        assert_eq!(stored, vec![1, 2, 3, 4]);

        let rels = read_part(&bytes, "word/_rels/document.xml.rels");
        assert!(rels.contains(r#"Id="rId2""#));
        assert!(rels.contains("media/image1.png"));
    }

    #[test]
    fn test_styles_define_heading_levels() {
        let bytes = build("Doc", &[]).unwrap();
        let styles = read_part(&bytes, "word/styles.xml");
        for level in 1..=6 {
            assert!(styles.contains(&format!(r#"w:styleId="Heading{level}""#)));
        }
    }
}
