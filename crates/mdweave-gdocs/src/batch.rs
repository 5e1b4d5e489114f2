//! Pure construction of the Docs `batchUpdate` request list.
//!
//! A conversion is a single ordered batch: a running cursor starts at index 1
//! (the first writable position in a fresh document) and every block advances
//! it by a deterministic contribution. Insert operations use the cursor value
//! captured before advancing, and style operations reference exactly the
//! ranges just inserted, so the whole batch can be computed without talking
//! to the API. Indices count Unicode scalar values.

use mdweave_document::{Block, InlineRun, ListItem};
use serde_json::{Value, json};

/// Drive URIs for resolved diagram images, in block order.
#[derive(Debug, Default)]
pub struct ImageRefs {
    uris: Vec<String>,
}

impl ImageRefs {
    pub fn new(uris: Vec<String>) -> Self {
        Self { uris }
    }

    fn uri(&self, index: usize) -> Option<&str> {
        self.uris.get(index).map(String::as_str)
    }
}

/// A fully computed `batchUpdate` payload.
#[derive(Debug)]
pub struct Batch {
    /// Request objects in submission order.
    pub requests: Vec<Value>,
    /// Insertion index captured for each block, in block order.
    pub offsets: Vec<usize>,
    /// Cursor position after the final block.
    pub cursor: usize,
}

impl Batch {
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

/// Build the batch for a block sequence.
pub fn build_batch(blocks: &[Block], images: &ImageRefs) -> Batch {
    let mut builder = Builder {
        requests: Vec::new(),
        offsets: Vec::with_capacity(blocks.len()),
        cursor: 1,
        next_image: 0,
    };

    for block in blocks {
        builder.offsets.push(builder.cursor);
        match block {
            Block::Heading { level, text } => builder.heading(*level, text),
            Block::Paragraph { text } => builder.styled_text(text, None),
            Block::CodeBlock { lines, .. } => builder.code_block(lines),
            Block::Diagram { source, image } => match image {
                Some(_) => builder.image(images),
                // Unresolved diagram: keep the source readable.
                None => {
                    let lines: Vec<String> = source.lines().map(str::to_owned).collect();
                    builder.code_block(&lines);
                }
            },
            Block::Table { header, rows } => builder.table(header, rows),
            Block::List { items } => builder.list(items),
            Block::Divider => builder.divider(),
        }
    }

    Batch {
        requests: builder.requests,
        offsets: builder.offsets,
        cursor: builder.cursor,
    }
}

struct Builder {
    requests: Vec<Value>,
    offsets: Vec<usize>,
    cursor: usize,
    next_image: usize,
}

impl Builder {
    fn heading(&mut self, level: u8, text: &[InlineRun]) {
        self.styled_text(text, Some(level));
    }

    /// Insert one paragraph of runs at the cursor, optionally with a named
    /// heading style, followed by run-level bold/italic/monospace styling.
    fn styled_text(&mut self, text: &[InlineRun], heading_level: Option<u8>) {
        let start = self.cursor;
        let body = flat_text(text);
        let full = format!("{body}\n");
        let len = chars(&full);

        self.insert_text(start, &full);

        if let Some(level) = heading_level {
            self.requests.push(json!({
                "updateParagraphStyle": {
                    "range": {"startIndex": start, "endIndex": start + len},
                    "paragraphStyle": {"namedStyleType": format!("HEADING_{level}")},
                    "fields": "namedStyleType"
                }
            }));
        }

        self.run_styles(start, text);
        self.cursor += len;
    }

    /// Style requests for the bold/italic/code runs inside a paragraph
    /// whose plain text starts at `start`.
    fn run_styles(&mut self, start: usize, text: &[InlineRun]) {
        let mut pos = start;
        for run in text {
            let run_len = chars(&run.text);
            if !run.is_plain() && run_len > 0 {
                let mut style = serde_json::Map::new();
                let mut fields = Vec::new();
                if run.bold {
                    style.insert("bold".to_owned(), json!(true));
                    fields.push("bold");
                }
                if run.italic {
                    style.insert("italic".to_owned(), json!(true));
                    fields.push("italic");
                }
                if run.code {
                    style.insert(
                        "weightedFontFamily".to_owned(),
                        json!({"fontFamily": "Courier New"}),
                    );
                    fields.push("weightedFontFamily");
                }
                if let Some(url) = &run.link {
                    style.insert("link".to_owned(), json!({"url": url}));
                    fields.push("link");
                }
                self.requests.push(json!({
                    "updateTextStyle": {
                        "range": {"startIndex": pos, "endIndex": pos + run_len},
                        "textStyle": Value::Object(style),
                        "fields": fields.join(",")
                    }
                }));
            }
            pos += run_len;
        }
    }

    fn code_block(&mut self, lines: &[String]) {
        let start = self.cursor;
        let mut text = lines.join("\n");
        text.push('\n');
        let len = chars(&text);

        self.insert_text(start, &text);

        let grey = json!({"color": {"rgbColor": {"red": 0.95, "green": 0.95, "blue": 0.95}}});
        self.requests.push(json!({
            "updateTextStyle": {
                "range": {"startIndex": start, "endIndex": start + len},
                "textStyle": {
                    "weightedFontFamily": {"fontFamily": "Courier New"},
                    "fontSize": {"magnitude": 10, "unit": "PT"},
                    "backgroundColor": grey
                },
                "fields": "weightedFontFamily,fontSize,backgroundColor"
            }
        }));

        let border = json!({
            "color": {"color": {"rgbColor": {"red": 0.0, "green": 0.0, "blue": 0.0}}},
            "width": {"magnitude": 1.0, "unit": "PT"},
            "padding": {"magnitude": 10.0, "unit": "PT"},
            "dashStyle": "SOLID"
        });
        self.requests.push(json!({
            "updateParagraphStyle": {
                "range": {"startIndex": start, "endIndex": start + len},
                "paragraphStyle": {
                    "borderTop": border,
                    "borderBottom": border,
                    "borderLeft": border,
                    "borderRight": border,
                    "shading": {"backgroundColor": grey}
                },
                "fields": "borderTop,borderBottom,borderLeft,borderRight,shading"
            }
        }));

        self.cursor += len;
    }

    /// An inline image occupies one index, plus one for the trailing newline
    /// inserted to separate it from the next block.
    fn image(&mut self, images: &ImageRefs) {
        let start = self.cursor;
        let Some(uri) = images.uri(self.next_image) else {
            return;
        };
        self.next_image += 1;

        self.requests.push(json!({
            "insertInlineImage": {
                "location": {"index": start},
                "uri": uri,
                "objectSize": {
                    "height": {"magnitude": 300, "unit": "PT"},
                    "width": {"magnitude": 400, "unit": "PT"}
                }
            }
        }));
        self.insert_text(start + 1, "\n");
        self.cursor += 2;
    }

    /// Tables have a fixed structural footprint, so cell positions are known
    /// at build time: the table body starts one index past the insertion
    /// point, each row costs `1 + 2 * columns` indices, and each cell's text
    /// slot sits two indices into its cell. Cells are filled in reverse
    /// (last cell first) so that no insertion shifts a pending one.
    fn table(&mut self, header: &[Vec<InlineRun>], rows: &[Vec<Vec<InlineRun>>]) {
        let start = self.cursor;
        let cols = header.len();
        if cols == 0 {
            return;
        }
        let total_rows = 1 + rows.len();
        let row_stride = 1 + 2 * cols;
        let footprint = 2 + total_rows * row_stride;

        self.requests.push(json!({
            "insertTable": {
                "location": {"index": start},
                "rows": total_rows,
                "columns": cols
            }
        }));

        let table_start = start + 1;
        let cell_index =
            |r: usize, c: usize| table_start + 3 + r * row_stride + 2 * c;

        // Cell texts row-major, header first.
        let mut cells: Vec<(usize, usize, String)> = Vec::with_capacity(total_rows * cols);
        for (c, cell) in header.iter().enumerate() {
            cells.push((0, c, flat_text(cell)));
        }
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                cells.push((r + 1, c, flat_text(cell)));
            }
        }

        for (r, c, text) in cells.iter().rev() {
            if !text.is_empty() {
                self.insert_text(cell_index(*r, *c), text);
            }
        }

        // Once every cell is filled, a cell's text has shifted right by the
        // length of all cell text inserted before it (row-major order).
        let mut shift = 0;
        for (r, c, text) in &cells {
            let len = chars(text);
            if *r == 0 && len > 0 {
                let pos = cell_index(*r, *c) + shift;
                self.requests.push(json!({
                    "updateTextStyle": {
                        "range": {"startIndex": pos, "endIndex": pos + len},
                        "textStyle": {"bold": true},
                        "fields": "bold"
                    }
                }));
            }
            shift += len;
        }

        self.cursor += footprint + shift;
    }

    fn list(&mut self, items: &[ListItem]) {
        for item in items {
            let start = self.cursor;
            let body = flat_text(&item.text);
            let full = format!("{body}\n");
            let len = chars(&full);

            self.insert_text(start, &full);
            self.run_styles(start, &item.text);

            let preset = if item.ordered {
                "NUMBERED_DECIMAL_ALPHA_ROMAN"
            } else {
                "BULLET_DISC_CIRCLE_SQUARE"
            };
            self.requests.push(json!({
                "createParagraphBullets": {
                    "range": {"startIndex": start, "endIndex": start + len},
                    "bulletPreset": preset
                }
            }));

            if item.depth > 0 {
                self.requests.push(json!({
                    "updateParagraphStyle": {
                        "range": {"startIndex": start, "endIndex": start + len},
                        "paragraphStyle": {
                            "indentStart": {
                                "magnitude": 18.0 * (item.depth + 1) as f64,
                                "unit": "PT"
                            }
                        },
                        "fields": "indentStart"
                    }
                }));
            }

            self.cursor += len;
        }
    }

    fn divider(&mut self) {
        let start = self.cursor;
        self.insert_text(start, "\n");
        self.requests.push(json!({
            "updateParagraphStyle": {
                "range": {"startIndex": start, "endIndex": start + 1},
                "paragraphStyle": {
                    "borderBottom": {
                        "color": {"color": {"rgbColor": {"red": 0.6, "green": 0.6, "blue": 0.6}}},
                        "width": {"magnitude": 1.0, "unit": "PT"},
                        "padding": {"magnitude": 1.0, "unit": "PT"},
                        "dashStyle": "SOLID"
                    }
                },
                "fields": "borderBottom"
            }
        }));
        self.cursor += 1;
    }

    fn insert_text(&mut self, index: usize, text: &str) {
        self.requests.push(json!({
            "insertText": {
                "location": {"index": index},
                "text": text
            }
        }));
    }
}

fn flat_text(runs: &[InlineRun]) -> String {
    runs.iter().map(|run| run.text.as_str()).collect()
}

/// Index contribution of a string: Unicode scalar values, not bytes.
fn chars(text: &str) -> usize {
    text.chars().count()
}
