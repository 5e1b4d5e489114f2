//! Line-based block parser.
//!
//! A single top-to-bottom pass over the source lines classifies each line
//! and delegates to a block-specific consumer that returns the index of the
//! first line it did not consume. Parsing never fails: malformed input
//! degrades per the policies documented on each consumer.

use crate::block::{Block, InlineRun, ListItem};
use crate::inline::format_inline;

/// Parse markdown source into an ordered block sequence.
#[must_use]
pub fn parse(source: &str) -> Vec<Block> {
    let lines: Vec<&str> = source.lines().collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        if line.trim().is_empty() {
            i += 1;
        } else if let Some((fence_len, info)) = fence_marker(line) {
            i = consume_fence(&lines, i, fence_len, info, &mut blocks);
        } else if let Some((level, text)) = heading(line) {
            blocks.push(Block::Heading {
                level,
                text: format_inline(text.trim()),
            });
            i += 1;
        } else if is_divider(line) {
            blocks.push(Block::Divider);
            i += 1;
        } else if is_table_start(&lines, i) {
            i = consume_table(&lines, i, &mut blocks);
        } else if list_marker(line).is_some() {
            i = consume_list(&lines, i, &mut blocks);
        } else {
            i = consume_paragraph(&lines, i, &mut blocks);
        }
    }

    blocks
}

/// Fence opener: 3+ backticks, optionally indented. Returns the backtick
/// count and the trimmed info string.
fn fence_marker(line: &str) -> Option<(usize, &str)> {
    let trimmed = line.trim_start();
    let ticks = trimmed.chars().take_while(|&c| c == '`').count();
    if ticks >= 3 {
        Some((ticks, trimmed[ticks..].trim()))
    } else {
        None
    }
}

/// Closing fence: backticks only, at least as many as the opener.
fn is_fence_close(line: &str, open_len: usize) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= open_len && trimmed.chars().all(|c| c == '`')
}

/// Consume a fenced block starting at `start`.
///
/// An info string of `mermaid` (case-insensitive) yields a diagram block,
/// anything else a code block. The body is kept verbatim. An unterminated
/// fence consumes the remainder of the input rather than losing content.
fn consume_fence(
    lines: &[&str],
    start: usize,
    fence_len: usize,
    info: &str,
    blocks: &mut Vec<Block>,
) -> usize {
    let mut body = Vec::new();
    let mut i = start + 1;
    while i < lines.len() && !is_fence_close(lines[i], fence_len) {
        body.push(lines[i].to_owned());
        i += 1;
    }
    // Skip the closing fence when present.
    let next = if i < lines.len() { i + 1 } else { i };

    if info.eq_ignore_ascii_case("mermaid") {
        blocks.push(Block::Diagram {
            source: body.join("\n"),
            image: None,
        });
    } else {
        blocks.push(Block::CodeBlock {
            language: (!info.is_empty()).then(|| info.to_owned()),
            lines: body,
        });
    }
    next
}

/// `#`×1..6 followed by a space.
fn heading(line: &str) -> Option<(u8, &str)> {
    let hashes = line.chars().take_while(|&c| c == '#').count();
    if (1..=6).contains(&hashes)
        && let Some(rest) = line[hashes..].strip_prefix(' ')
    {
        #[allow(clippy::cast_possible_truncation)]
        return Some((hashes as u8, rest));
    }
    None
}

/// A divider is 3+ of the same `-`/`*`/`_` char alone on a line.
fn is_divider(line: &str) -> bool {
    let trimmed = line.trim();
    let mut chars = trimmed.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    matches!(first, '-' | '*' | '_') && trimmed.len() >= 3 && chars.all(|c| c == first)
}

/// A table starts with a `|` header line immediately followed by a
/// dash/colon separator line.
fn is_table_start(lines: &[&str], i: usize) -> bool {
    lines[i].contains('|')
        && lines
            .get(i + 1)
            .is_some_and(|next| is_table_separator(next))
}

fn is_table_separator(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty()
        && trimmed.contains('-')
        && trimmed
            .chars()
            .all(|c| matches!(c, '|' | '-' | ':' | ' '))
}

/// Split a `|`-delimited row into trimmed cell strings. Interior empty cells
/// are preserved; only the delimiters at both ends are stripped.
fn split_row(line: &str) -> Vec<&str> {
    let trimmed = line.trim();
    let trimmed = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('|').unwrap_or(trimmed);
    trimmed.split('|').map(str::trim).collect()
}

/// Consume a table. Body rows run until a blank or non-`|` line. Rows are
/// padded with empty cells or truncated so every row has exactly the
/// header's column count; this never errors.
fn consume_table(lines: &[&str], start: usize, blocks: &mut Vec<Block>) -> usize {
    let header: Vec<Vec<InlineRun>> = split_row(lines[start])
        .into_iter()
        .map(format_inline)
        .collect();
    let columns = header.len();

    let mut rows = Vec::new();
    let mut i = start + 2;
    while i < lines.len() && !lines[i].trim().is_empty() && lines[i].contains('|') {
        let mut row: Vec<Vec<InlineRun>> = split_row(lines[i])
            .into_iter()
            .take(columns)
            .map(format_inline)
            .collect();
        row.resize(columns, Vec::new());
        rows.push(row);
        i += 1;
    }

    blocks.push(Block::Table { header, rows });
    i
}

/// List marker test: returns (indent columns, ordered, item text).
/// Tabs count as 4 columns for indentation.
fn list_marker(line: &str) -> Option<(usize, bool, &str)> {
    let rest = line.trim_start();
    let indent: usize = line[..line.len() - rest.len()]
        .chars()
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum();

    for bullet in ['-', '*', '+'] {
        if let Some(text) = rest.strip_prefix(bullet).and_then(|r| r.strip_prefix(' ')) {
            return Some((indent, false, text));
        }
    }

    let digits = rest.chars().take_while(char::is_ascii_digit).count();
    if digits > 0
        && let Some(text) = rest[digits..].strip_prefix('.').and_then(|r| r.strip_prefix(' '))
    {
        return Some((indent, true, text));
    }
    None
}

/// Raw list item accumulated before inline formatting.
struct RawItem {
    depth: usize,
    ordered: bool,
    text: String,
}

/// Consume a list starting at `start`.
///
/// Depth comes from an indent stack: the first item seen at each depth pins
/// that level's indent column, so sources indenting by 2 or by 4 both map
/// one indent step to one depth level. An item can only go one level deeper
/// than its predecessor; dedents snap to the nearest established level.
/// Indented lines without a marker continue the previous item's text. A
/// blank line followed by a non-list line ends the list.
fn consume_list(lines: &[&str], start: usize, blocks: &mut Vec<Block>) -> usize {
    let mut items: Vec<RawItem> = Vec::new();
    let mut indent_stack: Vec<usize> = Vec::new();
    let mut i = start;

    while i < lines.len() {
        let line = lines[i];

        if line.trim().is_empty() {
            // The list survives a blank line only if another item follows.
            match lines.get(i + 1) {
                Some(next) if list_marker(next).is_some() => {
                    i += 1;
                    continue;
                }
                _ => break,
            }
        }

        if let Some((indent, ordered, text)) = list_marker(line) {
            let depth = resolve_depth(&mut indent_stack, indent);
            items.push(RawItem {
                depth,
                ordered,
                text: text.to_owned(),
            });
            i += 1;
        } else if line.starts_with(char::is_whitespace)
            && let Some(last) = items.last_mut()
        {
            // Indented continuation line, joined with a single space.
            last.text.push(' ');
            last.text.push_str(line.trim());
            i += 1;
        } else {
            break;
        }
    }

    blocks.push(Block::List {
        items: items
            .into_iter()
            .map(|item| ListItem {
                depth: item.depth,
                ordered: item.ordered,
                text: format_inline(&item.text),
            })
            .collect(),
    });
    i
}

/// Map an indent width to a depth using the established per-depth indents.
fn resolve_depth(indent_stack: &mut Vec<usize>, indent: usize) -> usize {
    if indent_stack.is_empty() {
        indent_stack.push(indent);
        return 0;
    }
    let top = *indent_stack.last().expect("stack is non-empty");
    if indent > top {
        // One level deeper at most, regardless of how wide the indent is.
        indent_stack.push(indent);
    } else {
        while indent_stack.len() > 1
            && indent < *indent_stack.last().expect("stack is non-empty")
        {
            indent_stack.pop();
        }
    }
    indent_stack.len() - 1
}

/// Paragraph continuation: any non-blank line that does not start another
/// block type, joined with a single space.
fn consume_paragraph(lines: &[&str], start: usize, blocks: &mut Vec<Block>) -> usize {
    let mut text = lines[start].trim().to_owned();
    let mut i = start + 1;

    while i < lines.len() {
        let line = lines[i];
        if line.trim().is_empty()
            || fence_marker(line).is_some()
            || heading(line).is_some()
            || is_divider(line)
            || is_table_start(lines, i)
            || list_marker(line).is_some()
        {
            break;
        }
        text.push(' ');
        text.push_str(line.trim());
        i += 1;
    }

    blocks.push(Block::Paragraph {
        text: format_inline(&text),
    });
    i
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn plain(text: &str) -> Vec<InlineRun> {
        vec![InlineRun::plain(text)]
    }

    fn run_text(runs: &[InlineRun]) -> String {
        runs.iter().map(|r| r.text.as_str()).collect()
    }

    #[test]
    fn test_heading_levels() {
        for level in 1..=6u8 {
            let source = format!("{} Title text", "#".repeat(usize::from(level)));
            let blocks = parse(&source);
            assert_eq!(
                blocks,
                vec![Block::Heading {
                    level,
                    text: plain("Title text"),
                }],
                "level {level}"
            );
        }
    }

    #[test]
    fn test_seven_hashes_is_paragraph() {
        let blocks = parse("####### nope");
        assert!(matches!(blocks[0], Block::Paragraph { .. }));
    }

    #[test]
    fn test_hash_without_space_is_paragraph() {
        let blocks = parse("#nope");
        assert!(matches!(blocks[0], Block::Paragraph { .. }));
    }

    #[test]
    fn test_end_to_end_title_and_bold() {
        let blocks = parse("# Title\n\nHello **world**\n");
        assert_eq!(
            blocks,
            vec![
                Block::Heading {
                    level: 1,
                    text: plain("Title"),
                },
                Block::Paragraph {
                    text: vec![
                        InlineRun::plain("Hello "),
                        InlineRun {
                            bold: true,
                            ..InlineRun::plain("world")
                        },
                    ],
                },
            ]
        );
    }

    #[test]
    fn test_paragraph_lines_joined_with_space() {
        let blocks = parse("first line\nsecond line\n\nnext");
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph {
                    text: plain("first line second line"),
                },
                Block::Paragraph {
                    text: plain("next"),
                },
            ]
        );
    }

    #[test]
    fn test_code_block() {
        let blocks = parse("```rust\nfn main() {}\n```\n");
        assert_eq!(
            blocks,
            vec![Block::CodeBlock {
                language: Some("rust".to_owned()),
                lines: vec!["fn main() {}".to_owned()],
            }]
        );
    }

    #[test]
    fn test_code_block_without_language() {
        let blocks = parse("```\nplain\n```");
        assert_eq!(
            blocks,
            vec![Block::CodeBlock {
                language: None,
                lines: vec!["plain".to_owned()],
            }]
        );
    }

    #[test]
    fn test_unterminated_fence_consumes_rest() {
        let blocks = parse("```rust\nline one\nline two");
        assert_eq!(
            blocks,
            vec![Block::CodeBlock {
                language: Some("rust".to_owned()),
                lines: vec!["line one".to_owned(), "line two".to_owned()],
            }]
        );
    }

    #[test]
    fn test_fence_close_requires_opening_length() {
        let blocks = parse("````\n```\ninner\n````\nafter");
        assert_eq!(
            blocks,
            vec![
                Block::CodeBlock {
                    language: None,
                    lines: vec!["```".to_owned(), "inner".to_owned()],
                },
                Block::Paragraph {
                    text: plain("after"),
                },
            ]
        );
    }

    #[test]
    fn test_mermaid_fence_is_diagram() {
        let blocks = parse("```mermaid\ngraph TD\n  A --> B\n```");
        assert_eq!(
            blocks,
            vec![Block::Diagram {
                source: "graph TD\n  A --> B".to_owned(),
                image: None,
            }]
        );
    }

    #[test]
    fn test_mermaid_case_insensitive() {
        let blocks = parse("```Mermaid\ngraph TD\n```");
        assert!(matches!(blocks[0], Block::Diagram { .. }));
    }

    #[test]
    fn test_no_inline_formatting_inside_fence() {
        let blocks = parse("```\n**verbatim**\n```");
        assert_eq!(
            blocks,
            vec![Block::CodeBlock {
                language: None,
                lines: vec!["**verbatim**".to_owned()],
            }]
        );
    }

    #[test]
    fn test_table_two_by_two() {
        let blocks = parse("| A | B |\n| --- | --- |\n| 1 | 2 |\n| 3 | 4 |\n");
        let Block::Table { header, rows } = &blocks[0] else {
            panic!("expected table, got {blocks:?}");
        };
        assert_eq!(header.len(), 2);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row.len() == 2));
        assert_eq!(run_text(&header[0]), "A");
        assert_eq!(run_text(&rows[1][1]), "4");
    }

    #[test]
    fn test_table_short_row_padded() {
        let blocks = parse("| A | B | C |\n|---|---|---|\n| only |\n");
        let Block::Table { header, rows } = &blocks[0] else {
            panic!("expected table");
        };
        assert_eq!(header.len(), 3);
        assert_eq!(rows[0].len(), 3);
        assert_eq!(run_text(&rows[0][0]), "only");
        assert!(rows[0][1].is_empty());
        assert!(rows[0][2].is_empty());
    }

    #[test]
    fn test_table_long_row_truncated() {
        let blocks = parse("| A | B |\n|---|---|\n| 1 | 2 | 3 | 4 |\n");
        let Block::Table { rows, .. } = &blocks[0] else {
            panic!("expected table");
        };
        assert_eq!(rows[0].len(), 2);
        assert_eq!(run_text(&rows[0][1]), "2");
    }

    #[test]
    fn test_table_ends_at_blank_line() {
        let blocks = parse("| A |\n|---|\n| 1 |\n\nafter");
        assert_eq!(blocks.len(), 2);
        assert!(matches!(blocks[1], Block::Paragraph { .. }));
    }

    #[test]
    fn test_table_alignment_separator() {
        let blocks = parse("| A | B |\n|:---|---:|\n| 1 | 2 |\n");
        assert!(matches!(blocks[0], Block::Table { .. }));
    }

    #[test]
    fn test_pipe_line_without_separator_is_paragraph() {
        let blocks = parse("a | b\nplain");
        assert!(matches!(blocks[0], Block::Paragraph { .. }));
    }

    #[test]
    fn test_flat_bullet_list() {
        let blocks = parse("- one\n- two\n- three\n");
        let Block::List { items } = &blocks[0] else {
            panic!("expected list");
        };
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|i| i.depth == 0 && !i.ordered));
        assert_eq!(run_text(&items[2].text), "three");
    }

    #[test]
    fn test_ordered_list() {
        let blocks = parse("1. first\n2. second\n");
        let Block::List { items } = &blocks[0] else {
            panic!("expected list");
        };
        assert!(items.iter().all(|i| i.ordered));
    }

    #[test]
    fn test_nested_list_two_space_indent() {
        let blocks = parse("- a\n  - b\n    - c\n  - d\n- e\n");
        let Block::List { items } = &blocks[0] else {
            panic!("expected list");
        };
        let depths: Vec<usize> = items.iter().map(|i| i.depth).collect();
        assert_eq!(depths, vec![0, 1, 2, 1, 0]);
    }

    #[test]
    fn test_nested_list_four_space_indent() {
        let blocks = parse("- a\n    - b\n        - c\n- d\n");
        let Block::List { items } = &blocks[0] else {
            panic!("expected list");
        };
        let depths: Vec<usize> = items.iter().map(|i| i.depth).collect();
        assert_eq!(depths, vec![0, 1, 2, 0]);
    }

    #[test]
    fn test_tab_indent_counts_as_four_columns() {
        let blocks = parse("- a\n\t- b\n- c\n");
        let Block::List { items } = &blocks[0] else {
            panic!("expected list");
        };
        let depths: Vec<usize> = items.iter().map(|i| i.depth).collect();
        assert_eq!(depths, vec![0, 1, 0]);
    }

    #[test]
    fn test_depth_never_skips_a_level() {
        // An eight-column jump from depth 0 is still only depth 1.
        let blocks = parse("- a\n        - b\n");
        let Block::List { items } = &blocks[0] else {
            panic!("expected list");
        };
        assert_eq!(items[1].depth, 1);
    }

    #[test]
    fn test_list_ends_at_blank_then_paragraph() {
        let blocks = parse("- one\n- two\n\nparagraph\n");
        assert_eq!(blocks.len(), 2);
        assert!(matches!(blocks[0], Block::List { .. }));
        assert!(matches!(blocks[1], Block::Paragraph { .. }));
    }

    #[test]
    fn test_list_survives_blank_line_before_item() {
        let blocks = parse("- one\n\n- two\n");
        let Block::List { items } = &blocks[0] else {
            panic!("expected list");
        };
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_list_continuation_line() {
        let blocks = parse("- first item\n  continued here\n- second\n");
        let Block::List { items } = &blocks[0] else {
            panic!("expected list");
        };
        assert_eq!(items.len(), 2);
        assert_eq!(run_text(&items[0].text), "first item continued here");
    }

    #[test]
    fn test_divider_forms() {
        for source in ["---", "----", "***", "___", "   ---   "] {
            let blocks = parse(source);
            assert_eq!(blocks, vec![Block::Divider], "source: {source:?}");
        }
    }

    #[test]
    fn test_two_dashes_is_not_divider() {
        let blocks = parse("--");
        assert!(matches!(blocks[0], Block::Paragraph { .. }));
    }

    #[test]
    fn test_source_order_preserved() {
        let source = "# H\n\npara\n\n- item\n\n---\n\n```\ncode\n```\n";
        let blocks = parse(source);
        assert_eq!(blocks.len(), 5);
        assert!(matches!(blocks[0], Block::Heading { .. }));
        assert!(matches!(blocks[1], Block::Paragraph { .. }));
        assert!(matches!(blocks[2], Block::List { .. }));
        assert!(matches!(blocks[3], Block::Divider));
        assert!(matches!(blocks[4], Block::CodeBlock { .. }));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse(""), vec![]);
        assert_eq!(parse("\n\n\n"), vec![]);
    }
}
