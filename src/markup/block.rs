//! Block partitioning of documentation text.

use crate::markup::inline::{tokenize, Inline};
use regex::Regex;
use std::sync::LazyLock;

static RE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6}) (.*)$").unwrap());

static RE_RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:(?:-[ \t]*){3,}|(?:\*[ \t]*){3,})$").unwrap());

static RE_LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:([-*+])|(\d+)\.)[ \t]+(.*)$").unwrap());

static RE_TABLE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\|?[ \t]*:?-+:?[ \t]*(?:\|[ \t]*:?-+:?[ \t]*)*\|?$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading {
        level: usize,
        content: Vec<Inline>,
    },
    Paragraph(Vec<Inline>),
    /// Body rows are padded to the header width
    Table {
        header: Vec<Vec<Inline>>,
        rows: Vec<Vec<Vec<Inline>>>,
    },
    Code {
        language: Option<String>,
        text: String,
    },
    Rule,
    List {
        ordered: bool,
        items: Vec<Vec<Inline>>,
    },
}

/// Partition cleaned documentation text into blocks.
pub fn parse(text: &str) -> Vec<Block> {
    let lines: Vec<&str> = text.lines().collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let trimmed = line.trim();

        if trimmed.is_empty() {
            i += 1;
            continue;
        }

        // -- Fenced code -------------------------------------------------
        if let Some(info) = trimmed.strip_prefix("```") {
            let indent = line.len() - line.trim_start().len();
            let language = info.split_whitespace().next().map(str::to_string);
            let mut content = Vec::new();
            i += 1;
            while i < lines.len() && !is_closing_fence(lines[i]) {
                content.push(strip_indent(lines[i], indent));
                i += 1;
            }
            i += 1; // closing fence (or past the end)
            blocks.push(Block::Code {
                language,
                text: content.join("\n"),
            });
            continue;
        }

        // -- Heading -----------------------------------------------------
        if let Some(caps) = RE_HEADING.captures(trimmed) {
            blocks.push(Block::Heading {
                level: caps[1].len(),
                content: tokenize(caps[2].trim()),
            });
            i += 1;
            continue;
        }

        // -- Table -------------------------------------------------------
        if let Some(width) = table_start(&lines, i) {
            let header = split_cells(trimmed);
            i += 2;
            let mut rows = Vec::new();
            while i < lines.len() && lines[i].contains('|') && !lines[i].trim().is_empty() {
                let mut cells = split_cells(lines[i].trim());
                if cells.len() < width {
                    cells.resize(width, String::new());
                }
                rows.push(cells.iter().map(|c| tokenize(c)).collect());
                i += 1;
            }
            blocks.push(Block::Table {
                header: header.iter().map(|c| tokenize(c)).collect(),
                rows,
            });
            continue;
        }

        // -- Horizontal rule -----------------------------------------------
        if RE_RULE.is_match(trimmed) {
            blocks.push(Block::Rule);
            i += 1;
            continue;
        }

        // -- List ----------------------------------------------------------
        if let Some(ordered) = list_marker(trimmed) {
            let mut items = Vec::new();
            while i < lines.len() {
                let t = lines[i].trim();
                if RE_RULE.is_match(t) || list_marker(t) != Some(ordered) {
                    break;
                }
                if let Some(caps) = RE_LIST_ITEM.captures(t) {
                    items.push(tokenize(caps[3].trim()));
                }
                i += 1;
            }
            blocks.push(Block::List { ordered, items });
            continue;
        }

        // -- Paragraph -----------------------------------------------------
        let mut parts = vec![trimmed];
        i += 1;
        while i < lines.len() && !starts_block(&lines, i) {
            parts.push(lines[i].trim());
            i += 1;
        }
        blocks.push(Block::Paragraph(tokenize(&parts.join(" "))));
    }

    blocks
}

fn is_closing_fence(line: &str) -> bool {
    let t = line.trim();
    t.len() >= 3 && t.chars().all(|c| c == '`')
}

/// Remove up to `indent` leading whitespace characters.
fn strip_indent(line: &str, indent: usize) -> String {
    let skip = line
        .char_indices()
        .take(indent)
        .take_while(|(_, c)| c.is_whitespace())
        .count();
    line.chars().skip(skip).collect()
}

/// `Some(ordered)` when the trimmed line is a list item.
fn list_marker(trimmed: &str) -> Option<bool> {
    RE_LIST_ITEM
        .captures(trimmed)
        .map(|caps| caps.get(2).is_some())
}

/// Header cell count when a table starts at line `i`.
fn table_start(lines: &[&str], i: usize) -> Option<usize> {
    let header = lines[i].trim();
    let separator = lines.get(i + 1)?.trim();
    if !header.contains('|') || !separator.contains('|') || !RE_TABLE_SEPARATOR.is_match(separator)
    {
        return None;
    }
    let width = split_cells(header).len();
    (split_cells(separator).len() == width).then_some(width)
}

fn split_cells(row: &str) -> Vec<String> {
    let row = row.strip_prefix('|').unwrap_or(row);
    let row = row.strip_suffix('|').unwrap_or(row);
    row.split('|').map(|c| c.trim().to_string()).collect()
}

/// True when line `i` is blank or opens a non-paragraph block.
fn starts_block(lines: &[&str], i: usize) -> bool {
    let t = lines[i].trim();
    t.is_empty()
        || t.starts_with("```")
        || RE_HEADING.is_match(t)
        || RE_RULE.is_match(t)
        || list_marker(t).is_some()
        || table_start(lines, i).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Vec<Inline> {
        vec![Inline::Text(s.to_string())]
    }

    #[test]
    fn table_short_rows_are_padded() {
        let blocks = parse("| A | B |\n|---|---|\n| 1 |");
        assert_eq!(
            blocks,
            vec![Block::Table {
                header: vec![text("A"), text("B")],
                rows: vec![vec![text("1"), vec![]]],
            }]
        );
    }

    #[test]
    fn separator_with_wrong_width_is_not_a_table() {
        let blocks = parse("| A | B |\n|---|\nmore");
        assert_eq!(blocks.len(), 1);
        assert!(matches!(blocks[0], Block::Paragraph(_)));
    }

    #[test]
    fn fenced_code_is_not_interpreted() {
        let blocks = parse("Example:\n  ```robot\n  *** Test Cases ***\n    # not a heading\n  ```\nafter");
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph(text("Example:")),
                Block::Code {
                    language: Some("robot".into()),
                    text: "*** Test Cases ***\n  # not a heading".into(),
                },
                Block::Paragraph(text("after")),
            ]
        );
    }

    #[test]
    fn unclosed_fence_runs_to_end() {
        let blocks = parse("```\nline one\nline two");
        assert_eq!(
            blocks,
            vec![Block::Code {
                language: None,
                text: "line one\nline two".into()
            }]
        );
    }

    #[test]
    fn headings_rules_and_paragraphs() {
        let blocks = parse("# Title\nfirst\nsecond\n\n- - -\n####### too deep");
        assert_eq!(
            blocks,
            vec![
                Block::Heading { level: 1, content: text("Title") },
                Block::Paragraph(text("first second")),
                Block::Rule,
                Block::Paragraph(text("####### too deep")),
            ]
        );
    }

    #[test]
    fn list_kind_switch_starts_new_list() {
        let blocks = parse("- a\n* b\n1. one\n2. two\ntext");
        assert_eq!(
            blocks,
            vec![
                Block::List { ordered: false, items: vec![text("a"), text("b")] },
                Block::List { ordered: true, items: vec![text("one"), text("two")] },
                Block::Paragraph(text("text")),
            ]
        );
    }
}
