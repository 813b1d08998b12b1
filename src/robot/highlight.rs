//! Line tokenizer for Robot Framework examples.
//!
//! Each line is tokenized on its own. Candidate spans are collected in
//! priority order and a candidate overlapping an accepted span is dropped,
//! so the result is always a set of disjoint spans ordered by start.

use crate::markup::html_escape;
use crate::robot::keywords::KeywordIndex;
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static RE_ARGUMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(?: [A-Za-z0-9_]+)*=").unwrap());

static RE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(?:\.\d+)?$").unwrap());

const CONTROL_WORDS: &[&str] = &[
    "FOR", "END", "IF", "ELSE IF", "ELSE", "WHILE", "TRY", "EXCEPT", "FINALLY", "RETURN",
    "BREAK", "CONTINUE", "VAR", "GROUP",
];

const LOOP_WORDS: &[&str] = &["IN", "IN RANGE", "IN ENUMERATE", "IN ZIP"];

const SETTINGS: &[&str] = &[
    "Library",
    "Resource",
    "Variables",
    "Documentation",
    "Metadata",
    "Suite Setup",
    "Suite Teardown",
    "Test Setup",
    "Test Teardown",
    "Test Template",
    "Test Timeout",
    "Test Tags",
    "Force Tags",
    "Default Tags",
    "Keyword Tags",
    "Task Setup",
    "Task Teardown",
    "Task Template",
    "Task Timeout",
    "Task Tags",
    "Name",
];

const BRACKET_SETTINGS: &[&str] = &[
    "[Documentation]",
    "[Tags]",
    "[Setup]",
    "[Teardown]",
    "[Template]",
    "[Timeout]",
    "[Arguments]",
    "[Return]",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    SectionHeader,
    KeywordName,
    VariableReference,
    Comment,
    StringLiteral,
    NumberLiteral,
    SettingName,
    ControlWord,
    ArgumentAssignment,
    TestCaseName,
}

impl Category {
    pub fn class_name(self) -> &'static str {
        match self {
            Category::SectionHeader => "robot-section",
            Category::KeywordName => "robot-keyword",
            Category::VariableReference => "robot-variable",
            Category::Comment => "robot-comment",
            Category::StringLiteral => "robot-string",
            Category::NumberLiteral => "robot-number",
            Category::SettingName => "robot-setting",
            Category::ControlWord => "robot-control",
            Category::ArgumentAssignment => "robot-argument",
            Category::TestCaseName => "robot-test-case",
        }
    }
}

/// Byte range of one highlighted token within a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
    pub category: Category,
}

pub struct RobotHighlighter {
    keywords: KeywordIndex,
}

impl RobotHighlighter {
    pub fn new(keywords: KeywordIndex) -> Self {
        RobotHighlighter { keywords }
    }

    /// Highlight a whole code block, line by line.
    pub fn highlight(&self, code: &str) -> String {
        code.split('\n')
            .map(|line| self.highlight_line(line))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn highlight_line(&self, line: &str) -> String {
        let mut out = String::with_capacity(line.len() * 2);
        let mut pos = 0;
        for span in self.spans(line) {
            out.push_str(&html_escape(&line[pos..span.start]));
            out.push_str(&format!(
                "<span class=\"{}\">{}</span>",
                span.category.class_name(),
                html_escape(&line[span.start..span.end])
            ));
            pos = span.end;
        }
        out.push_str(&html_escape(&line[pos..]));
        out
    }

    /// Disjoint spans of `line`, ordered by start.
    pub fn spans(&self, line: &str) -> Vec<HighlightSpan> {
        let mut acc = Accepted::default();
        let variables = variable_ranges(line);
        let strings = string_ranges(line);

        // 1. Comment
        let code_end = comment_start(line, &variables, &strings).unwrap_or(line.len());
        if code_end < line.len() {
            acc.add(code_end..line.len(), Category::Comment);
        }
        let code = &line[..code_end];

        // 2. Section header
        let trimmed = code.trim();
        if trimmed.starts_with("***") {
            let start = code.len() - code.trim_start().len();
            acc.add(start..start + trimmed.len(), Category::SectionHeader);
            return acc.finish();
        }

        // 3. Variables
        for range in variables.iter().filter(|r| r.end <= code_end) {
            acc.add(range.clone(), Category::VariableReference);
        }

        let cells = cells(code);
        let indented = code.starts_with([' ', '\t']);
        let first = cells.first().cloned();
        let text = |r: &Range<usize>| &code[r.clone()];

        // 4. Control words
        if let Some(first) = first.clone().filter(|_| indented) {
            if CONTROL_WORDS.contains(&text(&first)) {
                acc.add(first.clone(), Category::ControlWord);
                if text(&first) == "FOR" {
                    for cell in cells.iter().skip(1) {
                        if LOOP_WORDS.contains(&text(cell)) {
                            acc.add(cell.clone(), Category::ControlWord);
                        }
                    }
                }
            }
        }

        // 5. Settings
        if let Some(first) = first.clone() {
            let name = text(&first);
            let is_setting = if indented {
                BRACKET_SETTINGS.iter().any(|s| s.eq_ignore_ascii_case(name))
            } else {
                SETTINGS.iter().any(|s| s.eq_ignore_ascii_case(name))
            };
            if is_setting {
                acc.add(first, Category::SettingName);
            }
        }

        // 6. Test case / keyword definition name
        if let Some(first) = first.filter(|_| !indented) {
            acc.add(first, Category::TestCaseName);
        }

        // 7. Keyword names
        for cell in &cells {
            if let Some(len) = self.keywords.longest_match(&code[cell.start..]) {
                acc.add(cell.start..cell.start + len, Category::KeywordName);
            }
        }

        // 8. Argument assignment
        for cell in &cells {
            if let Some(m) = RE_ARGUMENT.find(text(cell)) {
                acc.add(cell.start..cell.start + m.end(), Category::ArgumentAssignment);
            }
        }

        // 9. Strings and numbers
        for range in strings.iter().filter(|r| r.end <= code_end) {
            acc.add(range.clone(), Category::StringLiteral);
        }
        for cell in &cells {
            if RE_NUMBER.is_match(text(cell)) {
                acc.add(cell.clone(), Category::NumberLiteral);
            }
        }

        acc.finish()
    }
}

#[derive(Default)]
struct Accepted {
    spans: Vec<HighlightSpan>,
}

impl Accepted {
    fn add(&mut self, range: Range<usize>, category: Category) {
        if range.is_empty() {
            return;
        }
        let overlaps = self
            .spans
            .iter()
            .any(|s| range.start < s.end && s.start < range.end);
        if !overlaps {
            self.spans.push(HighlightSpan {
                start: range.start,
                end: range.end,
                category,
            });
        }
    }

    fn finish(mut self) -> Vec<HighlightSpan> {
        self.spans.sort_by_key(|s| s.start);
        self.spans
    }
}

// -- Lexical helpers ----------------------------------------------------------

/// Cell ranges; separators are two or more spaces, a tab, or ` | `.
fn cells(line: &str) -> Vec<Range<usize>> {
    let bytes = line.as_bytes();
    let mut cells = Vec::new();
    let mut start: Option<usize> = None;
    let mut i = 0;
    while i < bytes.len() {
        let sep = separator_len(bytes, i);
        if sep > 0 {
            if let Some(s) = start.take() {
                cells.push(s..i);
            }
            i += sep;
            continue;
        }
        if start.is_none() && bytes[i] != b' ' {
            start = Some(i);
        }
        i += 1;
    }
    if let Some(s) = start {
        cells.push(s..s + line[s..].trim_end().len());
    }
    cells
}

/// Length of the cell separator at `i`, 0 when there is none.
fn separator_len(bytes: &[u8], i: usize) -> usize {
    let is_ws = |b: u8| b == b' ' || b == b'\t';
    let ws = bytes[i..].iter().take_while(|&&b| is_ws(b)).count();
    let has_tab = bytes[i..i + ws].contains(&b'\t');
    let pipe_at = |p: usize| {
        bytes.get(p) == Some(&b'|') && bytes.get(p + 1).is_none_or(|&b| is_ws(b))
    };

    let mut len = if ws >= 2 || has_tab {
        ws
    } else if ws == 1 && pipe_at(i + 1) {
        1
    } else if ws == 0 && i == 0 && pipe_at(0) {
        0
    } else {
        return 0;
    };
    if pipe_at(i + len) {
        len += 1;
        len += bytes[i + len..].iter().take_while(|&&b| is_ws(b)).count();
    }
    len
}

/// Variable references: `${`, `@{`, `&{`, `%{` up to the first unescaped `}`.
fn variable_ranges(line: &str) -> Vec<Range<usize>> {
    let bytes = line.as_bytes();
    let mut ranges = Vec::new();
    let mut i = 0;
    while i + 1 < bytes.len() {
        let opens = matches!(bytes[i], b'$' | b'@' | b'&' | b'%')
            && bytes[i + 1] == b'{'
            && !escaped(bytes, i);
        if !opens {
            i += 1;
            continue;
        }
        let close = (i + 2..bytes.len()).find(|&j| bytes[j] == b'}' && !escaped(bytes, j));
        match close {
            Some(j) => {
                ranges.push(i..j + 1);
                i = j + 1;
            }
            None => break,
        }
    }
    ranges
}

/// `"..."` anywhere, `'...'` when not preceded by a word character.
fn string_ranges(line: &str) -> Vec<Range<usize>> {
    let bytes = line.as_bytes();
    let mut ranges = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let q = bytes[i];
        let opens = match q {
            b'"' => !escaped(bytes, i),
            b'\'' => i == 0 || !(bytes[i - 1].is_ascii_alphanumeric() || bytes[i - 1] == b'_'),
            _ => false,
        };
        if opens {
            if let Some(j) = (i + 1..bytes.len()).find(|&j| bytes[j] == q && !escaped(bytes, j)) {
                ranges.push(i..j + 1);
                i = j + 1;
                continue;
            }
        }
        i += 1;
    }
    ranges
}

/// Offset of the comment marker, if the line has one.
fn comment_start(line: &str, variables: &[Range<usize>], strings: &[Range<usize>]) -> Option<usize> {
    let bytes = line.as_bytes();
    (0..bytes.len()).find(|&i| {
        bytes[i] == b'#'
            && (i == 0 || bytes[i - 1] == b' ' || bytes[i - 1] == b'\t')
            && !escaped(bytes, i)
            && !variables.iter().chain(strings).any(|r| r.contains(&i))
    })
}

/// True when the byte at `i` is preceded by an odd number of backslashes.
fn escaped(bytes: &[u8], i: usize) -> bool {
    bytes[..i].iter().rev().take_while(|&&b| b == b'\\').count() % 2 == 1
}
