//! Python source scanner: splits source into logical lines.
//!
//! A logical line is one statement: physical lines joined across open
//! brackets, backslash continuations and triple-quoted strings, with `#`
//! comments removed. Indentation is kept so the extractor can recover the
//! block structure without a full parser.

use crate::error::ExtractionError;
use std::ops::Range;

const TAB_WIDTH: usize = 8;

/// One Python statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    /// Indentation width of the first physical line (tabs expanded)
    pub indent: usize,
    /// 1-based line number where the statement starts
    pub line: usize,
    pub text: String,
}

/// Split Python source into logical lines.
pub fn logical_lines(source: &str) -> Result<Vec<LogicalLine>, ExtractionError> {
    let mut scanner = Scanner::new(source);
    scanner.run()?;
    Ok(scanner.lines)
}

/// Index range of the block body belonging to the header at `idx`.
///
/// The body is every following line indented deeper than the header. A
/// one-line compound statement (`def f(): pass`) has an empty body.
pub fn body_range(lines: &[LogicalLine], idx: usize) -> Range<usize> {
    let indent = lines[idx].indent;
    let end = lines[idx + 1..]
        .iter()
        .position(|l| l.indent <= indent)
        .map(|p| idx + 1 + p)
        .unwrap_or(lines.len());
    idx + 1..end
}

/// Indices of the direct statements inside `range` (the shallowest level).
pub fn direct_children(lines: &[LogicalLine], range: Range<usize>) -> Vec<usize> {
    let Some(level) = lines[range.clone()].iter().map(|l| l.indent).min() else {
        return Vec::new();
    };
    range.filter(|&i| lines[i].indent == level).collect()
}

struct Scanner {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    lines: Vec<LogicalLine>,
    /// Line numbers of currently open brackets
    open_brackets: Vec<(char, usize)>,
}

impl Scanner {
    fn new(source: &str) -> Self {
        Scanner {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            lines: Vec::new(),
            open_brackets: Vec::new(),
        }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn run(&mut self) -> Result<(), ExtractionError> {
        while self.pos < self.chars.len() {
            let indent = self.measure_indent();
            match self.peek(0) {
                None => break,
                Some('\n') => {
                    self.pos += 1;
                    self.line += 1;
                    continue;
                }
                Some('\r') => {
                    self.pos += 1;
                    continue;
                }
                Some('#') => {
                    self.skip_comment();
                    continue;
                }
                _ => {}
            }
            let start_line = self.line;
            let text = self.read_statement()?;
            let text = text.trim_end().to_string();
            if !text.is_empty() {
                self.lines.push(LogicalLine {
                    indent,
                    line: start_line,
                    text,
                });
            }
        }
        Ok(())
    }

    fn measure_indent(&mut self) -> usize {
        let mut width = 0;
        while let Some(c) = self.peek(0) {
            match c {
                ' ' => width += 1,
                '\t' => width = (width / TAB_WIDTH + 1) * TAB_WIDTH,
                '\x0c' => width = 0,
                _ => break,
            }
            self.pos += 1;
        }
        width
    }

    fn skip_comment(&mut self) {
        while let Some(c) = self.peek(0) {
            if c == '\n' {
                break;
            }
            self.pos += 1;
        }
    }

    /// Read one logical line, leaving the cursor after its newline.
    fn read_statement(&mut self) -> Result<String, ExtractionError> {
        let mut text = String::new();
        loop {
            let Some(c) = self.peek(0) else {
                if let Some(&(bracket, line)) = self.open_brackets.last() {
                    return Err(ExtractionError::Syntax {
                        line,
                        message: format!("'{}' was never closed", bracket),
                    });
                }
                return Ok(text);
            };
            match c {
                '#' => self.skip_comment(),
                '"' | '\'' => {
                    let literal = self.read_string(c)?;
                    text.push_str(&literal);
                }
                '(' | '[' | '{' => {
                    self.open_brackets.push((c, self.line));
                    text.push(c);
                    self.pos += 1;
                }
                ')' | ']' | '}' => {
                    if self.open_brackets.pop().is_none() {
                        return Err(ExtractionError::Syntax {
                            line: self.line,
                            message: format!("unmatched '{}'", c),
                        });
                    }
                    text.push(c);
                    self.pos += 1;
                }
                '\\' if matches!(self.peek(1), Some('\n') | Some('\r')) => {
                    self.pos += 1;
                    if self.peek(0) == Some('\r') {
                        self.pos += 1;
                    }
                    if self.peek(0) == Some('\n') {
                        self.pos += 1;
                    }
                    self.line += 1;
                    text.push(' ');
                }
                '\r' => self.pos += 1,
                '\n' => {
                    self.pos += 1;
                    self.line += 1;
                    if self.open_brackets.is_empty() {
                        return Ok(text);
                    }
                    text.push(' ');
                }
                _ => {
                    text.push(c);
                    self.pos += 1;
                }
            }
        }
    }

    /// Read a string literal starting at the quote under the cursor and
    /// return its source text verbatim.
    fn read_string(&mut self, quote: char) -> Result<String, ExtractionError> {
        let start_line = self.line;
        let triple = self.peek(1) == Some(quote) && self.peek(2) == Some(quote);
        let mut literal = String::new();
        let opener = if triple { 3 } else { 1 };
        for _ in 0..opener {
            literal.push(quote);
            self.pos += 1;
        }
        loop {
            let Some(c) = self.peek(0) else {
                return Err(ExtractionError::Syntax {
                    line: start_line,
                    message: "unterminated string literal".to_string(),
                });
            };
            match c {
                '\\' => {
                    literal.push(c);
                    self.pos += 1;
                    if let Some(next) = self.peek(0) {
                        if next == '\n' {
                            self.line += 1;
                        }
                        literal.push(next);
                        self.pos += 1;
                    }
                }
                '\n' if !triple => {
                    return Err(ExtractionError::Syntax {
                        line: start_line,
                        message: "unterminated string literal".to_string(),
                    });
                }
                '\n' => {
                    literal.push(c);
                    self.line += 1;
                    self.pos += 1;
                }
                c if c == quote => {
                    if !triple {
                        literal.push(c);
                        self.pos += 1;
                        return Ok(literal);
                    }
                    if self.peek(1) == Some(quote) && self.peek(2) == Some(quote) {
                        for _ in 0..3 {
                            literal.push(quote);
                        }
                        self.pos += 3;
                        return Ok(literal);
                    }
                    literal.push(c);
                    self.pos += 1;
                }
                _ => {
                    literal.push(c);
                    self.pos += 1;
                }
            }
        }
    }
}

// -- String literal evaluation ------------------------------------------------

/// Evaluate text consisting only of string literals (adjacent literals are
/// concatenated). Returns None when the text is anything else.
pub fn string_literal_value(text: &str) -> Option<String> {
    let chars: Vec<char> = text.trim().chars().collect();
    if chars.is_empty() {
        return None;
    }
    let mut value = String::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i].is_whitespace() {
            i += 1;
            continue;
        }
        let (part, next) = read_literal(&chars, i)?;
        value.push_str(&part);
        i = next;
    }
    Some(value)
}

/// True if `text` is a single string literal (prefixes allowed).
pub fn is_string_literal(text: &str) -> bool {
    let chars: Vec<char> = text.trim().chars().collect();
    matches!(read_literal(&chars, 0), Some((_, end)) if end == chars.len())
}

/// Read one literal at `start`; returns its value and the index after it.
fn read_literal(chars: &[char], start: usize) -> Option<(String, usize)> {
    let mut i = start;
    let mut raw = false;
    while i < chars.len() && i - start < 2 && chars[i].is_ascii_alphabetic() {
        match chars[i].to_ascii_lowercase() {
            'r' => raw = true,
            'b' | 'u' | 'f' => {}
            _ => return None,
        }
        i += 1;
    }
    let quote = *chars.get(i)?;
    if quote != '"' && quote != '\'' {
        return None;
    }
    let triple = chars.get(i + 1) == Some(&quote) && chars.get(i + 2) == Some(&quote);
    i += if triple { 3 } else { 1 };

    let mut value = String::new();
    while i < chars.len() {
        let c = chars[i];
        if c == quote {
            if !triple {
                return Some((value, i + 1));
            }
            if chars.get(i + 1) == Some(&quote) && chars.get(i + 2) == Some(&quote) {
                return Some((value, i + 3));
            }
        }
        if c == '\\' && i + 1 < chars.len() {
            let next = chars[i + 1];
            i += 2;
            if raw {
                value.push('\\');
                value.push(next);
                continue;
            }
            match next {
                '\\' => value.push('\\'),
                '\'' => value.push('\''),
                '"' => value.push('"'),
                'n' => value.push('\n'),
                't' => value.push('\t'),
                'r' => value.push('\r'),
                '\n' => {}
                other => {
                    value.push('\\');
                    value.push(other);
                }
            }
            continue;
        }
        value.push(c);
        i += 1;
    }
    None
}
