//! Inline tokenizer: emphasis, code spans, links and images.
//!
//! Malformed markup never fails; an opening marker without a closer is
//! emitted as literal text and scanning continues after it.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Bold(Vec<Inline>),
    Italic(Vec<Inline>),
    Underline(Vec<Inline>),
    Strikethrough(Vec<Inline>),
    Code(String),
    Link { text: Vec<Inline>, url: String },
    Image { alt: String, url: String },
}

/// Tokenize one run of inline text.
pub fn tokenize(text: &str) -> Vec<Inline> {
    let chars: Vec<char> = text.chars().collect();
    let mut out: Vec<Inline> = Vec::new();
    let mut literal = String::new();
    let mut i = 0;

    while i < chars.len() {
        match scan_token(&chars, i) {
            Some((token, next)) => {
                if !literal.is_empty() {
                    out.push(Inline::Text(std::mem::take(&mut literal)));
                }
                out.push(token);
                i = next;
            }
            None => {
                literal.push(chars[i]);
                i += 1;
            }
        }
    }
    if !literal.is_empty() {
        out.push(Inline::Text(literal));
    }
    out
}

/// Try to read a token at `i`; returns it with the index after it.
fn scan_token(chars: &[char], i: usize) -> Option<(Inline, usize)> {
    let c = chars[i];
    let next = chars.get(i + 1).copied();
    match c {
        '`' => {
            let close = find(chars, i + 1, |j| chars[j] == '`')?;
            (close > i + 1).then(|| (Inline::Code(collect(chars, i + 1, close)), close + 1))
        }
        '!' if next == Some('[') => {
            let (alt, url, end) = bracket_target(chars, i + 1)?;
            Some((
                Inline::Image {
                    alt: collect(chars, alt.0, alt.1),
                    url,
                },
                end,
            ))
        }
        '[' => {
            let (label, url, end) = bracket_target(chars, i)?;
            Some((
                Inline::Link {
                    text: tokenize(&collect(chars, label.0, label.1)),
                    url,
                },
                end,
            ))
        }
        '*' if next == Some('*') => delimited(chars, i, "**", Inline::Bold),
        '_' if next == Some('_') && !word_before(chars, i) => {
            let (token, end) = delimited(chars, i, "__", Inline::Bold)?;
            (!word_at(chars, end)).then_some((token, end))
        }
        '+' if next == Some('+') => delimited(chars, i, "++", Inline::Underline),
        '~' if next == Some('~') => delimited(chars, i, "~~", Inline::Strikethrough),
        '*' => {
            let close = find_closer(chars, i + 1, |j| {
                chars[j] == '*' && chars.get(j + 1) != Some(&'*') && chars[j - 1] != '*'
            })?;
            (close > i + 1).then(|| (Inline::Italic(tokenize(&collect(chars, i + 1, close))), close + 1))
        }
        '_' if !word_before(chars, i) => {
            let close = find_closer(chars, i + 1, |j| {
                chars[j] == '_' && !word_at(chars, j + 1) && chars[j - 1] != '_'
            })?;
            let inner = collect(chars, i + 1, close);
            (close > i + 1 && !inner.starts_with(char::is_whitespace))
                .then(|| (Inline::Italic(tokenize(&inner)), close + 1))
        }
        _ => None,
    }
}

/// Span opened by `delim` at `i` and closed by the next `delim`.
fn delimited(
    chars: &[char],
    i: usize,
    delim: &str,
    wrap: fn(Vec<Inline>) -> Inline,
) -> Option<(Inline, usize)> {
    let d: Vec<char> = delim.chars().collect();
    let start = i + d.len();
    let close = find_closer(chars, start, |j| chars[j..].starts_with(&d))?;
    if close == start {
        return None;
    }
    Some((wrap(tokenize(&collect(chars, start, close))), close + d.len()))
}

/// `[label](url)` starting at the `[` at `i`; returns the label range, the
/// url and the index after `)`.
fn bracket_target(chars: &[char], i: usize) -> Option<((usize, usize), String, usize)> {
    let close = find(chars, i + 1, |j| chars[j] == ']')?;
    if chars.get(close + 1) != Some(&'(') {
        return None;
    }
    let end = find(chars, close + 2, |j| chars[j] == ')')?;
    let url = collect(chars, close + 2, end).trim().to_string();
    if url.is_empty() {
        return None;
    }
    Some(((i + 1, close), url, end + 1))
}

/// Like `find`, but steps over complete code spans and link or image
/// targets so a marker inside them never closes an outer span.
fn find_closer(chars: &[char], from: usize, pred: impl Fn(usize) -> bool) -> Option<usize> {
    let mut j = from;
    while j < chars.len() {
        if let Some(end) = atomic_span_end(chars, j) {
            j = end;
            continue;
        }
        if pred(j) {
            return Some(j);
        }
        j += 1;
    }
    None
}

/// End of a code span, link or image starting at `j`.
fn atomic_span_end(chars: &[char], j: usize) -> Option<usize> {
    match chars[j] {
        '`' => {
            let close = find(chars, j + 1, |k| chars[k] == '`')?;
            (close > j + 1).then_some(close + 1)
        }
        '!' if chars.get(j + 1) == Some(&'[') => bracket_target(chars, j + 1).map(|t| t.2),
        '[' => bracket_target(chars, j).map(|t| t.2),
        _ => None,
    }
}

fn find(chars: &[char], from: usize, pred: impl Fn(usize) -> bool) -> Option<usize> {
    (from..chars.len()).find(|&j| pred(j))
}

fn collect(chars: &[char], start: usize, end: usize) -> String {
    chars[start..end].iter().collect()
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn word_before(chars: &[char], i: usize) -> bool {
    i > 0 && is_word(chars[i - 1])
}

fn word_at(chars: &[char], i: usize) -> bool {
    chars.get(i).is_some_and(|&c| is_word(c))
}
