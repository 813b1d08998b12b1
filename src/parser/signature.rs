//! Statement shapes recognized by the extractor: `def` headers, decorators,
//! class headers and simple assignments.
//!
//! Every helper is string- and bracket-aware, so commas, colons and equals
//! signs inside literals or nested brackets never split a statement.

use crate::model::Variadic;
use crate::parser::source::{is_string_literal, string_literal_value};
use regex::Regex;
use std::sync::LazyLock;

static RE_IDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*").unwrap());

static RE_DOTTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\s*\.\s*[A-Za-z_][A-Za-z0-9_]*)*").unwrap());

/// Parsed `def` statement header.
#[derive(Debug, Clone, PartialEq)]
pub struct DefHeader {
    pub name: String,
    pub params: Vec<RawParam>,
    /// Return annotation source text
    pub returns: Option<String>,
}

/// Parameter as written in source.
#[derive(Debug, Clone, PartialEq)]
pub struct RawParam {
    /// Bare name, without `*`/`**`
    pub name: String,
    pub annotation: Option<String>,
    pub default: Option<String>,
    pub variadic: Variadic,
}

/// `@path` or `@path(args)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Decorator {
    pub path: String,
    /// Text between the call parentheses; None when not called
    pub args: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassHeader {
    pub name: String,
    pub bases: Vec<String>,
}

// -- Top-level scanning -------------------------------------------------------

/// Byte offsets and characters outside string literals, with the bracket
/// depth in effect before each character.
fn top_level_chars(text: &str) -> Vec<(usize, char, usize)> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut out = Vec::with_capacity(chars.len());
    let mut depth = 0usize;
    let mut i = 0;
    while i < chars.len() {
        let (pos, c) = chars[i];
        if c == '"' || c == '\'' {
            let triple = chars.get(i + 1).map(|x| x.1) == Some(c)
                && chars.get(i + 2).map(|x| x.1) == Some(c);
            i += if triple { 3 } else { 1 };
            while i < chars.len() {
                let ch = chars[i].1;
                if ch == '\\' {
                    i += 2;
                    continue;
                }
                if ch == c {
                    if !triple {
                        i += 1;
                        break;
                    }
                    if chars.get(i + 1).map(|x| x.1) == Some(c)
                        && chars.get(i + 2).map(|x| x.1) == Some(c)
                    {
                        i += 3;
                        break;
                    }
                }
                i += 1;
            }
            continue;
        }
        out.push((pos, c, depth));
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
        i += 1;
    }
    out
}

/// Split on `sep` at bracket depth zero, outside strings.
pub fn split_top_level(text: &str, sep: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut start = 0;
    for (pos, c, depth) in top_level_chars(text) {
        if c == sep && depth == 0 {
            parts.push(text[start..pos].to_string());
            start = pos + c.len_utf8();
        }
    }
    parts.push(text[start..].to_string());
    parts
}

/// Offset of the first depth-zero `=` that is an assignment, not a
/// comparison (`==`, `<=`, `>=`, `!=`) or an augmented operator.
fn find_assign(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    top_level_chars(text)
        .into_iter()
        .find(|&(pos, c, depth)| {
            if c != '=' || depth != 0 {
                return false;
            }
            let prev = pos.checked_sub(1).map(|p| bytes[p]);
            let next = bytes.get(pos + 1).copied();
            !matches!(
                prev,
                Some(b'=' | b'<' | b'>' | b'!' | b'+' | b'-' | b'*' | b'/' | b'%' | b'&' | b'|' | b'^' | b':')
            ) && next != Some(b'=')
        })
        .map(|(pos, _, _)| pos)
}

/// Offset of the first depth-zero occurrence of `needle` before `limit`.
fn find_top_level(text: &str, needle: char, limit: usize) -> Option<usize> {
    top_level_chars(text)
        .into_iter()
        .find(|&(pos, c, depth)| c == needle && depth == 0 && pos < limit)
        .map(|(pos, _, _)| pos)
}

/// Offset of the bracket closing the one opened at `open`.
fn matching_close(text: &str, open: usize) -> Option<usize> {
    let base = top_level_chars(text)
        .into_iter()
        .find(|&(pos, _, _)| pos == open)?
        .2;
    top_level_chars(text)
        .into_iter()
        .find(|&(pos, c, depth)| pos > open && depth == base + 1 && matches!(c, ')' | ']' | '}'))
        .map(|(pos, _, _)| pos)
}

// -- Statement parsers --------------------------------------------------------

/// Parse `def name(params) -> ret:` (also `async def`).
pub fn parse_def(text: &str) -> Option<DefHeader> {
    let rest = text.trim_start();
    let rest = rest.strip_prefix("async").map(str::trim_start).unwrap_or(rest);
    let rest = rest.strip_prefix("def")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim_start();
    let name = RE_IDENT.find(rest)?.as_str().to_string();
    let after_name = rest[name.len()..].trim_start();
    if !after_name.starts_with('(') {
        return None;
    }
    let close = matching_close(after_name, 0)?;
    let params_text = &after_name[1..close];
    let tail = after_name[close + 1..].trim_start();

    let returns = if let Some(ann) = tail.strip_prefix("->") {
        let colon = find_top_level(ann, ':', ann.len())?;
        Some(ann[..colon].trim().to_string())
    } else if tail.starts_with(':') {
        None
    } else {
        return None;
    };

    let params = split_top_level(params_text, ',')
        .iter()
        .filter_map(|p| parse_param(p))
        .collect();

    Some(DefHeader {
        name,
        params,
        returns,
    })
}

/// Parse one parameter; returns None for empty pieces and the bare `*`/`/`
/// markers.
fn parse_param(text: &str) -> Option<RawParam> {
    let text = text.trim();
    if text.is_empty() || text == "*" || text == "/" {
        return None;
    }
    let (variadic, text) = if let Some(rest) = text.strip_prefix("**") {
        (Variadic::Keyword, rest.trim_start())
    } else if let Some(rest) = text.strip_prefix('*') {
        (Variadic::Positional, rest.trim_start())
    } else {
        (Variadic::No, text)
    };

    let eq = find_assign(text);
    let colon = find_top_level(text, ':', eq.unwrap_or(text.len()));
    let name_end = colon.or(eq).unwrap_or(text.len());
    let name = text[..name_end].trim().to_string();
    let annotation = colon.map(|c| text[c + 1..eq.unwrap_or(text.len())].trim().to_string());
    let default = eq.map(|e| text[e + 1..].trim().to_string());

    Some(RawParam {
        name,
        annotation: annotation.filter(|a| !a.is_empty()),
        default: default.filter(|d| !d.is_empty()),
        variadic,
    })
}

/// Parse `@path` / `@path(args)`.
pub fn parse_decorator(text: &str) -> Option<Decorator> {
    let rest = text.trim().strip_prefix('@')?.trim_start();
    let path_match = RE_DOTTED.find(rest)?;
    let path: String = path_match.as_str().chars().filter(|c| !c.is_whitespace()).collect();
    let tail = rest[path_match.end()..].trim_start();
    let args = if tail.starts_with('(') {
        let close = matching_close(tail, 0)?;
        Some(tail[1..close].trim().to_string())
    } else {
        None
    };
    Some(Decorator { path, args })
}

/// Parse `class Name:` / `class Name(bases):`.
pub fn parse_class(text: &str) -> Option<ClassHeader> {
    let rest = text.trim_start().strip_prefix("class")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim_start();
    let name = RE_IDENT.find(rest)?.as_str().to_string();
    let tail = rest[name.len()..].trim_start();
    let bases = if tail.starts_with('(') {
        let close = matching_close(tail, 0)?;
        split_top_level(&tail[1..close], ',')
            .into_iter()
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty() && find_assign(b).is_none())
            .collect()
    } else {
        Vec::new()
    };
    Some(ClassHeader { name, bases })
}

/// Parse `NAME = value` or `NAME: annotation = value`.
pub fn parse_assignment(text: &str) -> Option<(String, String)> {
    let text = text.trim();
    let name = RE_IDENT.find(text)?.as_str();
    let after = text[name.len()..].trim_start();
    if !(after.starts_with('=') || after.starts_with(':')) {
        return None;
    }
    let eq = find_assign(text)?;
    if let Some(colon) = find_top_level(text, ':', eq) {
        if text[name.len()..colon].trim() != "" {
            return None;
        }
    } else if text[name.len()..eq].trim() != "" {
        return None;
    }
    Some((name.to_string(), text[eq + 1..].trim().to_string()))
}

/// Collapse runs of whitespace outside string literals into one space.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut pending_space = false;
    for c in text.trim().chars() {
        if let Some(q) = quote {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        if c == '"' || c == '\'' {
            quote = Some(c);
        }
        out.push(c);
    }
    out
}

/// Display text for a default value expression.
///
/// String literals are shown double-quoted; everything else keeps its
/// source form with whitespace collapsed.
pub fn format_default(expr: &str) -> String {
    if is_string_literal(expr) {
        if let Some(value) = string_literal_value(expr) {
            return quote_display(&value);
        }
    }
    collapse_whitespace(expr)
}

/// `"value"` with embedded quotes and backslashes escaped.
fn quote_display(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn def_with_annotations_and_defaults() {
        let def = parse_def(
            "def process(self, item: str, status: Status = Status.PENDING, *args, key: Dict[str, int] = {'a': 1}, **kwargs) -> dict:",
        )
        .unwrap();
        assert_eq!(def.name, "process");
        assert_eq!(def.returns.as_deref(), Some("dict"));
        let names: Vec<_> = def.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["self", "item", "status", "args", "key", "kwargs"]);
        assert_eq!(def.params[2].annotation.as_deref(), Some("Status"));
        assert_eq!(def.params[2].default.as_deref(), Some("Status.PENDING"));
        assert_eq!(def.params[3].variadic, Variadic::Positional);
        assert_eq!(def.params[4].annotation.as_deref(), Some("Dict[str, int]"));
        assert_eq!(def.params[4].default.as_deref(), Some("{'a': 1}"));
        assert_eq!(def.params[5].variadic, Variadic::Keyword);
    }

    #[test]
    fn def_skips_bare_markers() {
        let def = parse_def("async def f(a, /, b, *, c=1):").unwrap();
        let names: Vec<_> = def.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(def.returns, None);
    }

    #[test]
    fn def_with_string_containing_separators() {
        let def = parse_def(r#"def f(sep: str = ",:=)", n: int = 3) -> None:"#).unwrap();
        assert_eq!(def.params.len(), 2);
        assert_eq!(def.params[0].default.as_deref(), Some(r#"",:=)""#));
        assert_eq!(def.returns.as_deref(), Some("None"));
    }

    #[test]
    fn not_a_def() {
        assert_eq!(parse_def("define = 1"), None);
        assert_eq!(parse_def("def f(a"), None);
    }

    #[test]
    fn decorators() {
        assert_eq!(
            parse_decorator("@keyword").unwrap(),
            Decorator { path: "keyword".into(), args: None }
        );
        assert_eq!(
            parse_decorator("@robot.api.deco.keyword(\"Open It\", tags=['a'])").unwrap(),
            Decorator {
                path: "robot.api.deco.keyword".into(),
                args: Some("\"Open It\", tags=['a']".into())
            }
        );
    }

    #[test]
    fn class_headers() {
        let class = parse_class("class Color(str, enum.Enum, metaclass=Meta):").unwrap();
        assert_eq!(class.name, "Color");
        assert_eq!(class.bases, ["str", "enum.Enum"]);
        assert_eq!(parse_class("class Plain:").unwrap().bases.len(), 0);
    }

    #[test]
    fn assignments() {
        assert_eq!(
            parse_assignment("ROBOT_LIBRARY_SCOPE = 'GLOBAL'"),
            Some(("ROBOT_LIBRARY_SCOPE".into(), "'GLOBAL'".into()))
        );
        assert_eq!(
            parse_assignment("version: str = __version__"),
            Some(("version".into(), "__version__".into()))
        );
        assert_eq!(parse_assignment("x == 1"), None);
        assert_eq!(parse_assignment("x += 1"), None);
        assert_eq!(parse_assignment("f(a=1)"), None);
    }

    #[test]
    fn default_display() {
        assert_eq!(format_default("'red'"), "\"red\"");
        assert_eq!(format_default("30"), "30");
        assert_eq!(format_default("[1,   2]"), "[1, 2]");
        assert_eq!(format_default("None"), "None");
    }
}
