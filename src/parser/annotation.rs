//! Type annotation expressions.
//!
//! A small recursive-descent parser for the subset of Python expression
//! syntax used in annotations: dotted names, subscripts, `|` unions, `None`,
//! `...`, string forward references, literals and bracketed lists.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// Possibly dotted name, whitespace removed
    Name(String),
    Subscript(String, Vec<TypeExpr>),
    /// `A | B | C`
    BitOr(Vec<TypeExpr>),
    NoneLit,
    Ellipsis,
    /// String literal as written, plus the annotation it contains
    Str(String, Option<Box<TypeExpr>>),
    /// Number or other atom kept verbatim
    Atom(String),
    /// `[A, B]` (e.g. inside `Callable`)
    List(Vec<TypeExpr>),
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Name(name) => write!(f, "{}", name),
            TypeExpr::Subscript(base, args) => {
                write!(f, "{}[", base)?;
                write_joined(f, args, ", ")?;
                write!(f, "]")
            }
            TypeExpr::BitOr(alts) => write_joined(f, alts, " | "),
            TypeExpr::NoneLit => write!(f, "None"),
            TypeExpr::Ellipsis => write!(f, "..."),
            TypeExpr::Str(raw, _) | TypeExpr::Atom(raw) => write!(f, "{}", raw),
            TypeExpr::List(items) => {
                write!(f, "[")?;
                write_joined(f, items, ", ")?;
                write!(f, "]")
            }
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[TypeExpr], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", sep)?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

/// Parse an annotation. Returns None when the text is outside the
/// supported subset or has trailing garbage.
pub fn parse_annotation(text: &str) -> Option<TypeExpr> {
    let mut parser = Parser {
        chars: text.chars().collect(),
        pos: 0,
    };
    let expr = parser.expr()?;
    parser.skip_ws();
    if parser.pos == parser.chars.len() {
        Some(expr)
    } else {
        None
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn skip_ws(&mut self) {
        while self.chars.get(self.pos).is_some_and(|c| c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_ws();
        self.chars.get(self.pos).copied()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expr(&mut self) -> Option<TypeExpr> {
        let first = self.primary()?;
        let mut alts = vec![first];
        while self.eat('|') {
            alts.push(self.primary()?);
        }
        if alts.len() == 1 {
            alts.pop()
        } else {
            Some(TypeExpr::BitOr(alts))
        }
    }

    fn primary(&mut self) -> Option<TypeExpr> {
        match self.peek()? {
            '[' => {
                self.pos += 1;
                let items = self.list(']')?;
                Some(TypeExpr::List(items))
            }
            '.' => {
                let rest: String = self.chars[self.pos..].iter().take(3).collect();
                if rest == "..." {
                    self.pos += 3;
                    Some(TypeExpr::Ellipsis)
                } else {
                    None
                }
            }
            '"' | '\'' => self.string(),
            c if c.is_ascii_digit() || c == '-' => Some(TypeExpr::Atom(self.number())),
            c if c.is_alphabetic() || c == '_' => {
                let name = self.dotted()?;
                if self.eat('[') {
                    let args = self.list(']')?;
                    if args.is_empty() {
                        return None;
                    }
                    Some(TypeExpr::Subscript(name, args))
                } else if name == "None" {
                    Some(TypeExpr::NoneLit)
                } else {
                    Some(TypeExpr::Name(name))
                }
            }
            _ => None,
        }
    }

    /// Comma-separated expressions up to `close` (consumed).
    fn list(&mut self, close: char) -> Option<Vec<TypeExpr>> {
        let mut items = Vec::new();
        loop {
            if self.eat(close) {
                return Some(items);
            }
            items.push(self.expr()?);
            if !self.eat(',') {
                return if self.eat(close) { Some(items) } else { None };
            }
        }
    }

    fn dotted(&mut self) -> Option<String> {
        let mut name = self.ident()?;
        loop {
            let save = self.pos;
            if self.eat('.') {
                if let Some(part) = self.ident() {
                    name.push('.');
                    name.push_str(&part);
                    continue;
                }
            }
            self.pos = save;
            return Some(name);
        }
    }

    fn ident(&mut self) -> Option<String> {
        self.skip_ws();
        let start = self.pos;
        while self
            .chars
            .get(self.pos)
            .is_some_and(|c| c.is_alphanumeric() || *c == '_')
        {
            self.pos += 1;
        }
        let ident: String = self.chars[start..self.pos].iter().collect();
        if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
            self.pos = start;
            None
        } else {
            Some(ident)
        }
    }

    fn number(&mut self) -> String {
        let start = self.pos;
        self.pos += 1;
        while self
            .chars
            .get(self.pos)
            .is_some_and(|c| c.is_ascii_alphanumeric() || *c == '.' || *c == '_')
        {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn string(&mut self) -> Option<TypeExpr> {
        let quote = self.chars[self.pos];
        let start = self.pos;
        self.pos += 1;
        let mut inner = String::new();
        loop {
            let c = *self.chars.get(self.pos)?;
            self.pos += 1;
            match c {
                '\\' => {
                    inner.push(*self.chars.get(self.pos)?);
                    self.pos += 1;
                }
                c if c == quote => break,
                c => inner.push(c),
            }
        }
        let raw: String = self.chars[start..self.pos].iter().collect();
        let parsed = parse_annotation(&inner).map(Box::new);
        Some(TypeExpr::Str(raw, parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_subscripts() {
        let expr = parse_annotation("typing.Dict[ str , List[int] ]").unwrap();
        assert_eq!(
            expr,
            TypeExpr::Subscript(
                "typing.Dict".into(),
                vec![
                    TypeExpr::Name("str".into()),
                    TypeExpr::Subscript("List".into(), vec![TypeExpr::Name("int".into())]),
                ]
            )
        );
        assert_eq!(expr.to_string(), "typing.Dict[str, List[int]]");
    }

    #[test]
    fn bitor_union_with_none() {
        let expr = parse_annotation("str | int | None").unwrap();
        assert_eq!(
            expr,
            TypeExpr::BitOr(vec![
                TypeExpr::Name("str".into()),
                TypeExpr::Name("int".into()),
                TypeExpr::NoneLit,
            ])
        );
    }

    #[test]
    fn forward_reference() {
        let expr = parse_annotation("\"Color\"").unwrap();
        match expr {
            TypeExpr::Str(raw, Some(inner)) => {
                assert_eq!(raw, "\"Color\"");
                assert_eq!(*inner, TypeExpr::Name("Color".into()));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn callable_and_literal() {
        let expr = parse_annotation("Callable[[int, str], None]").unwrap();
        assert_eq!(expr.to_string(), "Callable[[int, str], None]");
        let expr = parse_annotation("Literal['a', 1]").unwrap();
        assert_eq!(expr.to_string(), "Literal['a', 1]");
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_annotation("int |"), None);
        assert_eq!(parse_annotation("List[int"), None);
        assert_eq!(parse_annotation("lambda x: x"), None);
        assert_eq!(parse_annotation(""), None);
    }
}
