//! HTML emitter for markup blocks.

use crate::markup::block::Block;
use crate::markup::html_escape;
use crate::markup::inline::Inline;

/// Render blocks; `code` turns a code block body into highlighted HTML.
pub fn render(blocks: &[Block], code: &dyn Fn(Option<&str>, &str) -> String) -> String {
    let mut out = Vec::new();
    for block in blocks {
        out.push(match block {
            Block::Heading { level, content } => {
                format!("<h{0}>{1}</h{0}>", level, inlines(content))
            }
            Block::Paragraph(content) => format!("<p>{}</p>", inlines(content)),
            Block::Table { header, rows } => table(header, rows),
            Block::Code { language, text } => format!(
                "<div class=\"code-block\"><pre class=\"language-{}\">{}</pre></div>",
                html_escape(language.as_deref().unwrap_or("text")),
                code(language.as_deref(), text)
            ),
            Block::Rule => "<hr>".to_string(),
            Block::List { ordered, items } => {
                let tag = if *ordered { "ol" } else { "ul" };
                let mut s = format!("<{}>", tag);
                for item in items {
                    s.push_str(&format!("<li>{}</li>", inlines(item)));
                }
                s.push_str(&format!("</{}>", tag));
                s
            }
        });
    }
    out.join("\n")
}

fn table(header: &[Vec<Inline>], rows: &[Vec<Vec<Inline>>]) -> String {
    let mut s = String::from("<table class=\"doc-table\">\n<thead>\n<tr>");
    for cell in header {
        s.push_str(&format!("<th>{}</th>", inlines(cell)));
    }
    s.push_str("</tr>\n</thead>\n<tbody>\n");
    for row in rows {
        s.push_str("<tr>");
        for cell in row {
            s.push_str(&format!("<td>{}</td>", inlines(cell)));
        }
        s.push_str("</tr>\n");
    }
    s.push_str("</tbody>\n</table>");
    s
}

pub fn inlines(items: &[Inline]) -> String {
    items.iter().map(inline).collect()
}

fn inline(item: &Inline) -> String {
    match item {
        Inline::Text(t) => html_escape(t),
        Inline::Bold(inner) => format!("<strong>{}</strong>", inlines(inner)),
        Inline::Italic(inner) => format!("<em>{}</em>", inlines(inner)),
        Inline::Underline(inner) => format!("<u>{}</u>", inlines(inner)),
        Inline::Strikethrough(inner) => format!("<del>{}</del>", inlines(inner)),
        Inline::Code(code) => format!("<code>{}</code>", html_escape(code)),
        Inline::Link { text, url } => {
            format!("<a href=\"{}\">{}</a>", html_escape(url), inlines(text))
        }
        Inline::Image { alt, url } => {
            format!("<img src=\"{}\" alt=\"{}\">", html_escape(url), html_escape(alt))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::block::parse;

    fn escaped(_: Option<&str>, text: &str) -> String {
        html_escape(text)
    }

    #[test]
    fn padded_table_markup() {
        let html = render(&parse("| A | B |\n|---|---|\n| 1 |"), &escaped);
        assert_eq!(
            html,
            "<table class=\"doc-table\">\n<thead>\n<tr><th>A</th><th>B</th></tr>\n</thead>\n<tbody>\n<tr><td>1</td><td></td></tr>\n</tbody>\n</table>"
        );
    }

    #[test]
    fn inline_markup_and_escaping() {
        let html = render(&parse("Use **bold** & `<tag>` [link](http://a?b=1&c=2)"), &escaped);
        assert_eq!(
            html,
            "<p>Use <strong>bold</strong> &amp; <code>&lt;tag&gt;</code> <a href=\"http://a?b=1&amp;c=2\">link</a></p>"
        );
    }

    #[test]
    fn untagged_code_uses_text_class() {
        let html = render(&parse("```\na < b\n```"), &escaped);
        assert_eq!(
            html,
            "<div class=\"code-block\"><pre class=\"language-text\">a &lt; b</pre></div>"
        );
    }

    #[test]
    fn lists_and_rules() {
        let html = render(&parse("1. one\n2. ++two++\n\n---"), &escaped);
        assert_eq!(html, "<ol><li>one</li><li><u>two</u></li></ol>\n<hr>");
    }
}
