//! Markdown emitter for markup blocks.
//!
//! Code blocks stay literal fences; underline has no Markdown syntax and is
//! written as `<u>…</u>`.

use crate::markup::block::Block;
use crate::markup::inline::Inline;

pub fn render(blocks: &[Block]) -> String {
    let mut out: Vec<String> = Vec::new();
    for block in blocks {
        out.push(match block {
            Block::Heading { level, content } => {
                format!("{} {}", "#".repeat(*level), inlines(content))
            }
            Block::Paragraph(content) => inlines(content),
            Block::Table { header, rows } => {
                let mut lines = vec![row(header)];
                lines.push(format!("|{}", "---|".repeat(header.len())));
                lines.extend(rows.iter().map(|r| row(r)));
                lines.join("\n")
            }
            Block::Code { language, text } => {
                format!("```{}\n{}\n```", language.as_deref().unwrap_or(""), text)
            }
            Block::Rule => "---".to_string(),
            Block::List { ordered, items } => items
                .iter()
                .enumerate()
                .map(|(n, item)| {
                    if *ordered {
                        format!("{}. {}", n + 1, inlines(item))
                    } else {
                        format!("- {}", inlines(item))
                    }
                })
                .collect::<Vec<_>>()
                .join("\n"),
        });
    }
    out.join("\n\n")
}

fn row(cells: &[Vec<Inline>]) -> String {
    let cells: Vec<String> = cells.iter().map(|c| inlines(c)).collect();
    format!("| {} |", cells.join(" | "))
}

pub fn inlines(items: &[Inline]) -> String {
    items.iter().map(inline).collect()
}

fn inline(item: &Inline) -> String {
    match item {
        Inline::Text(t) => t.clone(),
        Inline::Bold(inner) => format!("**{}**", inlines(inner)),
        Inline::Italic(inner) => format!("*{}*", inlines(inner)),
        Inline::Underline(inner) => format!("<u>{}</u>", inlines(inner)),
        Inline::Strikethrough(inner) => format!("~~{}~~", inlines(inner)),
        Inline::Code(code) => format!("`{}`", code),
        Inline::Link { text, url } => format!("[{}]({})", inlines(text), url),
        Inline::Image { alt, url } => format!("![{}]({})", alt, url),
    }
}
