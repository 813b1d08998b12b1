//! GitHub-flavored markdown renderer.

use crate::error::AssemblyError;
use crate::markup::MarkupRenderer;
use crate::model::*;
use crate::render::{parameter_enums, Renderer};
use crate::toc;

pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, lib: &LibraryInfo, markup: &MarkupRenderer) -> Result<String, AssemblyError> {
        let mut lines: Vec<String> = Vec::new();

        // Title and library attributes
        lines.push(format!("# {}\n", lib.name));
        lines.push(format!("**Version:** {}  ", lib.version));
        lines.push(format!("**Scope:** {}", lib.scope));
        lines.push(String::new());

        if let Some(ref meta) = lib.metadata {
            let fields = meta.fields();
            if !fields.is_empty() {
                for (label, value) in fields {
                    lines.push(format!("- **{}:** {}", label, value));
                }
                lines.push(String::new());
            }
            let links = render_links(meta);
            if !links.is_empty() {
                lines.push(links);
                lines.push(String::new());
            }
        }

        lines.push(format!("**Keywords:** {}\n", lib.keyword_count()));

        // Introduction
        if !lib.description.is_empty() {
            lines.push("## Introduction\n".to_string());
            lines.push(markup.to_markdown(&lib.description));
            lines.push(String::new());
        }

        // Index
        let anchors = toc::anchors(lib.keywords.iter().map(|k| k.name.as_str()));
        if !lib.keywords.is_empty() {
            lines.push("## Keywords\n".to_string());
            for (kw, anchor) in lib.keywords.iter().zip(&anchors) {
                lines.push(toc::render_toc_item(&kw.name, anchor));
            }
            lines.push(String::new());
        }

        for (kw, anchor) in lib.keywords.iter().zip(&anchors) {
            lines.push(render_keyword(kw, anchor, markup));
        }

        let mut output = lines.join("\n");
        if !output.ends_with('\n') {
            output.push('\n');
        }
        Ok(output)
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}

fn render_links(meta: &LibraryMetadata) -> String {
    let mut links = Vec::new();
    if let Some(ref url) = meta.github_url {
        links.push(format!("[GitHub]({})", url));
    }
    if let Some(ref url) = meta.library_url {
        links.push(format!("[Library]({})", url));
    }
    if let Some(ref email) = meta.support_email {
        links.push(format!("[Support](mailto:{})", email));
    }
    links.join(" | ")
}

/// Render one keyword section. The explicit anchor keeps index links stable
/// when two names share a slug.
fn render_keyword(kw: &Keyword, anchor: &str, markup: &MarkupRenderer) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("<a id=\"{}\"></a>\n", anchor));
    lines.push(format!("### {}\n", kw.name));

    if !kw.parameters.is_empty() {
        lines.push("#### Arguments\n".to_string());
        for param in &kw.parameters {
            lines.push(format!("* {}", render_parameter(param)));
        }
        lines.push(String::new());
    }

    if !kw.return_type.is_none() {
        lines.push(format!("**Returns:** `{}`\n", kw.return_type));
    }

    for ty in parameter_enums(&kw.parameters) {
        if let TypeDescriptor::Enum { name, members } = ty {
            lines.push(format!("#### {}\n", name));
            lines.push("| Member | Value |".to_string());
            lines.push("|---|---|".to_string());
            for member in members {
                lines.push(format!(
                    "| {} | `{}` |",
                    escape_cell(&member.name),
                    escape_cell(&member.value)
                ));
            }
            lines.push(String::new());
        }
    }

    if !kw.doc.is_empty() {
        lines.push(markup.to_markdown(&kw.doc));
        lines.push(String::new());
    }

    lines.join("\n")
}

/// A `|` inside a table cell would end the cell.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// `**name** (type) = default, required`
fn render_parameter(param: &Parameter) -> String {
    let mut out = format!("**{}** (`{}`)", param.name, param.ty);
    if let Some(ref default) = param.default {
        out.push_str(&format!(" = `{}`", default));
    }
    if param.required {
        out.push_str(", required");
    }
    out
}
