//! HTML renderer. Fills a page template with the keyword documentation.

use crate::error::AssemblyError;
use crate::markup::{html_escape, MarkupRenderer};
use crate::model::*;
use crate::render::{parameter_enums, RenderOptions, Renderer};
use crate::toc;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

static RE_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([a-z_]+)\}\}").unwrap());

pub const DEFAULT_TEMPLATE: &str = include_str!("../../templates/default.html");

const CONTENT_PLACEHOLDER: &str = "keywords";

pub struct HtmlRenderer {
    options: RenderOptions,
}

impl HtmlRenderer {
    pub fn new(options: RenderOptions) -> Self {
        HtmlRenderer { options }
    }

    fn template(&self) -> &str {
        self.options.template.as_deref().unwrap_or(DEFAULT_TEMPLATE)
    }
}

impl Renderer for HtmlRenderer {
    fn render(&self, lib: &LibraryInfo, markup: &MarkupRenderer) -> Result<String, AssemblyError> {
        let template = self.template();
        if !template.contains("{{keywords}}") {
            return Err(AssemblyError::MissingPlaceholder(CONTENT_PLACEHOLDER));
        }

        let values = placeholder_values(lib, markup, &self.options.generated_at);
        let page = RE_PLACEHOLDER.replace_all(template, |caps: &Captures| {
            match values.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            }
        });
        Ok(page.into_owned())
    }

    fn file_extension(&self) -> &str {
        "html"
    }
}

fn placeholder_values(
    lib: &LibraryInfo,
    markup: &MarkupRenderer,
    generated_at: &str,
) -> HashMap<&'static str, String> {
    let meta = lib.metadata.clone().unwrap_or_default();
    let anchors = toc::anchors(lib.keywords.iter().map(|k| k.name.as_str()));
    let text = |v: &Option<String>| v.as_deref().map(html_escape).unwrap_or_default();

    let mut values = HashMap::new();
    values.insert("library_name", html_escape(&lib.name));
    values.insert("library_version", html_escape(&lib.version));
    values.insert("library_scope", html_escape(&lib.scope));
    values.insert("introduction", markup.to_html(&lib.description));
    values.insert("keyword_index", keyword_index(lib, &anchors));
    values.insert("keyword_count", lib.keyword_count().to_string());
    values.insert("generated_at", html_escape(generated_at));
    values.insert("metadata", metadata_block(&meta));
    values.insert("author", text(&meta.author));
    values.insert("maintainer", text(&meta.maintainer));
    values.insert("license", text(&meta.license));
    values.insert("robot_framework", text(&meta.robot_framework));
    values.insert("python", text(&meta.python));
    values.insert(
        "github_button",
        link_button(meta.github_url.as_deref(), "github-button", "GitHub"),
    );
    values.insert(
        "library_button",
        link_button(meta.library_url.as_deref(), "library-button", "Library"),
    );
    values.insert(
        "support_button",
        meta.support_email
            .as_deref()
            .map(|email| {
                format!(
                    "<a class=\"button support-button\" href=\"mailto:{}\">Support</a>",
                    html_escape(email)
                )
            })
            .unwrap_or_default(),
    );

    let keywords: Vec<String> = lib
        .keywords
        .iter()
        .zip(&anchors)
        .map(|(kw, anchor)| render_keyword(kw, anchor, markup))
        .collect();
    values.insert(CONTENT_PLACEHOLDER, keywords.join("\n"));
    values
}

fn keyword_index(lib: &LibraryInfo, anchors: &[String]) -> String {
    let mut out = String::from("<ul class=\"keyword-list\" id=\"keyword-list\">\n");
    for (kw, anchor) in lib.keywords.iter().zip(anchors) {
        out.push_str(&format!(
            "  <li><a href=\"#{}\">{}</a></li>\n",
            html_escape(anchor),
            html_escape(&kw.name)
        ));
    }
    out.push_str("</ul>");
    out
}

fn metadata_block(meta: &LibraryMetadata) -> String {
    let fields = meta.fields();
    if fields.is_empty() {
        return String::new();
    }
    let mut out = String::from("<div class=\"metadata\">\n");
    for (label, value) in fields {
        out.push_str(&format!(
            "  <span class=\"meta-item\"><strong>{}:</strong> {}</span>\n",
            label,
            html_escape(value)
        ));
    }
    out.push_str("</div>");
    out
}

fn link_button(url: Option<&str>, class: &str, label: &str) -> String {
    match url {
        Some(url) => format!(
            "<a class=\"button {}\" href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a>",
            class,
            html_escape(url),
            label
        ),
        None => String::new(),
    }
}

fn render_keyword(kw: &Keyword, anchor: &str, markup: &MarkupRenderer) -> String {
    let mut out = String::new();
    let anchor = html_escape(anchor);

    out.push_str(&format!("<div class=\"keyword-container\" id=\"{}\">\n", anchor));
    out.push_str(&format!(
        "<div class=\"keyword-name\"><h2><a class=\"kw-name\" href=\"#{}\">{}</a></h2></div>\n",
        anchor,
        html_escape(&kw.name)
    ));
    out.push_str("<div class=\"keyword-content\">\n");

    // Arguments
    if !kw.parameters.is_empty() {
        out.push_str("<div class=\"args\">\n<h4>Arguments</h4>\n<ul>\n");
        for param in &kw.parameters {
            out.push_str(&render_parameter(param));
        }
        out.push_str("</ul>\n</div>\n");
    }

    // Return type
    if !kw.return_type.is_none() {
        out.push_str(&format!(
            "<div class=\"return-type\">\n<h4>Return Type</h4>\n<span class=\"arg-type\">{}</span>\n</div>\n",
            html_escape(&kw.return_type.to_string())
        ));
    }

    // Enum members
    for ty in parameter_enums(&kw.parameters) {
        if let TypeDescriptor::Enum { name, members } = ty {
            out.push_str(&format!(
                "<div class=\"enum-type\">\n<h4>{}</h4>\n<table class=\"enum-table\">\n<thead><tr><th>Member</th><th>Value</th></tr></thead>\n<tbody>\n",
                html_escape(name)
            ));
            for member in members {
                out.push_str(&format!(
                    "<tr><td>{}</td><td><code>{}</code></td></tr>\n",
                    html_escape(&member.name),
                    html_escape(&member.value)
                ));
            }
            out.push_str("</tbody>\n</table>\n</div>\n");
        }
    }

    // Documentation
    if !kw.doc.is_empty() {
        out.push_str("<div class=\"kw-docs\">\n<h4>Documentation</h4>\n<div class=\"kwdoc doc\">\n");
        out.push_str(&markup.to_html(&kw.doc));
        out.push_str("\n</div>\n</div>\n");
    }

    out.push_str("</div>\n</div>");
    out
}

fn render_parameter(param: &Parameter) -> String {
    let mut out = format!(
        "  <li><span class=\"arg-name\">{}</span>: <span class=\"arg-type\">{}</span>",
        html_escape(&param.name),
        html_escape(&param.ty.to_string())
    );
    if let Some(ref default) = param.default {
        out.push_str(&format!(
            " = <span class=\"arg-default\">{}</span>",
            html_escape(default)
        ));
    }
    if param.required {
        out.push_str("<span class=\"arg-required\">required</span>");
    }
    out.push_str("</li>\n");
    out
}
