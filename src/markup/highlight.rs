//! Pluggable highlighting for non-Robot code blocks.

use crate::error::HighlightError;
use crate::markup::html_escape;

/// Turns code in a given language into an HTML fragment for a `<pre>`.
pub trait CodeHighlighter {
    /// True if this highlighter handles the language tag.
    fn supports(&self, language: &str) -> bool;

    fn highlight(&self, code: &str, language: &str) -> Result<String, HighlightError>;
}

/// Languages left to a client-side highlighter keyed on `language-*`.
const CLIENT_SIDE_LANGUAGES: &[&str] = &[
    "python", "py", "bash", "sh", "shell", "console", "json", "yaml", "yml", "xml", "html",
    "javascript", "js", "typescript", "ts", "css", "sql", "ini", "toml",
];

/// Default highlighter: escapes the code and leaves coloring to the page's
/// client-side highlighter.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClientSideHighlighter;

impl CodeHighlighter for ClientSideHighlighter {
    fn supports(&self, language: &str) -> bool {
        CLIENT_SIDE_LANGUAGES
            .iter()
            .any(|l| l.eq_ignore_ascii_case(language))
    }

    fn highlight(&self, code: &str, _language: &str) -> Result<String, HighlightError> {
        Ok(html_escape(code))
    }
}
