//! Documentation markup renderer.
//!
//! Docstrings use a small Markdown dialect: headings, emphasis (including
//! `++underline++`), tables, fenced code, links, images, lists and rules.
//! Fenced `robot` blocks go to the Robot Framework highlighter; other
//! tagged blocks go to a pluggable [`CodeHighlighter`].

pub mod block;
pub mod highlight;
pub mod html;
pub mod inline;
pub mod markdown;

pub use highlight::{ClientSideHighlighter, CodeHighlighter};

use crate::robot::RobotHighlighter;
use tracing::warn;

pub struct MarkupRenderer<'a> {
    robot: &'a RobotHighlighter,
    generic: &'a dyn CodeHighlighter,
}

impl<'a> MarkupRenderer<'a> {
    pub fn new(robot: &'a RobotHighlighter, generic: &'a dyn CodeHighlighter) -> Self {
        MarkupRenderer { robot, generic }
    }

    /// Render documentation text as an HTML fragment.
    pub fn to_html(&self, text: &str) -> String {
        let blocks = block::parse(text);
        html::render(&blocks, &|language, code| self.highlight_code(language, code))
    }

    /// Render documentation text as normalized Markdown.
    pub fn to_markdown(&self, text: &str) -> String {
        markdown::render(&block::parse(text))
    }

    fn highlight_code(&self, language: Option<&str>, code: &str) -> String {
        match language {
            Some(lang) if is_robot(lang) => self.robot.highlight(code),
            Some(lang) if self.generic.supports(lang) => {
                match self.generic.highlight(code, lang) {
                    Ok(html) => html,
                    Err(e) => {
                        warn!(language = lang, error = %e, "highlighter failed, using plain text");
                        html_escape(code)
                    }
                }
            }
            _ => html_escape(code),
        }
    }
}

fn is_robot(language: &str) -> bool {
    language.eq_ignore_ascii_case("robot") || language.eq_ignore_ascii_case("robotframework")
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
