//! Error types for extraction, highlighting and document assembly.

use thiserror::Error;

/// Failure to turn a source file into a complete library model.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    /// The scanner could not split the source into statements.
    #[error("syntax error at line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// A `@keyword` marker without a name on an identifier with no words.
    #[error("unnameable keyword at line {line}: `{identifier}` has no name segments")]
    UnnameableKeyword { line: usize, identifier: String },

    /// Input file extension is not a Python source file.
    #[error("unsupported file type: {0}")]
    UnsupportedFile(String),
}

/// Failure reported by a code highlighter collaborator.
#[derive(Debug, Error)]
#[error("highlighter failed for language '{language}': {message}")]
pub struct HighlightError {
    pub language: String,
    pub message: String,
}

/// Failure to combine a library model with a template.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssemblyError {
    #[error("template is missing the mandatory {{{{{0}}}}} placeholder")]
    MissingPlaceholder(&'static str),

    #[error("unknown format: {0}. Use markdown or html")]
    UnknownFormat(String),
}
