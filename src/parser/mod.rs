//! Parser module — dispatch by file extension.

pub mod annotation;
pub mod python;
pub mod signature;
pub mod source;
pub mod types;

use crate::error::ExtractionError;
use crate::model::LibraryInfo;
use std::path::Path;

/// Parse a library source file into a LibraryInfo based on its extension.
pub fn parse_file(path: &Path, content: &str) -> Result<LibraryInfo, ExtractionError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("py") => python::parse(content, path),
        _ => Err(ExtractionError::UnsupportedFile(
            path.display().to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_python_files() {
        let err = parse_file(Path::new("lib.robot"), "").unwrap_err();
        assert_eq!(err, ExtractionError::UnsupportedFile("lib.robot".to_string()));
    }

    #[test]
    fn dispatches_python() {
        let lib = parse_file(Path::new("dir/Empty.py"), "").unwrap();
        assert_eq!(lib.name, "Empty");
        assert_eq!(lib.keyword_count(), 0);
    }
}
