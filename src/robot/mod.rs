//! Robot Framework syntax support for documentation examples.

pub mod highlight;
pub mod keywords;

pub use highlight::RobotHighlighter;
pub use keywords::KeywordIndex;
