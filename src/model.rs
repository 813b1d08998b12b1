//! Data model for an extracted library — format-agnostic.

use std::fmt;

/// Complete extraction result for a single library source file.
#[derive(Debug, Default, Clone)]
pub struct LibraryInfo {
    pub name: String,
    /// `ROBOT_LIBRARY_VERSION`, "Unknown" when not declared
    pub version: String,
    /// `ROBOT_LIBRARY_SCOPE`, "TEST" when not declared
    pub scope: String,
    /// Cleaned class or module docstring
    pub description: String,
    pub keywords: Vec<Keyword>,
    /// Filled from configuration by the CLI
    pub metadata: Option<LibraryMetadata>,
}

impl LibraryInfo {
    /// Insert a keyword, replacing an earlier one with the same display name
    /// in its original position. Returns true when a keyword was replaced.
    pub fn insert_keyword(&mut self, keyword: Keyword) -> bool {
        match self.keywords.iter_mut().find(|k| k.name == keyword.name) {
            Some(existing) => {
                *existing = keyword;
                true
            }
            None => {
                self.keywords.push(keyword);
                false
            }
        }
    }

    pub fn keyword_count(&self) -> usize {
        self.keywords.len()
    }
}

/// A single documented keyword.
#[derive(Debug, Default, Clone)]
pub struct Keyword {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: TypeDescriptor,
    /// Cleaned docstring, still in markup form
    pub doc: String,
    /// 1-based line of the `def`
    pub line_number: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variadic {
    #[default]
    No,
    /// `*args`
    Positional,
    /// `**kwargs`
    Keyword,
}

/// One keyword argument.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Includes the `*`/`**` prefix for variadic parameters
    pub name: String,
    pub ty: TypeDescriptor,
    /// Default value as display text
    pub default: Option<String>,
    pub required: bool,
    pub variadic: Variadic,
}

/// A member of an enum type: name and literal value text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    pub name: String,
    /// `"red"` for string values, `1` for numbers
    pub value: String,
}

/// Normalized type of a parameter or return value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    Primitive(String),
    Enum {
        name: String,
        members: Vec<EnumMember>,
    },
    Optional(Box<TypeDescriptor>),
    Union(Vec<TypeDescriptor>),
    ListOf(Box<TypeDescriptor>),
    DictOf(Box<TypeDescriptor>, Box<TypeDescriptor>),
    Unknown(String),
}

impl Default for TypeDescriptor {
    fn default() -> Self {
        TypeDescriptor::Unknown("None".to_string())
    }
}

impl TypeDescriptor {
    /// True for the conventional "returns nothing" descriptor.
    pub fn is_none(&self) -> bool {
        matches!(self, TypeDescriptor::Unknown(raw) if raw == "None")
    }

    /// Enum descriptors reachable from this one, outermost first.
    pub fn enums(&self) -> Vec<&TypeDescriptor> {
        let mut found = Vec::new();
        self.collect_enums(&mut found);
        found
    }

    fn collect_enums<'a>(&'a self, found: &mut Vec<&'a TypeDescriptor>) {
        match self {
            TypeDescriptor::Enum { .. } => found.push(self),
            TypeDescriptor::Optional(inner) | TypeDescriptor::ListOf(inner) => {
                inner.collect_enums(found)
            }
            TypeDescriptor::Union(alts) => alts.iter().for_each(|a| a.collect_enums(found)),
            TypeDescriptor::DictOf(k, v) => {
                k.collect_enums(found);
                v.collect_enums(found);
            }
            TypeDescriptor::Primitive(_) | TypeDescriptor::Unknown(_) => {}
        }
    }
}

/// Renders in annotation syntax, so the output can be normalized again.
impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Primitive(name) => write!(f, "{}", name),
            TypeDescriptor::Enum { name, .. } => write!(f, "{}", name),
            TypeDescriptor::Optional(inner) => write!(f, "Optional[{}]", inner),
            TypeDescriptor::Union(alts) => {
                write!(f, "Union[")?;
                for (i, alt) in alts.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", alt)?;
                }
                write!(f, "]")
            }
            TypeDescriptor::ListOf(inner) => write!(f, "List[{}]", inner),
            TypeDescriptor::DictOf(k, v) => write!(f, "Dict[{}, {}]", k, v),
            TypeDescriptor::Unknown(raw) => write!(f, "{}", raw),
        }
    }
}

/// Optional library metadata supplied by configuration.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LibraryMetadata {
    pub author: Option<String>,
    pub maintainer: Option<String>,
    pub license: Option<String>,
    /// Robot Framework version constraint
    pub robot_framework: Option<String>,
    /// Python version constraint
    pub python: Option<String>,
    pub github_url: Option<String>,
    pub library_url: Option<String>,
    pub support_email: Option<String>,
}

impl LibraryMetadata {
    /// Labelled metadata fields that are present, in display order.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("Author", &self.author),
            ("Maintainer", &self.maintainer),
            ("License", &self.license),
            ("Robot Framework", &self.robot_framework),
            ("Python", &self.python),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.as_deref().map(|v| (label, v)))
        .collect()
    }
}
