//! Python library parser.
//!
//! Extracts Robot Framework keywords from a `.py` library file:
//! - the first top-level class with `@keyword` methods is the library,
//!   otherwise the module and its `@keyword` functions
//! - `ROBOT_LIBRARY_VERSION` / `ROBOT_LIBRARY_SCOPE` from the class body or
//!   module level
//! - enum classes (`Enum`, `IntEnum`, `StrEnum`, `Flag`, `IntFlag`) feed the
//!   type normalizer
//! - docstrings are the first string statement of a body

use crate::docstring;
use crate::error::ExtractionError;
use crate::model::*;
use crate::parser::signature::{
    collapse_whitespace, format_default, parse_assignment, parse_class, parse_decorator,
    parse_def, split_top_level, DefHeader, Decorator,
};
use crate::parser::source::{
    body_range, direct_children, is_string_literal, logical_lines, string_literal_value,
    LogicalLine,
};
use crate::parser::types::{EnumRegistry, TypeNormalizer};
use std::collections::HashMap;
use std::ops::Range;
use std::path::Path;
use tracing::{debug, warn};

const ENUM_BASES: &[&str] = &["Enum", "IntEnum", "StrEnum", "Flag", "IntFlag"];

const VERSION_ATTR: &str = "ROBOT_LIBRARY_VERSION";
const SCOPE_ATTR: &str = "ROBOT_LIBRARY_SCOPE";

/// Parse a Python library source into a LibraryInfo.
pub fn parse(input: &str, path: &Path) -> Result<LibraryInfo, ExtractionError> {
    let lines = logical_lines(input)?;
    let module = direct_children(&lines, 0..lines.len());

    let constants = module_constants(&lines, &module);
    let enums = collect_enums(&lines);
    let normalizer = TypeNormalizer::new(&enums);

    // Phase 1: pick the library unit
    let mut library_class = None;
    for &idx in &module {
        let Some(class) = parse_class(&lines[idx].text) else {
            continue;
        };
        let body = body_range(&lines, idx);
        let methods = marked_defs(&lines, body.clone());
        if !methods.is_empty() {
            debug!(class = %class.name, keywords = methods.len(), "library class found");
            library_class = Some((class.name, body, methods));
            break;
        }
    }

    let mut lib = LibraryInfo::default();
    let (units, in_class) = match library_class {
        Some((name, body, methods)) => {
            let children = direct_children(&lines, body.clone());
            lib.name = name;
            lib.description = docstring_of(&lines, body);
            lib.version = attribute(&lines, &children, VERSION_ATTR, &constants);
            lib.scope = attribute(&lines, &children, SCOPE_ATTR, &constants);
            (methods, true)
        }
        None => {
            lib.name = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            lib.description = docstring_of(&lines, 0..lines.len());
            (marked_defs(&lines, 0..lines.len()), false)
        }
    };
    if lib.version.is_empty() {
        lib.version = attribute(&lines, &module, VERSION_ATTR, &constants);
    }
    if lib.scope.is_empty() {
        lib.scope = attribute(&lines, &module, SCOPE_ATTR, &constants);
    }
    if lib.version.is_empty() {
        lib.version = "Unknown".to_string();
    }
    if lib.scope.is_empty() {
        lib.scope = "TEST".to_string();
    }

    // Phase 2: keywords in declaration order
    for unit in units {
        let keyword = build_keyword(&lines, &unit, in_class, &normalizer)?;
        let line = keyword.line_number;
        let name = keyword.name.clone();
        if lib.insert_keyword(keyword) {
            warn!(keyword = %name, line, "duplicate keyword name, later definition wins");
        }
    }

    debug!(
        library = %lib.name,
        keywords = lib.keyword_count(),
        enums = enums.len(),
        "extraction finished"
    );
    Ok(lib)
}

// -- Scanning helpers ---------------------------------------------------------

/// A `def` carrying a keyword marker, with its decorators.
struct MarkedDef {
    idx: usize,
    header: DefHeader,
    decorators: Vec<Decorator>,
}

/// Keyword-marked `def`s among the direct statements of `range`.
fn marked_defs(lines: &[LogicalLine], range: Range<usize>) -> Vec<MarkedDef> {
    let mut found = Vec::new();
    let mut pending: Vec<Decorator> = Vec::new();
    for idx in direct_children(lines, range) {
        let text = &lines[idx].text;
        if text.starts_with('@') {
            if let Some(deco) = parse_decorator(text) {
                pending.push(deco);
            }
            continue;
        }
        let decorators = std::mem::take(&mut pending);
        let Some(header) = parse_def(text) else {
            continue;
        };
        if decorators.iter().any(is_keyword_marker) {
            found.push(MarkedDef {
                idx,
                header,
                decorators,
            });
        }
    }
    found
}

fn is_keyword_marker(deco: &Decorator) -> bool {
    deco.path == "keyword" || deco.path.ends_with("deco.keyword")
}

/// Module-level names bound to string literals.
fn module_constants(lines: &[LogicalLine], module: &[usize]) -> HashMap<String, String> {
    module
        .iter()
        .filter_map(|&idx| parse_assignment(&lines[idx].text))
        .filter_map(|(name, value)| string_literal_value(&value).map(|v| (name, v)))
        .collect()
}

/// Every class in the file deriving from one of the enum bases.
fn collect_enums(lines: &[LogicalLine]) -> EnumRegistry {
    let mut enums = EnumRegistry::new();
    for (idx, line) in lines.iter().enumerate() {
        let Some(class) = parse_class(&line.text) else {
            continue;
        };
        let is_enum = class.bases.iter().any(|base| {
            let base = base.strip_prefix("enum.").unwrap_or(base);
            ENUM_BASES.contains(&base)
        });
        if !is_enum {
            continue;
        }
        let members = direct_children(lines, body_range(lines, idx))
            .into_iter()
            .filter_map(|i| parse_assignment(&lines[i].text))
            .filter(|(name, _)| !name.starts_with('_'))
            .map(|(name, value)| EnumMember {
                name,
                value: format_default(&value),
            })
            .collect();
        debug!(name = %class.name, "enum registered");
        enums.insert(class.name, members);
    }
    enums
}

/// Evaluated and cleaned docstring of the body in `range`, or empty.
fn docstring_of(lines: &[LogicalLine], range: Range<usize>) -> String {
    let Some(&first) = direct_children(lines, range).first() else {
        return String::new();
    };
    let text = &lines[first].text;
    if !is_string_literal(text) {
        return String::new();
    }
    string_literal_value(text)
        .map(|raw| docstring::clean(&raw))
        .unwrap_or_default()
}

/// Value of a `NAME = ...` attribute among `scope`; empty when absent.
fn attribute(
    lines: &[LogicalLine],
    scope: &[usize],
    attr: &str,
    constants: &HashMap<String, String>,
) -> String {
    let Some(value) = scope
        .iter()
        .filter_map(|&idx| parse_assignment(&lines[idx].text))
        .filter(|(name, _)| name == attr)
        .map(|(_, value)| value)
        .last()
    else {
        return String::new();
    };
    if let Some(literal) = string_literal_value(&value) {
        return literal;
    }
    match constants.get(value.trim()) {
        Some(resolved) => resolved.clone(),
        None => collapse_whitespace(&value),
    }
}

// -- Keyword construction -----------------------------------------------------

fn build_keyword(
    lines: &[LogicalLine],
    unit: &MarkedDef,
    in_class: bool,
    normalizer: &TypeNormalizer,
) -> Result<Keyword, ExtractionError> {
    let line = lines[unit.idx].line;
    let name = match unit.decorators.iter().find_map(marker_name) {
        Some(name) => name,
        None => display_name(&unit.header.name).ok_or_else(|| {
            ExtractionError::UnnameableKeyword {
                line,
                identifier: unit.header.name.clone(),
            }
        })?,
    };

    let is_static = unit.decorators.iter().any(|d| d.path == "staticmethod");
    let skip = usize::from(in_class && !is_static);
    let parameters = unit
        .header
        .params
        .iter()
        .skip(skip)
        .map(|raw| match raw.variadic {
            Variadic::No => {
                let default = raw.default.as_deref().map(format_default);
                Parameter {
                    name: raw.name.clone(),
                    ty: normalizer.normalize(raw.annotation.as_deref()),
                    required: default.is_none(),
                    default,
                    variadic: Variadic::No,
                }
            }
            kind => Parameter {
                name: format!(
                    "{}{}",
                    if kind == Variadic::Keyword { "**" } else { "*" },
                    raw.name
                ),
                ty: TypeDescriptor::Unknown(
                    raw.annotation
                        .as_deref()
                        .map(collapse_whitespace)
                        .unwrap_or_else(|| "Any".to_string()),
                ),
                default: None,
                required: false,
                variadic: kind,
            },
        })
        .collect();

    let return_type = match unit.header.returns.as_deref() {
        Some(ann) => normalizer.normalize(Some(ann)),
        None => TypeDescriptor::Unknown("None".to_string()),
    };

    debug!(keyword = %name, line, "keyword extracted");
    Ok(Keyword {
        name,
        parameters,
        return_type,
        doc: docstring_of(lines, body_range(lines, unit.idx)),
        line_number: line,
    })
}

/// Explicit name from `@keyword("Name")` or `@keyword(name="Name")`.
fn marker_name(deco: &Decorator) -> Option<String> {
    if !is_keyword_marker(deco) {
        return None;
    }
    let args = deco.args.as_deref()?;
    split_top_level(args, ',')
        .iter()
        .map(|arg| arg.trim())
        .find_map(|arg| match parse_assignment(arg) {
            Some((key, value)) if key == "name" => Some(value),
            Some(_) => None,
            None if !arg.is_empty() => Some(arg.to_string()),
            None => None,
        })
        .and_then(|value| string_literal_value(&value))
        .filter(|name| !name.trim().is_empty())
}

/// `open_workbook` → `Open Workbook`.
pub fn display_name(identifier: &str) -> Option<String> {
    let words: Vec<String> = identifier
        .split('_')
        .filter(|seg| !seg.is_empty())
        .map(|seg| {
            let mut chars = seg.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect();
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(src: &str) -> LibraryInfo {
        parse(src, Path::new("my_lib.py")).unwrap()
    }

    const CLASS_LIB: &str = r#"
"""Module docs."""
from enum import Enum
from robot.api.deco import keyword

__version__ = "2.1.0"

class Color(str, Enum):
    RED = "red"
    GREEN = 'green'
    BLUE = "blue"

class Helper:
    def not_a_keyword(self):
        pass

class ExcelLibrary:
    """Work with Excel files.

    Supports xlsx.
    """
    ROBOT_LIBRARY_SCOPE = "GLOBAL"
    ROBOT_LIBRARY_VERSION = __version__

    def __init__(self, path=None):
        self.path = path

    @keyword
    def open_workbook(self, path: str, read_only: bool = False) -> None:
        """Open a workbook.

        | A | B |
        """
        pass

    @keyword("Open Workbook File")
    def open_file(self, path: str, *args, **kwargs: str) -> Optional[str]:
        pass

    @keyword(name="Paint Cell")
    def paint(self, color: Color = Color.RED, shade: Optional[int] = None):
        pass

    def helper(self):
        pass

    @staticmethod
    @keyword
    def static_kw(value):
        pass
"#;

    #[test]
    fn class_library_metadata() {
        let lib = parse_str(CLASS_LIB);
        assert_eq!(lib.name, "ExcelLibrary");
        assert_eq!(lib.version, "2.1.0");
        assert_eq!(lib.scope, "GLOBAL");
        assert_eq!(lib.description, "Work with Excel files.\n\nSupports xlsx.");
        let names: Vec<_> = lib.keywords.iter().map(|k| k.name.as_str()).collect();
        assert_eq!(
            names,
            ["Open Workbook", "Open Workbook File", "Paint Cell", "Static Kw"]
        );
    }

    #[test]
    fn parameters_skip_self_and_keep_variadics() {
        let lib = parse_str(CLASS_LIB);
        let open = &lib.keywords[0];
        assert_eq!(open.parameters.len(), 2);
        assert_eq!(open.parameters[0].name, "path");
        assert!(open.parameters[0].required);
        assert_eq!(open.parameters[1].default.as_deref(), Some("False"));
        assert!(!open.parameters[1].required);
        assert!(open.return_type.is_none());
        assert_eq!(open.doc, "Open a workbook.\n\n| A | B |");

        let file = &lib.keywords[1];
        let names: Vec<_> = file.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["path", "*args", "**kwargs"]);
        assert_eq!(file.parameters[1].ty, TypeDescriptor::Unknown("Any".into()));
        assert_eq!(file.parameters[2].ty, TypeDescriptor::Unknown("str".into()));
        assert!(!file.parameters[2].required);
        assert_eq!(
            file.return_type,
            TypeDescriptor::Optional(Box::new(TypeDescriptor::Primitive("str".into())))
        );

        let stat = &lib.keywords[3];
        assert_eq!(stat.parameters.len(), 1);
        assert_eq!(stat.parameters[0].name, "value");
    }

    #[test]
    fn enum_parameters_carry_members() {
        let lib = parse_str(CLASS_LIB);
        let paint = &lib.keywords[2];
        match &paint.parameters[0].ty {
            TypeDescriptor::Enum { name, members } => {
                assert_eq!(name, "Color");
                assert_eq!(members.len(), 3);
                assert_eq!(members[0].name, "RED");
                assert_eq!(members[0].value, "\"red\"");
                assert_eq!(members[1].value, "\"green\"");
            }
            other => panic!("expected enum, got {:?}", other),
        }
        assert_eq!(paint.parameters[0].default.as_deref(), Some("Color.RED"));
        assert_eq!(
            paint.parameters[1].ty,
            TypeDescriptor::Optional(Box::new(TypeDescriptor::Primitive("int".into())))
        );
    }

    #[test]
    fn module_library_with_functions() {
        let src = "\"\"\"Utility keywords.\"\"\"\nfrom robot.api import deco\nROBOT_LIBRARY_VERSION = '1.0'\n\n@deco.keyword\ndef say_hello(name='world'):\n    \"\"\"Say hi.\"\"\"\n    print(name)\n\ndef internal():\n    pass\n";
        let lib = parse_str(src);
        assert_eq!(lib.name, "my_lib");
        assert_eq!(lib.version, "1.0");
        assert_eq!(lib.scope, "TEST");
        assert_eq!(lib.description, "Utility keywords.");
        assert_eq!(lib.keyword_count(), 1);
        let kw = &lib.keywords[0];
        assert_eq!(kw.name, "Say Hello");
        assert_eq!(kw.parameters[0].name, "name");
        assert_eq!(kw.parameters[0].default.as_deref(), Some("\"world\""));
        assert_eq!(kw.doc, "Say hi.");
        assert_eq!(kw.line_number, 6);
    }

    #[test]
    fn zero_keywords_is_valid() {
        let lib = parse_str("import os\n\nclass Plain:\n    def run(self):\n        pass\n");
        assert_eq!(lib.name, "my_lib");
        assert_eq!(lib.version, "Unknown");
        assert_eq!(lib.scope, "TEST");
        assert_eq!(lib.keyword_count(), 0);
    }

    #[test]
    fn collisions_last_write_wins_in_place() {
        let src = "@keyword\ndef first():\n    pass\n\n@keyword\ndef second():\n    pass\n\n@keyword('First')\ndef again(x):\n    pass\n";
        let lib = parse_str(src);
        assert_eq!(lib.keyword_count(), 2);
        assert_eq!(lib.keywords[0].name, "First");
        assert_eq!(lib.keywords[0].parameters.len(), 1);
        assert_eq!(lib.keywords[1].name, "Second");
    }

    #[test]
    fn unnameable_keyword_is_error() {
        let err = parse("@keyword\ndef __():\n    pass\n", Path::new("x.py")).unwrap_err();
        assert_eq!(
            err,
            ExtractionError::UnnameableKeyword {
                line: 2,
                identifier: "__".to_string()
            }
        );
        let lib = parse_str("@keyword(name='Named')\ndef _():\n    pass\n");
        assert_eq!(lib.keywords[0].name, "Named");
    }

    #[test]
    fn empty_marker_argument_falls_back_to_identifier() {
        let lib = parse_str("@keyword('')\ndef open_workbook():\n    pass\n\n@keyword()\ndef close_it():\n    pass\n");
        assert_eq!(lib.keywords[0].name, "Open Workbook");
        assert_eq!(lib.keywords[1].name, "Close It");
    }

    #[test]
    fn syntax_error_reports_line() {
        let err = parse("x = 1\n\n@keyword\ndef broken(a,\n", Path::new("x.py")).unwrap_err();
        assert!(matches!(err, ExtractionError::Syntax { line: 4, .. }));
    }

    #[test]
    fn display_names() {
        assert_eq!(display_name("open_workbook").as_deref(), Some("Open Workbook"));
        assert_eq!(display_name("_private__thing_").as_deref(), Some("Private Thing"));
        assert_eq!(display_name("getHTTPStatus").as_deref(), Some("GetHTTPStatus"));
        assert_eq!(display_name("__"), None);
    }
}
