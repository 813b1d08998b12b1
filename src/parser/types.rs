//! Type normalizer, annotation text to `TypeDescriptor`.

use crate::model::{EnumMember, TypeDescriptor};
use crate::parser::annotation::{parse_annotation, TypeExpr};
use crate::parser::signature::collapse_whitespace;
use std::collections::HashMap;

/// Enum classes declared in the library source, by class name.
pub type EnumRegistry = HashMap<String, Vec<EnumMember>>;

/// Names that stand for themselves when used without subscripts.
const PRIMITIVES: &[&str] = &[
    "str", "int", "float", "bool", "bytes", "bytearray", "complex", "object", "list", "dict",
    "tuple", "set", "frozenset", "List", "Dict", "Tuple", "Set", "FrozenSet", "Sequence",
    "Mapping", "Iterable",
];

const LIST_LIKE: &[&str] = &["List", "list", "Sequence", "Iterable"];
const DICT_LIKE: &[&str] = &["Dict", "dict", "Mapping"];

/// Module prefixes that do not change what a name means.
const QUALIFIERS: &[&str] = &["typing.", "t.", "typing_extensions.", "collections.abc."];

pub struct TypeNormalizer<'a> {
    enums: &'a EnumRegistry,
}

impl<'a> TypeNormalizer<'a> {
    pub fn new(enums: &'a EnumRegistry) -> Self {
        TypeNormalizer { enums }
    }

    /// Normalize an annotation; absent annotations are `Any`.
    pub fn normalize(&self, annotation: Option<&str>) -> TypeDescriptor {
        let Some(text) = annotation.map(str::trim).filter(|t| !t.is_empty()) else {
            return TypeDescriptor::Unknown("Any".to_string());
        };
        match parse_annotation(text) {
            Some(expr) => self.convert(&expr),
            None => TypeDescriptor::Unknown(collapse_whitespace(text)),
        }
    }

    fn convert(&self, expr: &TypeExpr) -> TypeDescriptor {
        match expr {
            TypeExpr::NoneLit => TypeDescriptor::Unknown("None".to_string()),
            TypeExpr::Name(name) => self.convert_name(name),
            TypeExpr::Str(_, Some(inner)) => self.convert(inner),
            TypeExpr::BitOr(alts) => union_of(alts.iter().map(|a| self.convert(a)).collect()),
            TypeExpr::Subscript(base, args) => self.convert_subscript(base, args, expr),
            _ => TypeDescriptor::Unknown(expr.to_string()),
        }
    }

    fn convert_name(&self, name: &str) -> TypeDescriptor {
        if let Some(members) = self.enums.get(name) {
            return TypeDescriptor::Enum {
                name: name.to_string(),
                members: members.clone(),
            };
        }
        let bare = unqualified(name);
        if let Some(members) = self.enums.get(bare) {
            return TypeDescriptor::Enum {
                name: bare.to_string(),
                members: members.clone(),
            };
        }
        match bare {
            "Any" => TypeDescriptor::Unknown("Any".to_string()),
            "NoneType" => TypeDescriptor::Unknown("None".to_string()),
            _ if PRIMITIVES.contains(&bare) => TypeDescriptor::Primitive(bare.to_string()),
            _ => TypeDescriptor::Unknown(name.to_string()),
        }
    }

    fn convert_subscript(&self, base: &str, args: &[TypeExpr], whole: &TypeExpr) -> TypeDescriptor {
        let base = unqualified(base);
        match (base, args) {
            ("Optional", [inner]) => make_optional(self.convert(inner)),
            ("Union", alts) => union_of(alts.iter().map(|a| self.convert(a)).collect()),
            (b, [inner]) if LIST_LIKE.contains(&b) => {
                TypeDescriptor::ListOf(Box::new(self.convert(inner)))
            }
            (b, [key, value]) if DICT_LIKE.contains(&b) => TypeDescriptor::DictOf(
                Box::new(self.convert(key)),
                Box::new(self.convert(value)),
            ),
            _ => TypeDescriptor::Unknown(whole.to_string()),
        }
    }
}

fn unqualified(name: &str) -> &str {
    QUALIFIERS
        .iter()
        .find_map(|q| name.strip_prefix(q))
        .unwrap_or(name)
}

/// Wrap in `Optional` unless already optional or `None` itself.
fn make_optional(ty: TypeDescriptor) -> TypeDescriptor {
    match ty {
        TypeDescriptor::Optional(_) => ty,
        _ if ty.is_none() => ty,
        _ => TypeDescriptor::Optional(Box::new(ty)),
    }
}

/// Collapse union alternatives: flatten nested unions and optionals, drop
/// duplicates, pull `None` out into an `Optional` wrapper.
fn union_of(alternatives: Vec<TypeDescriptor>) -> TypeDescriptor {
    let mut flat: Vec<TypeDescriptor> = Vec::new();
    let mut has_none = false;
    let mut pending = alternatives;
    pending.reverse();
    while let Some(alt) = pending.pop() {
        match alt {
            TypeDescriptor::Union(inner) => pending.extend(inner.into_iter().rev()),
            TypeDescriptor::Optional(inner) => {
                has_none = true;
                pending.push(*inner);
            }
            ty if ty.is_none() => has_none = true,
            ty => {
                if !flat.contains(&ty) {
                    flat.push(ty);
                }
            }
        }
    }

    let collapsed = match flat.len() {
        0 => return TypeDescriptor::default(),
        1 => flat.remove(0),
        _ => TypeDescriptor::Union(flat),
    };
    if has_none {
        make_optional(collapsed)
    } else {
        collapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> EnumRegistry {
        let mut enums = EnumRegistry::new();
        enums.insert(
            "Color".to_string(),
            vec![
                EnumMember { name: "RED".into(), value: "\"red\"".into() },
                EnumMember { name: "GREEN".into(), value: "\"green\"".into() },
            ],
        );
        enums
    }

    fn prim(name: &str) -> TypeDescriptor {
        TypeDescriptor::Primitive(name.to_string())
    }

    fn norm(text: &str) -> TypeDescriptor {
        let enums = registry();
        TypeNormalizer::new(&enums).normalize(Some(text))
    }

    #[test]
    fn absent_any_and_none() {
        let enums = registry();
        let n = TypeNormalizer::new(&enums);
        assert_eq!(n.normalize(None), TypeDescriptor::Unknown("Any".into()));
        assert_eq!(n.normalize(Some("Any")), TypeDescriptor::Unknown("Any".into()));
        assert_eq!(n.normalize(Some("typing.Any")), TypeDescriptor::Unknown("Any".into()));
        assert!(n.normalize(Some("None")).is_none());
    }

    #[test]
    fn primitives_and_bare_containers() {
        assert_eq!(norm("str"), prim("str"));
        assert_eq!(norm("typing.List"), prim("List"));
        assert_eq!(norm("dict"), prim("dict"));
    }

    #[test]
    fn enum_from_registry_and_forward_reference() {
        match norm("'Color'") {
            TypeDescriptor::Enum { name, members } => {
                assert_eq!(name, "Color");
                assert_eq!(members.len(), 2);
                assert_eq!(members[0].value, "\"red\"");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn optional_never_double_wrapped() {
        let expected = TypeDescriptor::Optional(Box::new(prim("int")));
        assert_eq!(norm("Optional[int]"), expected);
        assert_eq!(norm("Optional[Optional[int]]"), expected);
        assert_eq!(norm("t.Optional[int | None]"), expected);
        assert_eq!(norm("Union[int, None]"), expected);
        assert_eq!(norm("int | None"), expected);
    }

    #[test]
    fn union_flattens_and_pulls_out_none() {
        assert_eq!(
            norm("Union[int, Union[str, float]]"),
            TypeDescriptor::Union(vec![prim("int"), prim("str"), prim("float")])
        );
        assert_eq!(
            norm("Union[int, str, None]"),
            TypeDescriptor::Optional(Box::new(TypeDescriptor::Union(vec![
                prim("int"),
                prim("str")
            ])))
        );
        assert_eq!(norm("Union[int, int]"), prim("int"));
    }

    #[test]
    fn generics() {
        assert_eq!(norm("List[str]"), TypeDescriptor::ListOf(Box::new(prim("str"))));
        assert_eq!(
            norm("Dict[str, List[Color]]"),
            TypeDescriptor::DictOf(
                Box::new(prim("str")),
                Box::new(TypeDescriptor::ListOf(Box::new(TypeDescriptor::Enum {
                    name: "Color".into(),
                    members: registry()["Color"].clone(),
                })))
            )
        );
    }

    #[test]
    fn unrecognized_keeps_collapsed_text() {
        assert_eq!(norm("Tuple[int,   str]"), TypeDescriptor::Unknown("Tuple[int, str]".into()));
        assert_eq!(
            norm("Callable[..., int]"),
            TypeDescriptor::Unknown("Callable[..., int]".into())
        );
        assert_eq!(norm("lambda: 1"), TypeDescriptor::Unknown("lambda: 1".into()));
        assert_eq!(norm("MyClass"), TypeDescriptor::Unknown("MyClass".into()));
    }

    #[test]
    fn normalize_is_idempotent_over_display() {
        for text in [
            "Optional[int]",
            "Union[int, str, None]",
            "int | str",
            "Dict[str, Optional[Color]]",
            "List[Any]",
            "Tuple[int, str]",
            "Color",
            "Sequence[float]",
            "None",
        ] {
            let once = norm(text);
            let twice = norm(&once.to_string());
            assert_eq!(once, twice, "not idempotent for {}", text);
        }
    }
}
