//! Renderer module — trait-based format dispatch.

pub mod html;
pub mod markdown;

use crate::error::AssemblyError;
use crate::markup::MarkupRenderer;
use crate::model::{LibraryInfo, Parameter, TypeDescriptor};

/// Inputs that are not part of the library model.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Shown for `{{generated_at}}`
    pub generated_at: String,
    /// HTML template text; the built-in template when None
    pub template: Option<String>,
}

/// Trait for rendering a LibraryInfo into a specific output format.
pub trait Renderer {
    fn render(&self, lib: &LibraryInfo, markup: &MarkupRenderer) -> Result<String, AssemblyError>;
    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(
    format: &str,
    options: RenderOptions,
) -> Result<Box<dyn Renderer>, AssemblyError> {
    match format {
        "markdown" | "md" => Ok(Box::new(markdown::MarkdownRenderer)),
        "html" => Ok(Box::new(html::HtmlRenderer::new(options))),
        _ => Err(AssemblyError::UnknownFormat(format.to_string())),
    }
}

/// Enum types used by a keyword's parameters, first use only.
fn parameter_enums(params: &[Parameter]) -> Vec<&TypeDescriptor> {
    let mut seen: Vec<&TypeDescriptor> = Vec::new();
    for ty in params.iter().flat_map(|p| p.ty.enums()) {
        if !seen.contains(&ty) {
            seen.push(ty);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EnumMember, Variadic};

    #[test]
    fn unknown_format_is_an_error() {
        let err = create_renderer("json", RenderOptions::default()).err();
        assert_eq!(err, Some(AssemblyError::UnknownFormat("json".into())));
        assert_eq!(
            create_renderer("md", RenderOptions::default()).unwrap().file_extension(),
            "md"
        );
    }

    #[test]
    fn enums_are_listed_once() {
        let color = TypeDescriptor::Enum {
            name: "Color".into(),
            members: vec![EnumMember { name: "RED".into(), value: "\"red\"".into() }],
        };
        let param = |ty: TypeDescriptor| Parameter {
            name: "p".into(),
            ty,
            default: None,
            required: true,
            variadic: Variadic::No,
        };
        let params = vec![
            param(color.clone()),
            param(TypeDescriptor::Optional(Box::new(color.clone()))),
        ];
        assert_eq!(parameter_enums(&params), vec![&color]);
    }
}
