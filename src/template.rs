use crate::ast::AstNode;
use crate::error::TempleResult;
use crate::interface::{Context, OutputBuffers};
use crate::interpreter::{Rendered, interpret};
use crate::parser::parse;

/// A Template represents parsed template source that can be rendered any
/// number of times.
///
/// Templates are created by tokenizing and parsing the source once; the
/// resulting syntax tree is then traversed on every render.
///
/// # Example
///
/// ```rust
/// use temple::{Context, Template};
///
/// // Create a new template
/// let template = Template::new("Hello, {{ name }}!").unwrap();
///
/// // Create a context with variables
/// let context = Context::new().insert("name", "World").to_owned();
///
/// // Render the template
/// let rendered = template.render(Some(&context), None).unwrap();
/// assert_eq!(rendered.buffers.root(), "Hello, World!");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub(crate) ast: AstNode,
}

impl Template {
    /// Parses template source.
    ///
    /// # Errors
    ///
    /// Returns a `TempleError::Parse` error if the template syntax is invalid.
    pub fn new<S: AsRef<str>>(source: S) -> TempleResult<Self> {
        let ast = parse(source.as_ref())?;
        Ok(Self { ast })
    }

    /// The parsed syntax tree.
    pub const fn ast(&self) -> &AstNode {
        &self.ast
    }

    /// Renders the template.
    ///
    /// `insert_values` are the regions of a child template that extends this
    /// one; pass `None` when rendering a template on its own.
    ///
    /// # Errors
    ///
    /// Returns errors in these cases:
    /// * `TempleError::Eval` - If an expression is unsupported or fails
    /// * `TempleError::Inheritance` - If the template extends two parents
    pub fn render(
        &self,
        variables: Option<&Context>,
        insert_values: Option<OutputBuffers>,
    ) -> TempleResult<Rendered> {
        interpret(&self.ast, variables, insert_values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TempleError;

    #[test]
    #[ntest::timeout(100)]
    fn test_render_twice() {
        let template = Template::new("{{ n * 2 }}").unwrap();
        let one = Context::new().insert("n", 1).to_owned();
        let two = Context::new().insert("n", 2).to_owned();
        assert_eq!(template.render(Some(&one), None).unwrap().buffers.root(), "2");
        assert_eq!(template.render(Some(&two), None).unwrap().buffers.root(), "4");
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_parse_error_surfaces() {
        let err = Template::new("{% if a %}").unwrap_err();
        assert!(matches!(err, TempleError::Parse(_)));
    }
}
