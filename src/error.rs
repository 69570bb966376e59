use thiserror::Error;

pub type TempleResult<T> = std::result::Result<T, TempleError>;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum ParseErrorKind {
    #[error("Expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },
    #[error("Unexpected EOF{expected_what}")]
    UnexpectedEof {
        /// Describes what was expected, e.g., " (expected '{% endblock %}')"
        expected_what: String,
    },
    #[error("Unknown keyword '{keyword}'")]
    UnknownKeyword { keyword: String },
    #[error("'{keyword}' must be written inside '{{% %}}'")]
    MisplacedKeyword { keyword: String },
    #[error("Empty marker")]
    EmptyMarker,
    #[error("'{keyword}' requires an argument")]
    MissingArgument { keyword: String },
    #[error("Unexpected argument '{argument}' after '{keyword}'")]
    UnexpectedArgument { keyword: String, argument: String },
    #[error("'{keyword}' {reason}")]
    Unbalanced { keyword: String, reason: String },
}

impl ParseErrorKind {
    pub fn unexpected_eof(expected: Option<&str>) -> Self {
        Self::UnexpectedEof {
            expected_what: expected.map_or_else(String::new, |e| format!(" (expected '{}')", e)),
        }
    }

    pub(crate) fn unbalanced(keyword: &str, reason: &str) -> Self {
        Self::Unbalanced {
            keyword: keyword.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("Parse error at line {line}: {kind}")]
pub struct ParseError {
    pub line: usize,
    #[source]
    pub kind: ParseErrorKind,
}

/// Failures raised while parsing or evaluating a restricted expression.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum EvalError {
    #[error("Invalid expression at column {column}: {message}")]
    Syntax { message: String, column: usize },
    #[error("Unsupported expression syntax: {construct}")]
    Unsupported { construct: String },
    #[error("Unsupported operand types for {operator}: {left} and {right}")]
    TypeMismatch {
        operator: String,
        left: String,
        right: String,
    },
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Integer overflow in {operator}")]
    Overflow { operator: String },
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum InheritanceError {
    #[error("Parent template '{reference}' extended by '{from}' could not be resolved: {reason}")]
    Unresolvable {
        reference: String,
        from: String,
        reason: String,
    },
    #[error("Template inheritance cycle: {}", chain.join(" -> "))]
    Cycle { chain: Vec<String> },
    #[error("Template extends both '{first}' and '{second}'")]
    MultipleParents { first: String, second: String },
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum TempleError {
    #[error("Template already exists: {template_name}")]
    TemplateExists { template_name: String },
    #[error("Template not found: {template_name}")]
    MissingTemplate { template_name: String },
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },
    #[error("Invalid glob pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error(transparent)]
    Inheritance(#[from] InheritanceError),
}

impl TempleError {
    pub(crate) fn io(path: impl AsRef<std::path::Path>, error: &std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ntest::timeout(100)]
    fn test_parse_error_display_includes_line() {
        let err = ParseError {
            line: 3,
            kind: ParseErrorKind::unexpected_eof(Some("{% endblock %}")),
        };
        assert_eq!(
            err.to_string(),
            "Parse error at line 3: Unexpected EOF (expected '{% endblock %}')"
        );
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_cycle_display_joins_chain() {
        let err = TempleError::from(InheritanceError::Cycle {
            chain: vec!["a.html".into(), "b.html".into(), "a.html".into()],
        });
        assert_eq!(
            err.to_string(),
            "Template inheritance cycle: a.html -> b.html -> a.html"
        );
    }

    #[test]
    #[ntest::timeout(100)]
    fn test_misplaced_keyword_display() {
        let kind = ParseErrorKind::MisplacedKeyword {
            keyword: "if".to_string(),
        };
        assert_eq!(kind.to_string(), "'if' must be written inside '{% %}'");
    }
}
