/// The structural role of a node in the tree.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Content,
    Expression,
    Block,
    Template,
}

/// The marker keyword a node was built from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ExpressionKind {
    If,
    Else,
    Insert,
    Extends,
    EndBlock,
    Content,
    Template,
    Var,
}

impl ExpressionKind {
    /// Classifies the first word of a marker. Anything that is not a reserved
    /// word is the start of a variable expression.
    pub fn from_keyword(word: &str) -> Self {
        match word {
            "if" => Self::If,
            "else" => Self::Else,
            // `block` is how a child template spells the region it fills.
            "insert" | "block" => Self::Insert,
            "extends" => Self::Extends,
            "endblock" => Self::EndBlock,
            _ => Self::Var,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstNode {
    /// The template itself.
    Root(Vec<AstNode>),
    /// Literal text copied to the output unchanged.
    Content { data: String },
    /// `{{ expression }}`, kept as the raw whitespace-split fragments.
    Variable { arguments: Vec<String> },
    /// `{% extends path %}`
    Extends { path: String },
    /// `{% if condition %} body [{% else %} ...] {% endblock %}`
    If {
        condition: Vec<String>,
        body: Vec<AstNode>,
        /// Always an [`AstNode::Else`].
        else_branch: Option<Box<AstNode>>,
    },
    /// The body of an `{% else %}`; only found as an `If`'s else branch.
    Else { body: Vec<AstNode> },
    /// `{% insert name %} body {% endblock %}`
    Insert { name: String, body: Vec<AstNode> },
}

impl AstNode {
    pub const fn node_kind(&self) -> NodeKind {
        match self {
            Self::Root(_) => NodeKind::Template,
            Self::Content { .. } => NodeKind::Content,
            Self::Variable { .. } | Self::Extends { .. } => NodeKind::Expression,
            Self::If { .. } | Self::Else { .. } | Self::Insert { .. } => NodeKind::Block,
        }
    }

    pub const fn expression_kind(&self) -> ExpressionKind {
        match self {
            Self::Root(_) => ExpressionKind::Template,
            Self::Content { .. } => ExpressionKind::Content,
            Self::Variable { .. } => ExpressionKind::Var,
            Self::Extends { .. } => ExpressionKind::Extends,
            Self::If { .. } => ExpressionKind::If,
            Self::Else { .. } => ExpressionKind::Else,
            Self::Insert { .. } => ExpressionKind::Insert,
        }
    }

    /// Child nodes in document order. The else branch is not a child.
    pub fn children(&self) -> &[AstNode] {
        match self {
            Self::Root(children)
            | Self::If { body: children, .. }
            | Self::Else { body: children }
            | Self::Insert { body: children, .. } => children,
            Self::Content { .. } | Self::Variable { .. } | Self::Extends { .. } => &[],
        }
    }
}
