use crate::ast::AstNode;
use crate::error::{InheritanceError, TempleResult};
use crate::eval::evaluate;
use crate::interface::{Context, OutputBuffers, Value};

/// The outcome of one traversal: the assembled regions and the parent the
/// template extends, if any.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Rendered {
    pub buffers: OutputBuffers,
    pub extends: Option<String>,
}

/// `Interpreter` walks a syntax tree and assembles named output buffers.
///
/// When `insert_values` is `None` the template is treated as a child (or a
/// standalone document): each insertion block is rendered into a buffer of
/// its own name, to be picked up by whichever parent extends it. When
/// `insert_values` is supplied the template is acting as a parent, and its
/// insertion points are filled from those values.
pub struct Interpreter<'a> {
    variables: Option<&'a Context>,
    insert_values: Option<OutputBuffers>,
    buffers: OutputBuffers,
    extends: Option<String>,
}

impl<'a> Interpreter<'a> {
    pub fn new(variables: Option<&'a Context>, insert_values: Option<OutputBuffers>) -> Self {
        Self {
            variables,
            insert_values,
            buffers: OutputBuffers::new(),
            extends: None,
        }
    }

    fn evaluate(&self, arguments: &[String]) -> TempleResult<Value> {
        Ok(evaluate(&arguments.join(" "), self.variables)?)
    }

    /// Renders `node` into the buffer named `key`.
    ///
    /// # Errors
    ///
    /// Fails if an expression cannot be evaluated, or if the template names
    /// two different parents.
    pub fn traverse(&mut self, node: &AstNode, key: &str) -> TempleResult<()> {
        self.buffers.ensure(key);

        match node {
            AstNode::Content { data } => self.buffers.append(key, data),
            AstNode::Variable { arguments } => {
                let value = self.evaluate(arguments)?;
                self.buffers.append(key, &value.to_string());
            }
            AstNode::Extends { path } => self.record_parent(path)?,
            AstNode::Root(children) | AstNode::Else { body: children } => {
                for child in children {
                    self.traverse(child, key)?;
                }
            }
            AstNode::If {
                condition,
                body,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    for child in body {
                        self.traverse(child, key)?;
                    }
                } else if let Some(else_node) = else_branch {
                    self.traverse(else_node, key)?;
                }
            }
            AstNode::Insert { name, body } => self.visit_insert(name, body, key)?,
        }
        Ok(())
    }

    fn visit_insert(&mut self, name: &str, body: &[AstNode], key: &str) -> TempleResult<()> {
        let supplied = self
            .insert_values
            .as_ref()
            .map(|values| values.get(name).map(str::to_string));

        match supplied {
            // A parent with a matching child region.
            Some(Some(value)) => {
                self.buffers.ensure(name);
                self.buffers.append(key, &value);
            }
            // A parent the child left unfilled: nothing reaches `key`, but the
            // body is collected as a region a grandparent can consume.
            Some(None) => {
                self.buffers.ensure(name);
                if name != key {
                    for child in body {
                        self.traverse(child, name)?;
                    }
                }
            }
            // A child: collect the region for the parent to consume.
            None => {
                self.buffers.ensure(name);
                for child in body {
                    self.traverse(child, name)?;
                }
            }
        }
        Ok(())
    }

    fn record_parent(&mut self, path: &str) -> TempleResult<()> {
        match &self.extends {
            Some(first) if first != path => Err(InheritanceError::MultipleParents {
                first: first.clone(),
                second: path.to_string(),
            }
            .into()),
            Some(_) => Ok(()),
            None => {
                self.extends = Some(path.to_string());
                Ok(())
            }
        }
    }

    pub fn finish(self) -> Rendered {
        Rendered {
            buffers: self.buffers,
            extends: self.extends,
        }
    }
}

/// Traverses a whole template from its root into the `"root"` buffer.
///
/// # Errors
///
/// See [`Interpreter::traverse`].
pub fn interpret(
    root: &AstNode,
    variables: Option<&Context>,
    insert_values: Option<OutputBuffers>,
) -> TempleResult<Rendered> {
    let mut interpreter = Interpreter::new(variables, insert_values);
    interpreter.traverse(root, OutputBuffers::ROOT)?;
    Ok(interpreter.finish())
}
