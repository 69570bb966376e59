mod ast;
mod build;
mod engine;
mod error;
mod eval;
mod interface;
mod interpreter;
mod lexer;
mod loader;
mod parser;
mod template;

// Public exports.
pub use ast::{AstNode, ExpressionKind, NodeKind};
pub use build::{BuildConfig, BuildFailure, BuildReport, build};
pub use engine::Engine;
pub use error::{EvalError, InheritanceError, ParseError, ParseErrorKind, TempleError, TempleResult};
pub use eval::evaluate;
pub use interface::{Context, Loader, OutputBuffers, Value};
pub use interpreter::{Interpreter, Rendered, interpret};
pub use lexer::{Token, TokenKind, tokenize};
pub use loader::{FileLoader, MemoryLoader};
pub use parser::{build as build_ast, parse};
pub use template::Template;
