use crate::{
    ast::{AstNode, ExpressionKind},
    error::{ParseError, ParseErrorKind},
    lexer::{Token, TokenKind, tokenize},
};

type ParseResult<T> = Result<T, ParseError>;

/// How a run of sibling nodes ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Termination {
    EndOfInput,
    EndBlock { line: usize },
    Else { line: usize },
}

/// The keyword and arguments of a single `{{ }}` or `{% %}` marker.
struct Marker {
    kind: ExpressionKind,
    keyword: String,
    arguments: Vec<String>,
    line: usize,
}

impl Marker {
    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            line: self.line,
            kind,
        }
    }

    fn expect_no_arguments(&self) -> ParseResult<()> {
        match self.arguments.first() {
            None => Ok(()),
            Some(argument) => Err(self.error(ParseErrorKind::UnexpectedArgument {
                keyword: self.keyword.clone(),
                argument: argument.clone(),
            })),
        }
    }

    /// Takes the one name or path argument, without surrounding quotes.
    fn into_single_argument(self) -> ParseResult<String> {
        let mut arguments = self.arguments.iter();
        match (arguments.next(), arguments.next()) {
            (Some(argument), None) => Ok(strip_quotes(argument).to_string()),
            (None, _) => Err(self.error(ParseErrorKind::MissingArgument {
                keyword: self.keyword.clone(),
            })),
            (Some(_), Some(extra)) => Err(self.error(ParseErrorKind::UnexpectedArgument {
                keyword: self.keyword.clone(),
                argument: extra.clone(),
            })),
        }
    }

    fn into_condition(self) -> ParseResult<Vec<String>> {
        if self.arguments.is_empty() {
            return Err(self.error(ParseErrorKind::MissingArgument {
                keyword: self.keyword.clone(),
            }));
        }
        Ok(self.arguments)
    }
}

fn strip_quotes(argument: &str) -> &str {
    ['"', '\'']
        .into_iter()
        .find_map(|q| {
            argument
                .strip_prefix(q)
                .and_then(|rest| rest.strip_suffix(q))
        })
        .unwrap_or(argument)
}

fn describe(token: &Token) -> String {
    match token.kind {
        TokenKind::ExpressionOpen => "'{{'".to_string(),
        TokenKind::ExpressionClose => "'}}'".to_string(),
        TokenKind::BlockOpen => "'{%'".to_string(),
        TokenKind::BlockClose => "'%}'".to_string(),
        TokenKind::Identifier => format!("'{}'", token.value),
        TokenKind::Content => "content".to_string(),
        TokenKind::Default => "nothing".to_string(),
    }
}

/// Owns the token stream and the cursor shared by every recursive call.
struct Parser {
    tokens: Vec<Token>,
    cursor: usize,
}

impl Parser {
    const fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, cursor: 0 }
    }

    /// Line of the token under the cursor, or of the last token at EOF.
    fn current_line(&self) -> usize {
        self.tokens
            .get(self.cursor)
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.line)
    }

    #[inline]
    fn make_error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            line: self.current_line(),
            kind,
        }
    }

    /// Moves the next token out of the stream and advances the cursor.
    fn next_token(&mut self) -> Option<Token> {
        let token = self.tokens.get_mut(self.cursor)?;
        let taken = Token {
            kind: token.kind,
            value: std::mem::take(&mut token.value),
            line: token.line,
        };
        self.cursor += 1;
        Some(taken)
    }

    fn parse_marker(&mut self, close: TokenKind, line: usize) -> ParseResult<Marker> {
        let keyword = match self.next_token() {
            Some(token) if token.kind == TokenKind::Identifier => token.value,
            Some(token) if token.kind == close => {
                return Err(ParseError {
                    line: token.line,
                    kind: ParseErrorKind::EmptyMarker,
                });
            }
            Some(token) => {
                return Err(ParseError {
                    line: token.line,
                    kind: ParseErrorKind::UnexpectedToken {
                        expected: "keyword or expression".to_string(),
                        found: describe(&token),
                    },
                });
            }
            None => return Err(self.make_error(ParseErrorKind::unexpected_eof(Some("keyword")))),
        };

        let kind = ExpressionKind::from_keyword(&keyword);
        let mut arguments = Vec::new();
        if kind == ExpressionKind::Var {
            arguments.push(keyword.clone());
        }

        loop {
            match self.next_token() {
                Some(token) if token.kind == TokenKind::Identifier => arguments.push(token.value),
                Some(token) if token.kind == close => break,
                Some(token) => {
                    return Err(ParseError {
                        line: token.line,
                        kind: ParseErrorKind::UnexpectedToken {
                            expected: "end of marker".to_string(),
                            found: describe(&token),
                        },
                    });
                }
                None => {
                    return Err(
                        self.make_error(ParseErrorKind::unexpected_eof(Some("end of marker")))
                    );
                }
            }
        }

        Ok(Marker {
            kind,
            keyword,
            arguments,
            line,
        })
    }

    /// Parses sibling nodes until the input ends or an `else`/`endblock`
    /// marker closes the enclosing block.
    fn parse_nodes(&mut self) -> ParseResult<(Vec<AstNode>, Termination)> {
        let mut nodes = Vec::new();

        while let Some(token) = self.next_token() {
            match token.kind {
                TokenKind::Content => nodes.push(AstNode::Content { data: token.value }),
                TokenKind::ExpressionOpen => {
                    let marker = self.parse_marker(TokenKind::ExpressionClose, token.line)?;
                    nodes.push(Self::expression_node(marker)?);
                }
                TokenKind::BlockOpen => {
                    let marker = self.parse_marker(TokenKind::BlockClose, token.line)?;
                    match marker.kind {
                        ExpressionKind::If => nodes.push(self.parse_if(marker)?),
                        ExpressionKind::Insert => nodes.push(self.parse_insert(marker)?),
                        ExpressionKind::Extends => nodes.push(AstNode::Extends {
                            path: marker.into_single_argument()?,
                        }),
                        ExpressionKind::Else => {
                            marker.expect_no_arguments()?;
                            return Ok((nodes, Termination::Else { line: marker.line }));
                        }
                        ExpressionKind::EndBlock => {
                            marker.expect_no_arguments()?;
                            return Ok((nodes, Termination::EndBlock { line: marker.line }));
                        }
                        ExpressionKind::Var
                        | ExpressionKind::Content
                        | ExpressionKind::Template => {
                            return Err(marker.error(ParseErrorKind::UnknownKeyword {
                                keyword: marker.keyword.clone(),
                            }));
                        }
                    }
                }
                TokenKind::ExpressionClose
                | TokenKind::BlockClose
                | TokenKind::Identifier
                | TokenKind::Default => {
                    return Err(ParseError {
                        line: token.line,
                        kind: ParseErrorKind::UnexpectedToken {
                            expected: "content or marker".to_string(),
                            found: describe(&token),
                        },
                    });
                }
            }
        }

        Ok((nodes, Termination::EndOfInput))
    }

    fn expression_node(marker: Marker) -> ParseResult<AstNode> {
        match marker.kind {
            ExpressionKind::Var => Ok(AstNode::Variable {
                arguments: marker.arguments,
            }),
            ExpressionKind::Extends => Ok(AstNode::Extends {
                path: marker.into_single_argument()?,
            }),
            ExpressionKind::If
            | ExpressionKind::Else
            | ExpressionKind::Insert
            | ExpressionKind::EndBlock => Err(marker.error(ParseErrorKind::MisplacedKeyword {
                keyword: marker.keyword.clone(),
            })),
            ExpressionKind::Content | ExpressionKind::Template => {
                Err(marker.error(ParseErrorKind::UnknownKeyword {
                    keyword: marker.keyword.clone(),
                }))
            }
        }
    }

    fn parse_if(&mut self, marker: Marker) -> ParseResult<AstNode> {
        let condition = marker.into_condition()?;

        let (body, end) = self.parse_nodes()?;
        let else_branch = match end {
            Termination::EndBlock { .. } => None,
            Termination::Else { .. } => {
                let (else_body, end) = self.parse_nodes()?;
                match end {
                    Termination::EndBlock { .. } => {
                        Some(Box::new(AstNode::Else { body: else_body }))
                    }
                    Termination::Else { line } => {
                        return Err(ParseError {
                            line,
                            kind: ParseErrorKind::unbalanced(
                                "else",
                                "appears twice in the same if block",
                            ),
                        });
                    }
                    Termination::EndOfInput => {
                        return Err(self
                            .make_error(ParseErrorKind::unexpected_eof(Some("{% endblock %}"))));
                    }
                }
            }
            Termination::EndOfInput => {
                return Err(self.make_error(ParseErrorKind::unexpected_eof(Some(
                    "{% else %} or {% endblock %}",
                ))));
            }
        };

        Ok(AstNode::If {
            condition,
            body,
            else_branch,
        })
    }

    fn parse_insert(&mut self, marker: Marker) -> ParseResult<AstNode> {
        let name = marker.into_single_argument()?;

        let (body, end) = self.parse_nodes()?;
        match end {
            Termination::EndBlock { .. } => Ok(AstNode::Insert { name, body }),
            Termination::Else { line } => Err(ParseError {
                line,
                kind: ParseErrorKind::unbalanced("else", "cannot be used inside an insert block"),
            }),
            Termination::EndOfInput => {
                Err(self.make_error(ParseErrorKind::unexpected_eof(Some("{% endblock %}"))))
            }
        }
    }
}

/// Builds the syntax tree for a token stream, consuming every token.
///
/// # Errors
///
/// Returns a `ParseError` for unknown block keywords, missing or extra
/// marker arguments, and unbalanced `if`/`else`/`endblock` markers.
pub fn build(tokens: Vec<Token>) -> ParseResult<AstNode> {
    let mut parser = Parser::new(tokens);
    let (nodes, end) = parser.parse_nodes()?;

    match end {
        Termination::EndOfInput => Ok(AstNode::Root(nodes)),
        Termination::EndBlock { line } => Err(ParseError {
            line,
            kind: ParseErrorKind::unbalanced("endblock", "has no matching block"),
        }),
        Termination::Else { line } => Err(ParseError {
            line,
            kind: ParseErrorKind::unbalanced("else", "has no matching if"),
        }),
    }
}

/// Tokenizes and parses template source in one step.
///
/// # Errors
///
/// See [`build`].
pub fn parse(source: &str) -> ParseResult<AstNode> {
    build(tokenize(source))
}
