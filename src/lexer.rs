/// The kind of a [`Token`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `{{`
    ExpressionOpen,
    /// `}}`
    ExpressionClose,
    /// `{%`
    BlockOpen,
    /// `%}`
    BlockClose,
    /// One whitespace-separated word inside a marker.
    Identifier,
    /// Literal text outside of any marker.
    Content,
    /// Lexer state outside of markers. Never emitted.
    Default,
}

impl TokenKind {
    /// The closing delimiter for an open marker state.
    const fn closing_delimiter(self) -> Option<&'static [u8; 2]> {
        match self {
            Self::ExpressionOpen => Some(b"}}"),
            Self::BlockOpen => Some(b"%}"),
            Self::ExpressionClose
            | Self::BlockClose
            | Self::Identifier
            | Self::Content
            | Self::Default => None,
        }
    }

    const fn closing_kind(self) -> Self {
        match self {
            Self::ExpressionOpen => Self::ExpressionClose,
            Self::BlockOpen => Self::BlockClose,
            Self::ExpressionClose
            | Self::BlockClose
            | Self::Identifier
            | Self::Content
            | Self::Default => self,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    /// Text of content and identifier tokens; empty for delimiters.
    pub value: String,
    /// 1-indexed line the token starts on.
    pub line: usize,
}

impl Token {
    fn new(kind: TokenKind, value: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            value: value.into(),
            line,
        }
    }
}

struct Lexer<'a> {
    text: &'a str,
    tokens: Vec<Token>,
    /// Current lexer state: `Default` or the kind of the open marker.
    state: TokenKind,
    line: usize,
    /// Start of the pending content span, or of the open marker's interior.
    span_start: usize,
    span_line: usize,
    /// Position and line of the open marker's delimiter.
    marker_start: usize,
    marker_line: usize,
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Self {
        Lexer {
            text,
            tokens: Vec::new(),
            state: TokenKind::Default,
            line: 1,
            span_start: 0,
            span_line: 1,
            marker_start: 0,
            marker_line: 1,
        }
    }

    fn slice(&self, start: usize, end: usize) -> &'a str {
        self.text.get(start..end).unwrap_or_default()
    }

    fn flush_content(&mut self, end: usize) {
        if end > self.span_start {
            let data = self.slice(self.span_start, end);
            self.tokens
                .push(Token::new(TokenKind::Content, data, self.span_line));
        }
    }

    fn run(mut self) -> Vec<Token> {
        let bytes = self.text.as_bytes();
        let mut pos = 0;

        while let Some(&current) = bytes.get(pos) {
            let next = bytes.get(pos + 1).copied();
            match self.state.closing_delimiter() {
                None => {
                    let opened = match (current, next) {
                        (b'{', Some(b'{')) => Some(TokenKind::ExpressionOpen),
                        (b'{', Some(b'%')) => Some(TokenKind::BlockOpen),
                        _ => None,
                    };
                    if let Some(kind) = opened {
                        self.flush_content(pos);
                        self.state = kind;
                        self.marker_start = pos;
                        self.marker_line = self.line;
                        pos += 2;
                        self.span_start = pos;
                        continue;
                    }
                }
                Some(delimiter) => {
                    if current == delimiter[0] && next == Some(delimiter[1]) {
                        self.close_marker(pos);
                        pos += 2;
                        self.span_start = pos;
                        self.span_line = self.line;
                        continue;
                    }
                }
            }

            if current == b'\n' {
                self.line += 1;
            }
            pos += 1;
        }

        // An unterminated marker is kept as literal text.
        if self.state != TokenKind::Default {
            self.span_start = self.marker_start;
            self.span_line = self.marker_line;
        }
        self.flush_content(bytes.len());
        self.tokens
    }

    fn close_marker(&mut self, end: usize) {
        let open = self.state;
        let line = self.marker_line;
        let interior = self.slice(self.span_start, end);

        self.tokens.push(Token::new(open, "", line));
        for word in split_words(interior) {
            self.tokens.push(Token::new(TokenKind::Identifier, word, line));
        }
        self.tokens.push(Token::new(open.closing_kind(), "", line));
        self.state = TokenKind::Default;
    }
}

/// Splits a marker's interior on whitespace, keeping quoted string literals
/// (and any whitespace inside them) within a single word.
fn split_words(interior: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut start: Option<usize> = None;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (idx, c) in interior.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        if c.is_whitespace() {
            if let Some(s) = start.take() {
                words.push(interior.get(s..idx).unwrap_or_default());
            }
            continue;
        }

        if start.is_none() {
            start = Some(idx);
        }
        if c == '\'' || c == '"' {
            quote = Some(c);
        }
    }

    if let Some(s) = start {
        words.push(interior.get(s..).unwrap_or_default());
    }
    words
}

/// Converts template source into an ordered token stream.
///
/// Tokenizing never fails: a marker that is never closed is emitted as
/// trailing content.
pub fn tokenize(text: &str) -> Vec<Token> {
    Lexer::new(text).run()
}
