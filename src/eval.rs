//! The restricted expression evaluator.
//!
//! Expressions may only contain literals (numbers, strings, booleans),
//! variable names, arithmetic (`+ - * / % **`), unary sign operators and
//! comparisons (`== != < <= > >=`, chainable). Anything else is rejected
//! before evaluation starts, so no expression can call into host code.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::EvalError;
use crate::interface::{Context, Value};

type EvalResult<T> = Result<T, EvalError>;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum UnaryOp {
    Plus,
    Minus,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

impl BinaryOp {
    const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Pow => "**",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
}

impl CompareOp {
    const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtE => "<=",
            Self::Gt => ">",
            Self::GtE => ">=",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Literal(Value),
    Name(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    /// `a < b <= c`: every adjacent pair must hold.
    Compare {
        first: Box<Expr>,
        rest: Vec<(CompareOp, Expr)>,
    },
}

// --- Tokenizing ---

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    Int(i64),
    Float(f64),
    Str(String),
    Name(String),
    /// An operator or punctuation, supported or not.
    Punct(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
struct Spanned {
    tok: Tok,
    /// 1-indexed character column.
    column: usize,
}

/// Longest first, so that `**` wins over `*`.
const PUNCTUATION: &[&str] = &[
    "**=", "//=", ">>=", "<<=", "**", "//", "==", "!=", "<=", ">=", ":=", "<<", ">>", "->", "+=",
    "-=", "*=", "/=", "%=", "+", "-", "*", "/", "%", "<", ">", "(", ")", "[", "]", "{", "}", ",",
    ".", ":", ";", "=", "&", "|", "^", "~", "@", "!",
];

struct ExprLexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> ExprLexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
        }
    }

    /// Only used on error paths, which end lexing.
    fn column(&self, byte_pos: usize) -> usize {
        self.source
            .get(..byte_pos)
            .map_or(0, |s| s.chars().count())
            + 1
    }

    fn syntax_error(&self, message: impl Into<String>, byte_pos: usize) -> EvalError {
        EvalError::Syntax {
            message: message.into(),
            column: self.column(byte_pos),
        }
    }

    fn tokens(mut self) -> EvalResult<Vec<Spanned>> {
        let mut tokens = Vec::new();
        // Byte position and column of the previous token, so columns are
        // counted forward from there rather than from the start.
        let mut counted = (0, 1);
        while let Some(&(pos, c)) = self.chars.peek() {
            let tok = if c.is_whitespace() {
                self.chars.next();
                continue;
            } else if c.is_ascii_digit()
                || (c == '.' && self.source.get(pos + 1..).is_some_and(starts_with_digit))
            {
                self.number(pos)?
            } else if c == '\'' || c == '"' {
                self.string(pos, c)?
            } else if c.is_alphabetic() || c == '_' {
                Tok::Name(self.name(pos).to_string())
            } else {
                self.punct(pos, c)?
            };
            let column = counted.1
                + self
                    .source
                    .get(counted.0..pos)
                    .map_or(0, |s| s.chars().count());
            counted = (pos, column);
            tokens.push(Spanned { tok, column });
        }
        Ok(tokens)
    }

    fn take_while(&mut self, start: usize, pred: impl Fn(char) -> bool) -> &'a str {
        let mut end = start;
        while let Some(&(pos, c)) = self.chars.peek() {
            if !pred(c) {
                break;
            }
            end = pos + c.len_utf8();
            self.chars.next();
        }
        self.source.get(start..end).unwrap_or_default()
    }

    fn name(&mut self, start: usize) -> &'a str {
        self.take_while(start, |c| c.is_alphanumeric() || c == '_')
    }

    fn number(&mut self, start: usize) -> EvalResult<Tok> {
        let mut end = start;
        let mut is_float = false;
        let mut seen_exponent = false;
        let mut previous = ' ';

        while let Some(&(pos, c)) = self.chars.peek() {
            let accept = match c {
                '0'..='9' => true,
                '.' if !is_float && !seen_exponent => {
                    is_float = true;
                    true
                }
                'e' | 'E' if !seen_exponent => {
                    seen_exponent = true;
                    is_float = true;
                    true
                }
                '+' | '-' => matches!(previous, 'e' | 'E'),
                _ => false,
            };
            if !accept {
                break;
            }
            previous = c;
            end = pos + c.len_utf8();
            self.chars.next();
        }

        // `1abc` or `1.2.3` are malformed rather than two tokens.
        if let Some(&(pos, c)) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' || c == '.' {
                return Err(self.syntax_error(format!("invalid number literal near '{}'", c), pos));
            }
        }

        let text = self.source.get(start..end).unwrap_or_default();
        if is_float {
            text.parse::<f64>()
                .map(Tok::Float)
                .map_err(|_| self.syntax_error(format!("invalid number literal '{}'", text), start))
        } else {
            text.parse::<i64>().map(Tok::Int).map_err(|_| EvalError::Overflow {
                operator: "integer literal".to_string(),
            })
        }
    }

    fn string(&mut self, start: usize, quote: char) -> EvalResult<Tok> {
        self.chars.next();
        let mut value = String::new();
        loop {
            let Some((_, c)) = self.chars.next() else {
                return Err(self.syntax_error("unterminated string literal", start));
            };
            match c {
                '\\' => {
                    let Some((_, escaped)) = self.chars.next() else {
                        return Err(self.syntax_error("unterminated string literal", start));
                    };
                    match escaped {
                        'n' => value.push('\n'),
                        't' => value.push('\t'),
                        'r' => value.push('\r'),
                        '0' => value.push('\0'),
                        '\\' | '\'' | '"' => value.push(escaped),
                        other => {
                            value.push('\\');
                            value.push(other);
                        }
                    }
                }
                c if c == quote => return Ok(Tok::Str(value)),
                c => value.push(c),
            }
        }
    }

    fn punct(&mut self, pos: usize, c: char) -> EvalResult<Tok> {
        let rest = self.source.get(pos..).unwrap_or_default();
        let Some(symbol) = PUNCTUATION.iter().find(|p| rest.starts_with(**p)) else {
            return Err(self.syntax_error(format!("unexpected character '{}'", c), pos));
        };
        for _ in 0..symbol.len() {
            self.chars.next();
        }
        Ok(Tok::Punct(*symbol))
    }
}

fn starts_with_digit(s: &str) -> bool {
    s.chars().next().is_some_and(|c| c.is_ascii_digit())
}

/// Names the construct an unsupported operator or keyword would introduce.
fn unsupported_punct(symbol: &str) -> Option<&'static str> {
    Some(match symbol {
        "//" => "floor division",
        "&" | "|" | "^" | "~" | "<<" | ">>" => "bitwise operator",
        "@" => "matrix multiplication",
        "=" | "+=" | "-=" | "*=" | "/=" | "%=" | "**=" | "//=" | ">>=" | "<<=" => "assignment",
        ":=" => "assignment expression",
        "[" => "list literal",
        "{" => "dict or set literal",
        "," => "tuple",
        "." => "attribute access",
        "!" => "boolean operator",
        ":" | ";" | "->" => "statement syntax",
        _ => return None,
    })
}

fn unsupported_keyword(name: &str) -> Option<&'static str> {
    Some(match name {
        "and" | "or" | "not" => "boolean operator",
        "is" | "in" => "identity or membership test",
        "lambda" => "lambda",
        "if" | "else" => "conditional expression",
        "await" | "yield" => "generator or coroutine",
        "for" | "while" | "import" | "from" | "def" | "class" | "return" | "del" | "global"
        | "nonlocal" | "assert" | "pass" | "break" | "continue" | "raise" | "try" | "except"
        | "finally" | "with" | "as" | "async" | "elif" => "keyword",
        _ => return None,
    })
}

fn unsupported(construct: impl Into<String>) -> EvalError {
    EvalError::Unsupported {
        construct: construct.into(),
    }
}

// --- Parsing ---

struct ExprParser {
    tokens: Vec<Spanned>,
    cursor: usize,
    /// Column just past the end of the source, for errors at EOF.
    end_column: usize,
}

impl ExprParser {
    fn peek(&self) -> Option<&Tok> {
        self.tokens.get(self.cursor).map(|s| &s.tok)
    }

    fn peek_punct(&self) -> Option<&'static str> {
        match self.peek() {
            Some(Tok::Punct(p)) => Some(*p),
            _ => None,
        }
    }

    fn column(&self) -> usize {
        self.tokens
            .get(self.cursor)
            .map_or(self.end_column, |s| s.column)
    }

    fn advance(&mut self) -> Option<Tok> {
        let tok = self.tokens.get(self.cursor).map(|s| s.tok.clone());
        if tok.is_some() {
            self.cursor += 1;
        }
        tok
    }

    fn syntax_error(&self, message: impl Into<String>) -> EvalError {
        EvalError::Syntax {
            message: message.into(),
            column: self.column(),
        }
    }

    /// Rejects a token that cannot start or continue the current
    /// expression, naming the construct where it is recognised.
    fn reject(&self, tok: &Tok) -> EvalError {
        match tok {
            Tok::Punct(p) => unsupported_punct(p).map_or_else(
                || self.syntax_error(format!("unexpected '{}'", p)),
                |construct| unsupported(format!("{} '{}'", construct, p)),
            ),
            Tok::Name(name) => unsupported_keyword(name).map_or_else(
                || self.syntax_error(format!("unexpected name '{}'", name)),
                |construct| unsupported(format!("{} '{}'", construct, name)),
            ),
            Tok::Int(_) | Tok::Float(_) | Tok::Str(_) => {
                self.syntax_error("unexpected literal")
            }
        }
    }

    fn parse(mut self) -> EvalResult<Expr> {
        if self.tokens.is_empty() {
            return Err(self.syntax_error("empty expression"));
        }
        let expr = self.parse_comparison()?;
        match self.peek() {
            None => Ok(expr),
            Some(tok) => Err(self.reject(tok)),
        }
    }

    fn parse_comparison(&mut self) -> EvalResult<Expr> {
        let first = self.parse_arith()?;
        let mut rest = Vec::new();
        while let Some(op) = self.peek_punct().and_then(compare_op) {
            self.advance();
            rest.push((op, self.parse_arith()?));
        }
        if rest.is_empty() {
            Ok(first)
        } else {
            Ok(Expr::Compare {
                first: Box::new(first),
                rest,
            })
        }
    }

    fn parse_arith(&mut self) -> EvalResult<Expr> {
        let mut left = self.parse_term()?;
        loop {
            let op = match self.peek_punct() {
                Some("+") => BinaryOp::Add,
                Some("-") => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> EvalResult<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek_punct() {
                Some("*") => BinaryOp::Mul,
                Some("/") => BinaryOp::Div,
                Some("%") => BinaryOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> EvalResult<Expr> {
        let op = match self.peek_punct() {
            Some("+") => UnaryOp::Plus,
            Some("-") => UnaryOp::Minus,
            _ => return self.parse_power(),
        };
        self.advance();
        let operand = self.parse_unary()?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_power(&mut self) -> EvalResult<Expr> {
        let base = self.parse_postfix()?;
        if self.peek_punct() == Some("**") {
            self.advance();
            // Right associative, and binds tighter than a unary on its left:
            // `-2 ** 2` is `-(2 ** 2)`.
            let exponent = self.parse_unary()?;
            return Ok(Expr::Binary {
                left: Box::new(base),
                op: BinaryOp::Pow,
                right: Box::new(exponent),
            });
        }
        Ok(base)
    }

    /// An atom, rejecting calls, attribute access and subscripts after it.
    fn parse_postfix(&mut self) -> EvalResult<Expr> {
        let atom = self.parse_atom()?;
        match self.peek_punct() {
            Some("(") => Err(unsupported(match &atom {
                Expr::Name(name) => format!("function call '{}(...)'", name),
                _ => "function call".to_string(),
            })),
            Some(".") => Err(unsupported("attribute access '.'")),
            Some("[") => Err(unsupported("subscript '[...]'")),
            _ => Ok(atom),
        }
    }

    fn parse_atom(&mut self) -> EvalResult<Expr> {
        let Some(tok) = self.peek().cloned() else {
            return Err(self.syntax_error("unexpected end of expression"));
        };
        match tok {
            Tok::Int(i) => {
                self.advance();
                Ok(Expr::Literal(Value::Int(i)))
            }
            Tok::Float(f) => {
                self.advance();
                Ok(Expr::Literal(Value::Float(f)))
            }
            Tok::Str(s) => {
                self.advance();
                // Adjacent literals concatenate, as in `'a' 'b'`.
                let mut value = s;
                while let Some(Tok::Str(next)) = self.peek() {
                    value.push_str(next);
                    self.advance();
                }
                Ok(Expr::Literal(Value::Str(value)))
            }
            Tok::Name(name) => {
                if unsupported_keyword(&name).is_some() {
                    return Err(self.reject(&Tok::Name(name)));
                }
                self.advance();
                Ok(match name.as_str() {
                    "True" | "true" => Expr::Literal(Value::Bool(true)),
                    "False" | "false" => Expr::Literal(Value::Bool(false)),
                    _ => Expr::Name(name),
                })
            }
            Tok::Punct("(") => {
                self.advance();
                if self.peek_punct() == Some(")") {
                    return Err(unsupported("tuple '()'"));
                }
                let inner = self.parse_comparison()?;
                match self.advance() {
                    Some(Tok::Punct(")")) => Ok(inner),
                    Some(other) => {
                        self.cursor -= 1;
                        Err(self.reject(&other))
                    }
                    None => Err(self.syntax_error("expected ')'")),
                }
            }
            Tok::Punct(_) => Err(self.reject(&tok)),
        }
    }
}

fn compare_op(symbol: &str) -> Option<CompareOp> {
    Some(match symbol {
        "==" => CompareOp::Eq,
        "!=" => CompareOp::NotEq,
        "<" => CompareOp::Lt,
        "<=" => CompareOp::LtE,
        ">" => CompareOp::Gt,
        ">=" => CompareOp::GtE,
        _ => return None,
    })
}

fn parse_expression(source: &str) -> EvalResult<Expr> {
    let tokens = ExprLexer::new(source).tokens()?;
    let parser = ExprParser {
        tokens,
        cursor: 0,
        end_column: source.chars().count() + 1,
    };
    parser.parse()
}

// --- Evaluation ---

#[derive(Debug, Copy, Clone)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    /// Booleans take part in arithmetic as 0 and 1.
    fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Int(i) => Some(Self::Int(*i)),
            Value::Float(f) => Some(Self::Float(*f)),
            Value::Bool(b) => Some(Self::Int(i64::from(*b))),
            Value::Str(_) | Value::Undefined => None,
        }
    }

    #[allow(clippy::cast_precision_loss, reason = "int to float promotion")]
    fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }
}

/// Upper bound on the byte length produced by `str * int`.
const MAX_REPEAT_LEN: usize = 1 << 24;

fn type_mismatch(operator: &str, left: &Value, right: &Value) -> EvalError {
    EvalError::TypeMismatch {
        operator: operator.to_string(),
        left: left.type_name().to_string(),
        right: right.type_name().to_string(),
    }
}

fn overflow(op: BinaryOp) -> EvalError {
    EvalError::Overflow {
        operator: op.symbol().to_string(),
    }
}

/// Modulo taking the sign of the divisor.
fn floor_mod_int(a: i64, b: i64) -> Option<i64> {
    let r = a.checked_rem(b)?;
    if r != 0 && ((r < 0) != (b < 0)) {
        r.checked_add(b)
    } else {
        Some(r)
    }
}

fn floor_mod_float(a: f64, b: f64) -> f64 {
    let r = a % b;
    if r != 0.0 && ((r < 0.0) != (b < 0.0)) {
        r + b
    } else {
        r
    }
}

fn arithmetic(op: BinaryOp, left: &Value, right: &Value) -> EvalResult<Value> {
    // String concatenation and repetition.
    match (op, left, right) {
        (BinaryOp::Add, Value::Str(a), Value::Str(b)) => return Ok(Value::Str(format!("{a}{b}"))),
        (BinaryOp::Mul, Value::Str(s), other) | (BinaryOp::Mul, other, Value::Str(s)) => {
            return match other {
                Value::Int(_) | Value::Bool(_) => {
                    let count = match Number::of(other) {
                        Some(Number::Int(n)) => usize::try_from(n).unwrap_or(0),
                        _ => 0,
                    };
                    match s.len().checked_mul(count) {
                        Some(len) if len <= MAX_REPEAT_LEN => Ok(Value::Str(s.repeat(count))),
                        _ => Err(overflow(op)),
                    }
                }
                Value::Float(_) | Value::Str(_) | Value::Undefined => {
                    Err(type_mismatch(op.symbol(), left, right))
                }
            };
        }
        _ => {}
    }

    let (Some(a), Some(b)) = (Number::of(left), Number::of(right)) else {
        return Err(type_mismatch(op.symbol(), left, right));
    };

    match (a, b) {
        (Number::Int(x), Number::Int(y)) => int_arithmetic(op, x, y),
        _ => float_arithmetic(op, a.as_f64(), b.as_f64()),
    }
}

fn int_arithmetic(op: BinaryOp, x: i64, y: i64) -> EvalResult<Value> {
    let result = match op {
        BinaryOp::Add => x.checked_add(y),
        BinaryOp::Sub => x.checked_sub(y),
        BinaryOp::Mul => x.checked_mul(y),
        BinaryOp::Div => return float_arithmetic(op, Number::Int(x).as_f64(), Number::Int(y).as_f64()),
        BinaryOp::Mod => {
            if y == 0 {
                return Err(EvalError::DivisionByZero);
            }
            floor_mod_int(x, y)
        }
        BinaryOp::Pow => {
            if y < 0 {
                if x == 0 {
                    return Err(EvalError::DivisionByZero);
                }
                return float_arithmetic(op, Number::Int(x).as_f64(), Number::Int(y).as_f64());
            }
            u32::try_from(y).ok().and_then(|exp| x.checked_pow(exp))
        }
    };
    result.map(Value::Int).ok_or_else(|| overflow(op))
}

fn float_arithmetic(op: BinaryOp, x: f64, y: f64) -> EvalResult<Value> {
    let result = match op {
        BinaryOp::Add => x + y,
        BinaryOp::Sub => x - y,
        BinaryOp::Mul => x * y,
        BinaryOp::Div => {
            if y == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            x / y
        }
        BinaryOp::Mod => {
            if y == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            floor_mod_float(x, y)
        }
        BinaryOp::Pow => {
            if x == 0.0 && y < 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            x.powf(y)
        }
    };
    Ok(Value::Float(result))
}

fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Undefined, Value::Undefined) => true,
        _ => match (Number::of(left), Number::of(right)) {
            (Some(Number::Int(a)), Some(Number::Int(b))) => a == b,
            (Some(a), Some(b)) => a.as_f64() == b.as_f64(),
            _ => false,
        },
    }
}

fn compare(op: CompareOp, left: &Value, right: &Value) -> EvalResult<bool> {
    let ordering = match op {
        CompareOp::Eq => return Ok(values_equal(left, right)),
        CompareOp::NotEq => return Ok(!values_equal(left, right)),
        CompareOp::Lt | CompareOp::LtE | CompareOp::Gt | CompareOp::GtE => {
            match (left, right) {
                (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
                _ => match (Number::of(left), Number::of(right)) {
                    (Some(Number::Int(a)), Some(Number::Int(b))) => Some(a.cmp(&b)),
                    (Some(a), Some(b)) => a.as_f64().partial_cmp(&b.as_f64()),
                    _ => return Err(type_mismatch(op.symbol(), left, right)),
                },
            }
        }
    };

    // NaN compares false with everything.
    let Some(ordering) = ordering else {
        return Ok(false);
    };
    Ok(match op {
        CompareOp::Lt => ordering == Ordering::Less,
        CompareOp::LtE => ordering != Ordering::Greater,
        CompareOp::Gt => ordering == Ordering::Greater,
        CompareOp::GtE => ordering != Ordering::Less,
        CompareOp::Eq | CompareOp::NotEq => false,
    })
}

fn eval_node(expr: &Expr, variables: Option<&Context>) -> EvalResult<Value> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Name(name) => Ok(variables
            .and_then(|vars| vars.get(name))
            .cloned()
            .unwrap_or(Value::Undefined)),
        Expr::Unary { op, operand } => {
            let value = eval_node(operand, variables)?;
            let symbol = match op {
                UnaryOp::Plus => "unary +",
                UnaryOp::Minus => "unary -",
            };
            match (op, Number::of(&value)) {
                (UnaryOp::Plus, Some(Number::Int(i))) => Ok(Value::Int(i)),
                (UnaryOp::Plus, Some(Number::Float(f))) => Ok(Value::Float(f)),
                (UnaryOp::Minus, Some(Number::Int(i))) => i
                    .checked_neg()
                    .map(Value::Int)
                    .ok_or_else(|| EvalError::Overflow {
                        operator: symbol.to_string(),
                    }),
                (UnaryOp::Minus, Some(Number::Float(f))) => Ok(Value::Float(-f)),
                (_, None) => Err(EvalError::TypeMismatch {
                    operator: symbol.to_string(),
                    left: value.type_name().to_string(),
                    right: value.type_name().to_string(),
                }),
            }
        }
        Expr::Binary { left, op, right } => {
            let left = eval_node(left, variables)?;
            let right = eval_node(right, variables)?;
            arithmetic(*op, &left, &right)
        }
        Expr::Compare { first, rest } => {
            let mut left = eval_node(first, variables)?;
            let mut all = true;
            for (op, operand) in rest {
                let right = eval_node(operand, variables)?;
                all &= compare(*op, &left, &right)?;
                left = right;
            }
            Ok(Value::Bool(all))
        }
    }
}

/// Evaluates a restricted expression.
///
/// Names missing from `variables`, or any name when no variables are given,
/// evaluate to [`Value::Undefined`].
///
/// # Errors
///
/// - `EvalError::Unsupported` for any construct outside the grammar, such as
///   function calls, attribute access or `and`/`or`.
/// - `EvalError::Syntax` for malformed expressions.
/// - `EvalError::TypeMismatch`, `EvalError::DivisionByZero` and
///   `EvalError::Overflow` for failing operations.
///
/// # Example
///
/// ```
/// use temple::{Context, Value, evaluate};
///
/// let vars = Context::new().insert("x", 7).to_owned();
/// assert_eq!(evaluate("4 <= x < 10", Some(&vars)).unwrap(), Value::Bool(true));
/// assert!(evaluate("print(x)", Some(&vars)).is_err());
/// ```
pub fn evaluate(source: &str, variables: Option<&Context>) -> Result<Value, EvalError> {
    let expr = parse_expression(source)?;
    eval_node(&expr, variables)
}
