use crate::formula::Expr;
use std::fmt::{self, Display, Formatter};
use std::io::{BufRead, BufReader, Read};
use std::iter::Peekable;
use std::str::CharIndices;

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Token {
    Var(String),
    Not,
    And,
    Or,
    Implies,
    Iff,
    LParen,
    RParen,
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        match self {
            Token::Var(name) => f.write_str(name),
            Token::Not => f.write_str("~"),
            Token::And => f.write_str("&"),
            Token::Or => f.write_str("|"),
            Token::Implies => f.write_str("->"),
            Token::Iff => f.write_str("<->"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
        }
    }
}

/// Split `text` into tokens, each paired with its byte offset.
pub fn tokenize(text: &str) -> Result<Vec<(usize, Token)>, ParseError> {
    let mut tokens = vec![];
    let mut chars = text.char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        let token = match c {
            c if c.is_whitespace() => continue,
            '~' => Token::Not,
            '&' => Token::And,
            '|' => Token::Or,
            '(' => Token::LParen,
            ')' => Token::RParen,
            // longest match first: "<->" before "->"
            '<' => {
                expect_char(&mut chars, '-', c, offset)?;
                expect_char(&mut chars, '>', c, offset)?;
                Token::Iff
            }
            '-' => {
                expect_char(&mut chars, '>', c, offset)?;
                Token::Implies
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut end = offset + c.len_utf8();
                while let Some(&(i, c)) = chars.peek() {
                    if !(c.is_ascii_alphanumeric() || c == '_') {
                        break;
                    }
                    end = i + c.len_utf8();
                    chars.next();
                }
                Token::Var(text[offset..end].to_string())
            }
            ch => return Err(ParseError::UnexpectedChar { ch, offset }),
        };
        tokens.push((offset, token));
    }

    Ok(tokens)
}

// Consume `expected` or blame the character that started the operator
fn expect_char(
    chars: &mut Peekable<CharIndices>,
    expected: char,
    start: char,
    offset: usize,
) -> Result<(), ParseError> {
    match chars.peek() {
        Some(&(_, c)) if c == expected => {
            chars.next();
            Ok(())
        }
        _ => Err(ParseError::UnexpectedChar { ch: start, offset }),
    }
}

/// Parse a single formula.
///
/// Precedence from tightest to loosest is `~`, `&`, `|`, `->`, `<->`. The
/// binary `&` and `|` associate to the left, `->` and `<->` to the right.
pub fn parse(text: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.parse_iff()?;
    match parser.tokens.get(parser.pos) {
        None => Ok(expr),
        Some((offset, token)) => Err(ParseError::TrailingInput {
            token: token.clone(),
            offset: *offset,
        }),
    }
}

/// Parse every formula in order, stopping at the first failure.
pub fn parse_all<S: AsRef<str>>(texts: impl IntoIterator<Item = S>) -> Result<Vec<Expr>, ParseError> {
    texts.into_iter().map(|text| parse(text.as_ref())).collect()
}

/// Read one formula per line. Blank lines and lines starting with `#` are
/// skipped.
pub fn parse_reader<R: Read>(reader: R) -> Result<Vec<Expr>, LoadError> {
    let reader = BufReader::new(reader);

    let mut exprs = vec![];
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        let expr = parse(text).map_err(|source| LoadError::Parse {
            line: idx + 1,
            text: text.to_string(),
            source,
        })?;
        exprs.push(expr);
    }

    Ok(exprs)
}

/// Deepest nesting of `~`, `(`, `->` and `<->` accepted by [`parse`]. Every
/// level costs several stack frames here and in the recursive tree walks.
pub const MAX_DEPTH: usize = 256;

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, token)| token)
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    // Called right after consuming the token that opens a nested level
    fn descend(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            let offset = self.tokens[self.pos - 1].0;
            return Err(ParseError::TooDeep { offset });
        }
        Ok(())
    }

    fn parse_iff(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_implies()?;
        if self.eat(&Token::Iff) {
            self.descend()?;
            let right = self.parse_iff()?;
            self.depth -= 1;
            return Ok(Expr::iff(left, right));
        }
        Ok(left)
    }

    fn parse_implies(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_or()?;
        if self.eat(&Token::Implies) {
            self.descend()?;
            let right = self.parse_implies()?;
            self.depth -= 1;
            return Ok(Expr::implies(left, right));
        }
        Ok(left)
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;
        while self.eat(&Token::Or) {
            let right = self.parse_and()?;
            left = Expr::or(left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        while self.eat(&Token::And) {
            let right = self.parse_unary()?;
            left = Expr::and(left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if self.eat(&Token::Not) {
            self.descend()?;
            let operand = self.parse_unary()?;
            self.depth -= 1;
            return Ok(Expr::not(operand));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let (offset, token) = match self.tokens.get(self.pos) {
            Some((offset, token)) => (*offset, token.clone()),
            None => return Err(ParseError::UnexpectedEnd),
        };
        self.pos += 1;
        match token {
            Token::Var(name) => Ok(Expr::Var(name)),
            Token::LParen => {
                self.descend()?;
                let inner = self.parse_iff()?;
                self.depth -= 1;
                if self.eat(&Token::RParen) {
                    Ok(inner)
                } else {
                    match self.tokens.get(self.pos) {
                        None => Err(ParseError::UnclosedParen { offset }),
                        Some((offset, token)) => Err(ParseError::UnexpectedToken {
                            token: token.clone(),
                            offset: *offset,
                        }),
                    }
                }
            }
            token => Err(ParseError::UnexpectedToken { token, offset }),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ParseError {
    Empty,
    UnexpectedChar { ch: char, offset: usize },
    UnexpectedToken { token: Token, offset: usize },
    UnexpectedEnd,
    UnclosedParen { offset: usize },
    TrailingInput { token: Token, offset: usize },
    TooDeep { offset: usize },
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        match self {
            ParseError::Empty => f.write_str("empty formula"),
            ParseError::UnexpectedChar { ch, offset } => {
                write!(f, "unexpected character '{}' at offset {}", ch, offset)
            }
            ParseError::UnexpectedToken { token, offset } => {
                write!(f, "unexpected '{}' at offset {}", token, offset)
            }
            ParseError::UnexpectedEnd => f.write_str("unexpected end of input, expected an operand"),
            ParseError::UnclosedParen { offset } => write!(f, "'(' at offset {} is never closed", offset),
            ParseError::TrailingInput { token, offset } => {
                write!(f, "unexpected '{}' at offset {} after a complete formula", token, offset)
            }
            ParseError::TooDeep { offset } => {
                write!(f, "nesting deeper than {} levels at offset {}", MAX_DEPTH, offset)
            }
        }
    }
}

impl std::error::Error for ParseError {}

#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Parse { line: usize, text: String, source: ParseError },
}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        match self {
            LoadError::Io(e) => write!(f, "i/o error: {}", e),
            LoadError::Parse { line, text, source } => write!(f, "line {}: {:?}: {}", line, text, source),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            LoadError::Parse { source, .. } => Some(source),
        }
    }
}
