//! AIDL lexer - turns definition text into tokens.
//!
//! Keywords are not distinguished here; the parser matches on identifier
//! text since most AIDL keywords are only reserved in specific positions.

use std::iter::Peekable;
use std::str::Chars;

use crate::error::{Result, SchemaError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Ident(String),
    /// Numeric literal kept verbatim (`12`, `0x1F`, `1.5f`, `10L`).
    Number(String),
    /// String or character literal, quotes removed.
    Literal(String),
    Punct(char),
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<SpannedToken>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.token == Token::Eof;
            tokens.push(token);
            if is_eof {
                return Ok(tokens);
            }
        }
    }

    fn next_token(&mut self) -> Result<SpannedToken> {
        self.skip_whitespace_and_comments()?;
        let span = self.span();

        let token = match self.peek() {
            None => Token::Eof,
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                Token::Ident(self.take_while(|c| c.is_ascii_alphanumeric() || c == '_'))
            }
            Some(c) if c.is_ascii_digit() => {
                Token::Number(self.take_while(|c| c.is_ascii_alphanumeric() || c == '.'))
            }
            Some(quote @ ('"' | '\'')) => Token::Literal(self.quoted(quote, span)?),
            Some(c) if c.is_ascii_punctuation() => {
                self.advance();
                Token::Punct(c)
            }
            Some(c) => return Err(parse_error(span, format!("unexpected character {c:?}"))),
        };

        Ok(SpannedToken { token, span })
    }

    fn span(&self) -> Span {
        Span {
            line: self.line,
            column: self.column,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn take_while(&mut self, keep: impl Fn(char) -> bool) -> String {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if !keep(c) {
                break;
            }
            text.push(c);
            self.advance();
        }
        text
    }

    fn quoted(&mut self, quote: char, start: Span) -> Result<String> {
        self.advance();
        let mut text = String::new();
        loop {
            match self.advance() {
                None | Some('\n') => {
                    return Err(parse_error(start, "unterminated literal".to_string()))
                }
                Some('\\') => {
                    if let Some(escaped) = self.advance() {
                        text.push(escaped);
                    }
                }
                Some(c) if c == quote => return Ok(text),
                Some(c) => text.push(c),
            }
        }
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<()> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') => {
                    let mut lookahead = self.chars.clone();
                    lookahead.next();
                    match lookahead.peek() {
                        Some('/') => {
                            while let Some(c) = self.advance() {
                                if c == '\n' {
                                    break;
                                }
                            }
                        }
                        Some('*') => self.skip_block_comment()?,
                        _ => return Ok(()),
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn skip_block_comment(&mut self) -> Result<()> {
        let start = self.span();
        self.advance();
        self.advance();
        let mut previous = '\0';
        loop {
            match self.advance() {
                None => return Err(parse_error(start, "unterminated comment".to_string())),
                Some('/') if previous == '*' => return Ok(()),
                Some(c) => previous = c,
            }
        }
    }
}

pub(crate) fn parse_error(span: Span, message: String) -> SchemaError {
    SchemaError::Parse {
        line: span.line,
        column: span.column,
        message,
    }
}
