//! Lexical analyzer for netlist and stimulus text.
//!
//! Both formats share one token set. Whitespace, `//` line comments and
//! `/* */` block comments are skipped. The returned vector always ends with a
//! [`TokenKind::Eof`] token.

use crate::error::{line_col, ParseError};
use crate::token::{lookup_keyword, Token, TokenKind};

/// Lexes source text into tokens, failing on the first invalid character.
pub fn lex(source: &str) -> Result<Vec<Token>, ParseError> {
    let mut lexer = Lexer {
        source: source.as_bytes(),
        text: source,
        pos: 0,
    };
    lexer.lex_all()
}

struct Lexer<'a> {
    source: &'a [u8],
    text: &'a str,
    pos: usize,
}

impl Lexer<'_> {
    fn lex_all(&mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace_and_comments()?;
            if self.pos >= self.source.len() {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    start: self.pos,
                    end: self.pos,
                });
                break;
            }
            tokens.push(self.next_token()?);
        }
        Ok(tokens)
    }

    fn peek(&self) -> u8 {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> u8 {
        self.source.get(self.pos + offset).copied().unwrap_or(0)
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> ParseError {
        let (line, col) = line_col(self.text, offset);
        ParseError::Syntax {
            line,
            col,
            message: message.into(),
        }
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<(), ParseError> {
        loop {
            while self.pos < self.source.len() && self.source[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }
            if self.peek() == b'/' && self.peek_at(1) == b'/' {
                self.pos += 2;
                while self.pos < self.source.len() && self.source[self.pos] != b'\n' {
                    self.pos += 1;
                }
                continue;
            }
            if self.peek() == b'/' && self.peek_at(1) == b'*' {
                let start = self.pos;
                self.pos += 2;
                loop {
                    if self.pos >= self.source.len() {
                        return Err(self.error(start, "unterminated block comment"));
                    }
                    if self.source[self.pos] == b'*' && self.peek_at(1) == b'/' {
                        self.pos += 2;
                        break;
                    }
                    self.pos += 1;
                }
                continue;
            }
            return Ok(());
        }
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        let start = self.pos;
        let b = self.peek();

        if is_ident_start(b) {
            while self.pos < self.source.len() && is_ident_char(self.source[self.pos]) {
                self.pos += 1;
            }
            let text = &self.text[start..self.pos];
            let kind = lookup_keyword(text).unwrap_or(TokenKind::Identifier);
            return Ok(self.token(kind, start));
        }

        if b.is_ascii_digit() {
            while self.pos < self.source.len() && self.source[self.pos].is_ascii_digit() {
                self.pos += 1;
            }
            return Ok(self.token(TokenKind::Number, start));
        }

        let kind = match b {
            b'#' => TokenKind::Hash,
            b'(' => TokenKind::LeftParen,
            b')' => TokenKind::RightParen,
            b',' => TokenKind::Comma,
            b';' => TokenKind::Semicolon,
            b'=' => TokenKind::Equals,
            _ => {
                let ch = self.text[start..].chars().next().unwrap_or('?');
                return Err(self.error(start, format!("unexpected character '{ch}'")));
            }
        };
        self.pos += 1;
        Ok(self.token(kind, start))
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            start,
            end: self.pos,
        }
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}
