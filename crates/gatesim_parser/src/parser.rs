//! Core parser infrastructure and gate-level netlist rules.
//!
//! The [`Parser`] struct provides primitive operations (advance, expect, eat)
//! over a token stream. Parsing stops at the first error. Module-level rules
//! live here; stimulus rules are in [`crate::stimulus`].

use gatesim_netlist::{Circuit, CircuitBuilder, GateKind, NetlistError, SignalResolution};
use tracing::debug;

use crate::error::{line_col, ParseError};
use crate::token::{Token, TokenKind};

/// A recursive descent parser over lexed tokens.
pub struct Parser<'src> {
    pub(crate) tokens: Vec<Token>,
    pub(crate) pos: usize,
    pub(crate) source: &'src str,
}

impl<'src> Parser<'src> {
    /// Creates a parser from a token stream lexed from `source`.
    pub fn new(tokens: Vec<Token>, source: &'src str) -> Self {
        Self {
            tokens,
            pos: 0,
            source,
        }
    }

    // ========================================================================
    // Primitive operations
    // ========================================================================

    pub(crate) fn current(&self) -> TokenKind {
        self.tokens[self.pos].kind
    }

    pub(crate) fn current_token(&self) -> Token {
        self.tokens[self.pos]
    }

    pub(crate) fn current_text(&self) -> &'src str {
        self.tokens[self.pos].text(self.source)
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.current() == kind
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.at(TokenKind::Eof)
    }

    pub(crate) fn advance(&mut self) {
        if !self.at_eof() {
            self.pos += 1;
        }
    }

    /// Consumes the current token if it matches. Returns `true` if consumed.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.expected(kind.describe()))
        }
    }

    /// Expects and returns an identifier's text.
    pub(crate) fn expect_ident(&mut self) -> Result<&'src str, ParseError> {
        if self.at(TokenKind::Identifier) {
            let text = self.current_text();
            self.advance();
            Ok(text)
        } else {
            Err(self.expected("identifier"))
        }
    }

    /// Expects a decimal number that fits in a `u64`.
    pub(crate) fn expect_number(&mut self, what: &str) -> Result<u64, ParseError> {
        if !self.at(TokenKind::Number) {
            return Err(self.expected(what));
        }
        let text = self.current_text();
        let value = text
            .parse::<u64>()
            .map_err(|_| self.error(format!("{what} '{text}' is out of range")))?;
        self.advance();
        Ok(value)
    }

    // ========================================================================
    // Errors
    // ========================================================================

    pub(crate) fn error_at(&self, token: Token, message: impl Into<String>) -> ParseError {
        let (line, col) = line_col(self.source, token.start);
        ParseError::Syntax {
            line,
            col,
            message: message.into(),
        }
    }

    pub(crate) fn error(&self, message: impl Into<String>) -> ParseError {
        self.error_at(self.current_token(), message)
    }

    pub(crate) fn expected(&self, what: &str) -> ParseError {
        let found = if self.at(TokenKind::Eof) {
            "end of input".to_string()
        } else {
            format!("'{}'", self.current_text())
        };
        self.error(format!("expected {what}, found {found}"))
    }

    pub(crate) fn netlist_error(&self, token: Token, source: NetlistError) -> ParseError {
        let (line, col) = line_col(self.source, token.start);
        ParseError::Netlist { line, col, source }
    }

    // ========================================================================
    // Netlist rules
    // ========================================================================

    /// Parses exactly one module followed by end of input.
    pub fn parse_module(&mut self, resolution: SignalResolution) -> Result<Circuit, ParseError> {
        self.expect(TokenKind::Module)?;
        let name = self.expect_ident()?;
        let mut builder = CircuitBuilder::new(name).with_resolution(resolution);

        if self.eat(TokenKind::LeftParen) {
            for port in self.parse_identifier_list(TokenKind::RightParen)? {
                builder.port(port);
            }
            self.expect(TokenKind::RightParen)?;
        }
        self.expect(TokenKind::Semicolon)?;

        while !self.at(TokenKind::Endmodule) {
            match self.current() {
                TokenKind::Input | TokenKind::Output | TokenKind::Wire => {
                    self.parse_declaration(&mut builder)?
                }
                TokenKind::Identifier => self.parse_gate_instance(&mut builder)?,
                _ => return Err(self.expected("declaration, gate or 'endmodule'")),
            }
        }

        let end = self.current_token();
        self.advance();
        if !self.at_eof() {
            return Err(self.error("unexpected text after 'endmodule'"));
        }

        let circuit = builder
            .build()
            .map_err(|e| self.netlist_error(end, e))?;
        debug!(
            circuit = circuit.name(),
            signals = circuit.signal_count(),
            gates = circuit.gate_count(),
            "netlist parsed"
        );
        Ok(circuit)
    }

    /// Parses `input|output|wire name, ...;`.
    fn parse_declaration(&mut self, builder: &mut CircuitBuilder) -> Result<(), ParseError> {
        let keyword = self.current();
        self.advance();
        loop {
            let token = self.current_token();
            let name = self.expect_ident()?;
            let declared = match keyword {
                TokenKind::Input => builder.input(name),
                TokenKind::Output => builder.output(name),
                _ => builder.wire(name),
            };
            declared.map_err(|e| self.netlist_error(token, e))?;
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::Semicolon)
    }

    /// Parses `kind [#d | #(d)] [instance] (out, in, ...);`.
    fn parse_gate_instance(&mut self, builder: &mut CircuitBuilder) -> Result<(), ParseError> {
        let kind_token = self.current_token();
        let kind_text = self.current_text();
        let kind = GateKind::from_keyword(kind_text)
            .ok_or_else(|| self.error(format!("unknown gate type '{kind_text}'")))?;
        self.advance();

        let mut delay = 0;
        if self.eat(TokenKind::Hash) {
            if self.eat(TokenKind::LeftParen) {
                delay = self.expect_number("delay")?;
                self.expect(TokenKind::RightParen)?;
            } else {
                delay = self.expect_number("delay")?;
            }
        }

        let instance = if self.at(TokenKind::Identifier) {
            Some(self.expect_ident()?)
        } else {
            None
        };

        self.expect(TokenKind::LeftParen)?;
        let pins = self.parse_identifier_list(TokenKind::RightParen)?;
        self.expect(TokenKind::RightParen)?;
        self.expect(TokenKind::Semicolon)?;

        let Some((output, inputs)) = pins.split_first() else {
            return Err(self.error_at(kind_token, format!("{kind} gate has no output connection")));
        };
        builder
            .add_gate(kind, delay, output, inputs, instance)
            .map_err(|e| self.netlist_error(kind_token, e))?;
        Ok(())
    }

    /// Parses a possibly empty comma-separated identifier list ending before `close`.
    fn parse_identifier_list(&mut self, close: TokenKind) -> Result<Vec<&'src str>, ParseError> {
        let mut names = Vec::new();
        if self.at(close) {
            return Ok(names);
        }
        loop {
            names.push(self.expect_ident()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        Ok(names)
    }
}
