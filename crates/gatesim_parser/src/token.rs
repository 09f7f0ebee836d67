//! Token types shared by the netlist and stimulus parsers.

use serde::{Deserialize, Serialize};

/// A token kind.
///
/// Gate kinds are not keywords; they lex as [`TokenKind::Identifier`] and are
/// recognized by the netlist parser.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum TokenKind {
    /// `module`
    Module,
    /// `endmodule`
    Endmodule,
    /// `input`
    Input,
    /// `output`
    Output,
    /// `wire`
    Wire,
    /// A simple identifier.
    Identifier,
    /// An unsigned decimal literal.
    Number,
    /// `#`
    Hash,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `=`
    Equals,
    /// End of input.
    Eof,
}

impl TokenKind {
    /// Returns a short human-readable description for error messages.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Module => "'module'",
            TokenKind::Endmodule => "'endmodule'",
            TokenKind::Input => "'input'",
            TokenKind::Output => "'output'",
            TokenKind::Wire => "'wire'",
            TokenKind::Identifier => "identifier",
            TokenKind::Number => "number",
            TokenKind::Hash => "'#'",
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::Comma => "','",
            TokenKind::Semicolon => "';'",
            TokenKind::Equals => "'='",
            TokenKind::Eof => "end of input",
        }
    }
}

/// Looks up a keyword, returning `None` for ordinary identifiers.
pub fn lookup_keyword(text: &str) -> Option<TokenKind> {
    match text {
        "module" => Some(TokenKind::Module),
        "endmodule" => Some(TokenKind::Endmodule),
        "input" => Some(TokenKind::Input),
        "output" => Some(TokenKind::Output),
        "wire" => Some(TokenKind::Wire),
        _ => None,
    }
}

/// A token with its byte range in the source text.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Token {
    /// The token kind.
    pub kind: TokenKind,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Token {
    /// Returns the token's text.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords() {
        assert_eq!(lookup_keyword("module"), Some(TokenKind::Module));
        assert_eq!(lookup_keyword("wire"), Some(TokenKind::Wire));
        assert_eq!(lookup_keyword("and"), None);
        assert_eq!(lookup_keyword("Module"), None);
    }

    #[test]
    fn token_text() {
        let t = Token {
            kind: TokenKind::Identifier,
            start: 4,
            end: 6,
        };
        assert_eq!(t.text("and g1 (y, a);"), "g1");
    }
}
