//! Stimulus script rules.
//!
//! A script is a sequence of `#<time> <signal>=<value>;` assignments. Times
//! are absolute and may appear in any order; the engine sorts them.

use gatesim_common::Bit;
use gatesim_sim::Stimulus;

use crate::error::ParseError;
use crate::parser::Parser;
use crate::token::TokenKind;

impl Parser<'_> {
    /// Parses assignments until end of input.
    pub fn parse_stimulus_script(&mut self) -> Result<Stimulus, ParseError> {
        let mut stimulus = Stimulus::new();
        while !self.at_eof() {
            self.expect(TokenKind::Hash)?;
            let time = self.expect_number("time")?;
            let signal = self.expect_ident()?;
            self.expect(TokenKind::Equals)?;

            let value_token = self.current_token();
            let raw = self.expect_number("value")?;
            let value = u8::try_from(raw)
                .ok()
                .and_then(|v| Bit::try_from(v).ok())
                .ok_or_else(|| {
                    self.error_at(value_token, format!("invalid value {raw} for '{signal}' (expected 0 or 1)"))
                })?;

            self.expect(TokenKind::Semicolon)?;
            stimulus.push(time, signal, value);
        }
        Ok(stimulus)
    }
}
