//! Panic-mode recovery (§4.4.8): scoped-assignment guards over the
//! currently installed panic consumer, and the consumers themselves.

use coltc_lex::token::TokenKind;
use coltc_util::index_vec::Idx;

use super::AstBuilder;

/// A recovery strategy installed for the duration of some sub-parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanicConsumer {
    /// Consume up to and including the next `;`.
    ToSemicolon,
    /// Consume up to (not including) the next `(`.
    ToLeftParen,
    /// Consume up to (not including) the next occurrence of a lexeme.
    ToLexeme(TokenKind),
}

/// Restores the previously installed panic consumer when dropped, the
/// "scoped assignment" pattern the base spec calls for (§4.4, §9).
pub struct PanicConsumerGuard<'b, 'a> {
    builder: &'b mut AstBuilder<'a>,
    previous: PanicConsumer,
}

impl<'b, 'a> PanicConsumerGuard<'b, 'a> {
    pub fn install(builder: &'b mut AstBuilder<'a>, consumer: PanicConsumer) -> Self {
        let previous = builder.panic_consumer;
        builder.panic_consumer = consumer;
        PanicConsumerGuard { builder, previous }
    }
}

impl<'b, 'a> Drop for PanicConsumerGuard<'b, 'a> {
    fn drop(&mut self) {
        self.builder.panic_consumer = self.previous;
    }
}

impl<'a> AstBuilder<'a> {
    /// Invokes the currently installed panic consumer. Idempotent: a
    /// second call at the same token position consumes nothing further
    /// (§8 "Round-trip / idempotence").
    pub(crate) fn recover(&mut self) {
        if self.last_recovery_pos == Some(self.cursor.index()) {
            return;
        }

        match self.panic_consumer {
            PanicConsumer::ToSemicolon => {
                while !self.at_eof() && self.current_kind() != TokenKind::Semicolon {
                    self.bump();
                }
                if self.current_kind() == TokenKind::Semicolon {
                    self.bump();
                }
            }
            PanicConsumer::ToLeftParen => {
                while !self.at_eof() && self.current_kind() != TokenKind::LParen {
                    self.bump();
                }
            }
            PanicConsumer::ToLexeme(target) => {
                while !self.at_eof() && self.current_kind() != target {
                    self.bump();
                }
            }
        }

        self.last_recovery_pos = Some(self.cursor.index());
    }
}
