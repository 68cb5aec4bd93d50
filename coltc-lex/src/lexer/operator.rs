//! Multi-character operator dispatch.
//!
//! Every `lex_*` method here is entered with the cursor still sitting on
//! the operator's first character, advances past it, then greedily
//! matches the longest operator that starts with that character. The
//! byte-level dispatch in `core.rs` routes `*` to [`Lexer::lex_star`] and
//! nowhere else - a historical version of this dispatch is said to have
//! sent `*` to the `+` handler by mistake, which is the bug this file's
//! routing deliberately avoids.

use crate::lexer::core::Lexer;
use crate::token::TokenKind;

impl<'a> Lexer<'a> {
    pub(crate) fn lex_plus(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            TokenKind::PlusEq
        } else {
            TokenKind::Plus
        }
    }

    pub(crate) fn lex_minus(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            TokenKind::MinusEq
        } else if self.cursor.match_char('>') {
            TokenKind::Arrow
        } else {
            TokenKind::Minus
        }
    }

    pub(crate) fn lex_star(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            TokenKind::StarEq
        } else {
            TokenKind::Star
        }
    }

    pub(crate) fn lex_slash(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            TokenKind::SlashEq
        } else {
            TokenKind::Slash
        }
    }

    pub(crate) fn lex_percent(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            TokenKind::PercentEq
        } else {
            TokenKind::Percent
        }
    }

    pub(crate) fn lex_equals(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            TokenKind::EqEq
        } else if self.cursor.match_char('>') {
            TokenKind::FatArrow
        } else {
            TokenKind::Eq
        }
    }

    pub(crate) fn lex_bang(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            TokenKind::NotEq
        } else {
            TokenKind::Bang
        }
    }

    pub(crate) fn lex_less(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            TokenKind::LtEq
        } else if self.cursor.match_char('<') {
            if self.cursor.match_char('=') {
                TokenKind::ShlEq
            } else {
                TokenKind::Shl
            }
        } else {
            TokenKind::Lt
        }
    }

    pub(crate) fn lex_greater(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            TokenKind::GtEq
        } else if self.cursor.match_char('>') {
            if self.cursor.match_char('=') {
                TokenKind::ShrEq
            } else {
                TokenKind::Shr
            }
        } else {
            TokenKind::Gt
        }
    }

    pub(crate) fn lex_ampersand(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            TokenKind::AmpersandEq
        } else if self.cursor.match_char('&') {
            TokenKind::AndAnd
        } else {
            TokenKind::Ampersand
        }
    }

    pub(crate) fn lex_pipe(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            TokenKind::PipeEq
        } else if self.cursor.match_char('|') {
            TokenKind::OrOr
        } else {
            TokenKind::Pipe
        }
    }

    pub(crate) fn lex_caret(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            TokenKind::CaretEq
        } else {
            TokenKind::Caret
        }
    }

    pub(crate) fn lex_colon(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.match_char(':') {
            TokenKind::ColonColon
        } else {
            TokenKind::Colon
        }
    }

    pub(crate) fn lex_dot(&mut self) -> TokenKind {
        self.cursor.advance();
        if self.cursor.match_char('.') {
            if self.cursor.match_char('=') {
                TokenKind::DotDotEq
            } else if self.cursor.match_char('.') {
                TokenKind::DotDotDot
            } else {
                TokenKind::DotDot
            }
        } else {
            TokenKind::Dot
        }
    }
}
