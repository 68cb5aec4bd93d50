//! Top-level dispatch and the public lexing entry point.

use coltc_util::diagnostic::DiagnosticBuilder;
use coltc_util::span::{FileId, Span};
use coltc_util::{Reporter, StringTable};

use crate::cursor::Cursor;
use crate::token::TokenKind;
use crate::token_buffer::TokenBuffer;

/// Raised when nested-comment depth exceeds the bound (§4.1, §5). Caught
/// inside [`Lexer::lex`] - it never crosses the lexer's public API.
pub(crate) struct CommentDepthExceeded;

/// Byte dispatch and state for one lexing pass over a source string.
///
/// Conceptually a 256-entry table keyed by the next byte: ASCII
/// whitespace routes to the whitespace skipper, digits to the number
/// handler, letters/`_` to the identifier handler, each punctuation byte
/// to a dedicated `lex_*` handler, and anything left over to the
/// invalid-character handler. Rust compiles the byte `match` in
/// `next_token` to the equivalent jump table, so it is written directly
/// rather than built by hand.
pub struct Lexer<'a> {
    pub(crate) cursor: Cursor<'a>,
    pub(crate) strings: &'a mut StringTable,
    pub(crate) reporter: &'a mut dyn Reporter,
    pub(crate) file_id: FileId,
    pub(crate) token_start: usize,
    pub(crate) token_start_line: u32,
    pub(crate) token_start_column: u32,
    pub(crate) bom_checked: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(
        source: &'a str,
        strings: &'a mut StringTable,
        reporter: &'a mut dyn Reporter,
        file_id: FileId,
    ) -> Self {
        Lexer {
            cursor: Cursor::new(source),
            strings,
            reporter,
            file_id,
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
            bom_checked: false,
        }
    }

    /// Lexes the whole source into a fresh [`TokenBuffer`]. Single-pass,
    /// restart-free, and non-throwing at this boundary: the bounded
    /// internal comment-depth escape is caught here, never returned.
    pub fn lex(mut self) -> TokenBuffer {
        let mut buf = TokenBuffer::new();
        buf.set_source(self.cursor.source());

        loop {
            match self.next_token_checked(&mut buf) {
                Ok(Some(kind)) if kind == TokenKind::Eof => break,
                Ok(_) => continue,
                Err(CommentDepthExceeded) => {
                    self.report_error("exceeded recursion depth".to_string());
                    buf.append_token(
                        TokenKind::Eof,
                        self.cursor.line(),
                        self.cursor.column(),
                        0,
                    );
                    break;
                }
            }
        }

        buf
    }

    fn next_token_checked(&mut self, buf: &mut TokenBuffer) -> Result<Option<TokenKind>, CommentDepthExceeded> {
        self.skip_whitespace_and_comments()?;

        self.token_start = self.cursor.position();
        self.token_start_line = self.cursor.line();
        self.token_start_column = self.cursor.column();

        if self.cursor.is_at_end() {
            let idx = buf.append_token(TokenKind::Eof, self.token_start_line, self.token_start_column, 0);
            let _ = idx;
            return Ok(Some(TokenKind::Eof));
        }

        let c = self.cursor.current_char();
        let kind = match c {
            '(' => self.emit_single(buf, TokenKind::LParen),
            ')' => self.emit_single(buf, TokenKind::RParen),
            '{' => self.emit_single(buf, TokenKind::LBrace),
            '}' => self.emit_single(buf, TokenKind::RBrace),
            '[' => self.emit_single(buf, TokenKind::LBracket),
            ']' => self.emit_single(buf, TokenKind::RBracket),
            ',' => self.emit_single(buf, TokenKind::Comma),
            ';' => self.emit_single(buf, TokenKind::Semicolon),
            '~' => self.emit_single(buf, TokenKind::Tilde),
            '@' => self.emit_single(buf, TokenKind::At),
            '?' => self.emit_single(buf, TokenKind::Question),
            '+' => { let k = self.lex_plus(); self.emit(buf, k) }
            '-' => { let k = self.lex_minus(); self.emit(buf, k) }
            '*' => { let k = self.lex_star(); self.emit(buf, k) }
            '/' => { let k = self.lex_slash(); self.emit(buf, k) }
            '%' => { let k = self.lex_percent(); self.emit(buf, k) }
            '=' => { let k = self.lex_equals(); self.emit(buf, k) }
            '!' => { let k = self.lex_bang(); self.emit(buf, k) }
            '<' => { let k = self.lex_less(); self.emit(buf, k) }
            '>' => { let k = self.lex_greater(); self.emit(buf, k) }
            '&' => { let k = self.lex_ampersand(); self.emit(buf, k) }
            '|' => { let k = self.lex_pipe(); self.emit(buf, k) }
            '^' => { let k = self.lex_caret(); self.emit(buf, k) }
            ':' => { let k = self.lex_colon(); self.emit(buf, k) }
            '.' => { let k = self.lex_dot(); self.emit(buf, k) }
            '"' => { self.lex_string(buf); TokenKind::StringLiteral }
            '\'' => { self.lex_char(buf); TokenKind::CharLiteral }
            '_' => {
                if is_ident_continue(self.cursor.peek_char(1)) {
                    self.lex_identifier(buf)
                } else {
                    self.emit_single(buf, TokenKind::Underscore)
                }
            }
            c if c.is_ascii_digit() => self.lex_number(buf),
            c if is_ident_start(c) => self.lex_identifier(buf),
            other => {
                self.cursor.advance();
                self.report_error(format!("unexpected character '{other}'"));
                self.emit(buf, TokenKind::Invalid)
            }
        };

        Ok(Some(kind))
    }

    fn emit_single(&mut self, buf: &mut TokenBuffer, kind: TokenKind) -> TokenKind {
        self.cursor.advance();
        self.emit(buf, kind)
    }

    pub(crate) fn emit(&mut self, buf: &mut TokenBuffer, kind: TokenKind) -> TokenKind {
        let length = (self.cursor.position() - self.token_start) as u32;
        let end = buf.append_token(kind, self.token_start_line, self.token_start_column, length);
        if self.cursor.line() != self.token_start_line {
            buf.set_end_line(end, self.cursor.line());
        }
        kind
    }

    pub(crate) fn report_error(&mut self, message: String) {
        let span = Span::with_file(
            self.token_start,
            self.cursor.position(),
            self.file_id,
            self.token_start_line,
            self.token_start_column,
        );
        DiagnosticBuilder::error(message).span(span).emit(self.reporter);
    }

    pub(crate) fn token_start(&self) -> usize {
        self.token_start
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
