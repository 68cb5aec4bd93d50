//! Identifiers, keywords, and built-in type names.

use crate::lexer::core::Lexer;
use crate::token::TokenKind;
use crate::token_buffer::TokenBuffer;

impl<'a> Lexer<'a> {
    /// Consumes an identifier-or-keyword lexeme starting at the current
    /// character (already known to be an ident-start or `_`), then looks
    /// it up against the keyword table and emits the matching kind.
    pub(crate) fn lex_identifier(&mut self, buf: &mut TokenBuffer) -> TokenKind {
        while is_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }

        let text = self.cursor.slice_from(self.token_start());

        if text.starts_with("___") {
            self.report_error(format!("'{text}' begins with three underscores, which is reserved"));
            return self.emit(buf, TokenKind::Invalid);
        }

        let kind = keyword_from_ident(text).unwrap_or(TokenKind::Ident);
        if kind == TokenKind::Ident {
            let sym = self.strings.intern(text);
            let length = text.len() as u32;
            let idx = buf.append_identifier(
                sym,
                TokenKind::Ident,
                self.token_start_line,
                self.token_start_column,
                length,
            );
            let _ = idx;
            TokenKind::Ident
        } else {
            self.emit(buf, kind)
        }
    }
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn keyword_from_ident(text: &str) -> Option<TokenKind> {
    Some(match text {
        "let" => TokenKind::KwLet,
        "var" => TokenKind::KwVar,
        "mut" => TokenKind::KwMut,
        "undefined" => TokenKind::KwUndefined,
        "if" => TokenKind::KwIf,
        "elif" => TokenKind::KwElif,
        "else" => TokenKind::KwElse,
        "fn" => TokenKind::KwFn,
        "return" => TokenKind::KwReturn,
        "as" => TokenKind::KwAs,
        "bitas" => TokenKind::KwBitAs,
        "true" => TokenKind::KwTrue,
        "false" => TokenKind::KwFalse,
        "public" => TokenKind::KwPublic,
        "private" => TokenKind::KwPrivate,
        "import" => TokenKind::KwImport,
        "module" => TokenKind::KwModule,
        "bool" => TokenKind::KwBool,
        "char" => TokenKind::KwChar,
        "i8" => TokenKind::KwI8,
        "i16" => TokenKind::KwI16,
        "i32" => TokenKind::KwI32,
        "i64" => TokenKind::KwI64,
        "u8" => TokenKind::KwU8,
        "u16" => TokenKind::KwU16,
        "u32" => TokenKind::KwU32,
        "u64" => TokenKind::KwU64,
        "f32" => TokenKind::KwF32,
        "f64" => TokenKind::KwF64,
        "byte" => TokenKind::KwByte,
        "word" => TokenKind::KwWord,
        "dword" => TokenKind::KwDword,
        "qword" => TokenKind::KwQword,
        "void" => TokenKind::KwVoid,
        "ptr" => TokenKind::KwPtr,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use coltc_util::diagnostic::Sink;
    use coltc_util::span::FileId;
    use coltc_util::StringTable;

    use crate::lexer::core::Lexer;
    use crate::token::TokenKind;
    use crate::token_buffer::TokenIdx;

    fn lex(source: &str) -> crate::token_buffer::TokenBuffer {
        let mut strings = StringTable::new();
        let mut sink = Sink;
        Lexer::new(source, &mut strings, &mut sink, FileId::new(0)).lex()
    }

    #[test]
    fn plain_identifier_is_ident() {
        let buf = lex("foo");
        assert_eq!(buf.kind(TokenIdx(0)), TokenKind::Ident);
    }

    #[test]
    fn keyword_is_recognized() {
        let buf = lex("fn");
        assert_eq!(buf.kind(TokenIdx(0)), TokenKind::KwFn);
    }

    #[test]
    fn built_in_type_name_is_recognized() {
        let buf = lex("i32");
        assert_eq!(buf.kind(TokenIdx(0)), TokenKind::KwI32);
        assert!(buf.kind(TokenIdx(0)).is_built_in_type());
    }

    #[test]
    fn triple_underscore_identifier_is_invalid() {
        let buf = lex("___reserved");
        assert_eq!(buf.kind(TokenIdx(0)), TokenKind::Invalid);
    }

    #[test]
    fn identifier_round_trips_through_string_table() {
        let buf = lex("hello");
        let sym = buf.identifier(TokenIdx(0)).unwrap();
        assert_eq!(sym.as_u32(), 0);
    }
}
