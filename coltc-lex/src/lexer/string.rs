//! String and character literal lexing.
//!
//! Both share the same escape-sequence grammar (`\n \t \r \\ \' \" \0`
//! and `\xNN` byte escapes); only the terminating quote and the
//! single-character constraint for `char` differ.

use crate::lexer::core::Lexer;
use crate::token::TokenKind;
use crate::token_buffer::TokenBuffer;

impl<'a> Lexer<'a> {
    /// Consumes a `"..."` string literal, cursor already past the opening
    /// quote is NOT assumed - this is called with the cursor still on it.
    pub(crate) fn lex_string(&mut self, buf: &mut TokenBuffer) {
        self.cursor.advance();
        let mut value = String::new();
        let mut terminated = false;

        while !self.cursor.is_at_end() {
            match self.cursor.current_char() {
                '"' => {
                    self.cursor.advance();
                    terminated = true;
                    break;
                }
                '\n' => break,
                '\\' => {
                    self.cursor.advance();
                    if let Some(c) = self.read_escape() {
                        value.push(c);
                    }
                }
                c => {
                    value.push(c);
                    self.cursor.advance();
                }
            }
        }

        if !terminated {
            self.report_error("unterminated string literal".to_string());
        }

        let sym = self.strings.intern(&value);
        let length = (self.cursor.position() - self.token_start()) as u32;
        buf.append_identifier(
            sym,
            if terminated { TokenKind::StringLiteral } else { TokenKind::Invalid },
            self.token_start_line,
            self.token_start_column,
            length,
        );
    }

    /// Consumes a `'c'` character literal. Reports an error if the body
    /// is empty or holds more than one (post-escape) character.
    pub(crate) fn lex_char(&mut self, buf: &mut TokenBuffer) {
        self.cursor.advance();
        let mut chars: Vec<char> = Vec::new();
        let mut terminated = false;

        while !self.cursor.is_at_end() && self.cursor.current_char() != '\'' {
            if self.cursor.current_char() == '\n' {
                break;
            }
            if self.cursor.current_char() == '\\' {
                self.cursor.advance();
                if let Some(c) = self.read_escape() {
                    chars.push(c);
                }
            } else {
                chars.push(self.cursor.current_char());
                self.cursor.advance();
            }
        }

        if self.cursor.current_char() == '\'' {
            self.cursor.advance();
            terminated = true;
        }

        let ok = terminated && chars.len() == 1;
        if !terminated {
            self.report_error("unterminated character literal".to_string());
        } else if chars.len() != 1 {
            self.report_error("character literal must contain exactly one character".to_string());
        }

        let value = chars.first().copied().unwrap_or('\0') as u64;
        let length = (self.cursor.position() - self.token_start()) as u32;
        buf.append_literal(
            value,
            if ok { TokenKind::CharLiteral } else { TokenKind::Invalid },
            self.token_start_line,
            self.token_start_column,
            length,
        );
    }

    fn read_escape(&mut self) -> Option<char> {
        if self.cursor.is_at_end() {
            return None;
        }
        let c = self.cursor.current_char();
        self.cursor.advance();
        match c {
            'n' => Some('\n'),
            't' => Some('\t'),
            'r' => Some('\r'),
            '\\' => Some('\\'),
            '\'' => Some('\''),
            '"' => Some('"'),
            '0' => Some('\0'),
            'x' => {
                let hi = self.cursor.current_char();
                self.cursor.advance();
                let lo = self.cursor.current_char();
                self.cursor.advance();
                let byte = u8::from_str_radix(&format!("{hi}{lo}"), 16).ok()?;
                Some(byte as char)
            }
            other => {
                self.report_error(format!("unknown escape sequence '\\{other}'"));
                Some(other)
            }
        }
    }
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
    fn simple_string_literal_round_trips() {
        let buf = lex(r#""hello""#);
        assert_eq!(buf.kind(TokenIdx(0)), TokenKind::StringLiteral);
        let sym = buf.identifier(TokenIdx(0)).unwrap();
        assert_eq!(sym.as_u32(), 0);
    }

    #[test]
    fn escaped_newline_is_unescaped() {
        let mut strings = StringTable::new();
        let mut sink = Sink;
        let buf = Lexer::new(r#""a\nb""#, &mut strings, &mut sink, FileId::new(0)).lex();
        let sym = buf.identifier(TokenIdx(0)).unwrap();
        assert_eq!(strings.get(sym), Some("a\nb"));
    }

    #[test]
    fn unterminated_string_is_invalid() {
        let buf = lex("\"never closed");
        assert_eq!(buf.kind(TokenIdx(0)), TokenKind::Invalid);
    }

    #[test]
    fn single_char_literal_parses() {
        let buf = lex("'a'");
        assert_eq!(buf.kind(TokenIdx(0)), TokenKind::CharLiteral);
        assert_eq!(buf.literal(TokenIdx(0)), Some('a' as u64));
    }

    #[test]
    fn multi_character_literal_is_invalid() {
        let buf = lex("'ab'");
        assert_eq!(buf.kind(TokenIdx(0)), TokenKind::Invalid);
    }
}
