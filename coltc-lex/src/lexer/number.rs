//! Integer and floating-point literals, including base prefixes and
//! extension suffixes (§4.1).

use crate::lexer::core::Lexer;
use crate::token::TokenKind;
use crate::token_buffer::TokenBuffer;

impl<'a> Lexer<'a> {
    /// Consumes a numeric literal starting at the current digit. Handles
    /// `0x`/`0b`/`0o` base prefixes, a `.`-led fractional part, an
    /// `e`/`E` exponent, and a trailing type-extension suffix
    /// (`u8`..`u64`, `i8`..`i64`, `f`, `d`). Literals with no suffix
    /// default to `i64` (integers) or `f64` (floats); prefixed integer
    /// literals with no suffix default to unsigned.
    pub(crate) fn lex_number(&mut self, buf: &mut TokenBuffer) -> TokenKind {
        let mut is_float = false;
        let mut prefixed = false;

        if self.cursor.current_char() == '0' {
            match self.cursor.peek_char(1) {
                'x' | 'X' => {
                    self.cursor.advance_n(2);
                    self.consume_digits(|c| c.is_ascii_hexdigit());
                    prefixed = true;
                }
                'b' | 'B' => {
                    self.cursor.advance_n(2);
                    self.consume_digits(|c| c == '0' || c == '1');
                    prefixed = true;
                }
                'o' | 'O' => {
                    self.cursor.advance_n(2);
                    self.consume_digits(|c| ('0'..='7').contains(&c));
                    prefixed = true;
                }
                _ => self.consume_digits(|c| c.is_ascii_digit()),
            }
        } else {
            self.consume_digits(|c| c.is_ascii_digit());
        }

        if !prefixed && self.cursor.current_char() == '.' && self.cursor.peek_char(1).is_ascii_digit() {
            is_float = true;
            self.cursor.advance();
            self.consume_digits(|c| c.is_ascii_digit());
        }

        if !prefixed && matches!(self.cursor.current_char(), 'e' | 'E') {
            let next = self.cursor.peek_char(1);
            let exponent_starts_digits = next.is_ascii_digit()
                || (matches!(next, '+' | '-') && self.cursor.peek_char(2).is_ascii_digit());
            if exponent_starts_digits {
                is_float = true;
                self.cursor.advance();
                if matches!(self.cursor.current_char(), '+' | '-') {
                    self.cursor.advance();
                }
                self.consume_digits(|c| c.is_ascii_digit());
            }
        }

        let suffix = self.consume_suffix();
        let text = self.cursor.slice_from(self.token_start());
        let digits = strip_suffix_and_prefix(text, suffix);

        let kind = match suffix {
            Some(s) if s.starts_with('f') || s == "d" => TokenKind::FloatLiteral,
            Some(_) => TokenKind::IntLiteral,
            None if is_float => TokenKind::FloatLiteral,
            None => TokenKind::IntLiteral,
        };

        let radix = if text.len() > 1 && text.as_bytes()[0] == b'0' {
            match text.as_bytes().get(1) {
                Some(b'x') | Some(b'X') => 16,
                Some(b'b') | Some(b'B') => 2,
                Some(b'o') | Some(b'O') => 8,
                _ => 10,
            }
        } else {
            10
        };

        if kind == TokenKind::FloatLiteral {
            match digits.parse::<f64>() {
                Ok(value) => {
                    let bits = value.to_bits();
                    self.emit_literal(buf, bits, TokenKind::FloatLiteral)
                }
                Err(_) => {
                    self.report_error(format!("'{text}' is not a valid floating-point literal"));
                    self.emit(buf, TokenKind::Invalid)
                }
            }
        } else {
            let is_signed = match suffix {
                Some(s) => s.starts_with('i'),
                None => !prefixed,
            };
            match u64::from_str_radix(digits, radix) {
                Ok(value) if is_signed && value > i64::MAX as u64 => {
                    self.report_error(format!("'{text}' is not a valid integer literal"));
                    self.emit(buf, TokenKind::Invalid)
                }
                Ok(value) => self.emit_literal(buf, value, TokenKind::IntLiteral),
                Err(_) => {
                    self.report_error(format!("'{text}' is not a valid integer literal"));
                    self.emit(buf, TokenKind::Invalid)
                }
            }
        }
    }

    fn consume_digits(&mut self, pred: impl Fn(char) -> bool) {
        loop {
            let c = self.cursor.current_char();
            if pred(c) || c == '_' {
                self.cursor.advance();
            } else {
                break;
            }
        }
    }

    /// Consumes a trailing extension suffix (`u8`, `i32`, `f`, `d`, ...)
    /// if one is present immediately after the digits.
    fn consume_suffix(&mut self) -> Option<&'static str> {
        const SUFFIXES: &[&str] = &[
            "u8", "u16", "u32", "u64", "i8", "i16", "i32", "i64", "f", "d",
        ];
        let remaining = self.cursor.remaining();
        for suffix in SUFFIXES {
            if remaining.starts_with(suffix) {
                let next = remaining[suffix.len()..].chars().next();
                let boundary = !matches!(next, Some(c) if c.is_alphanumeric() || c == '_');
                if boundary {
                    self.cursor.advance_n(suffix.len());
                    return Some(suffix);
                }
            }
        }
        None
    }

    fn emit_literal(&mut self, buf: &mut TokenBuffer, value: u64, kind: TokenKind) -> TokenKind {
        let length = (self.cursor.position() - self.token_start()) as u32;
        buf.append_literal(value, kind, self.token_start_line, self.token_start_column, length);
        kind
    }
}

fn strip_suffix_and_prefix(text: &str, suffix: Option<&str>) -> &str {
    let without_suffix = match suffix {
        Some(s) => &text[..text.len() - s.len()],
        None => text,
    };
    without_suffix.trim_end_matches('_')
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
    fn plain_integer_defaults_to_i64_kind() {
        let buf = lex("42");
        assert_eq!(buf.kind(TokenIdx(0)), TokenKind::IntLiteral);
        assert_eq!(buf.literal(TokenIdx(0)), Some(42));
    }

    #[test]
    fn hex_prefixed_literal_parses() {
        let buf = lex("0xFF");
        assert_eq!(buf.kind(TokenIdx(0)), TokenKind::IntLiteral);
        assert_eq!(buf.literal(TokenIdx(0)), Some(255));
    }

    #[test]
    fn float_literal_with_fraction_parses() {
        let buf = lex("3.5");
        assert_eq!(buf.kind(TokenIdx(0)), TokenKind::FloatLiteral);
        assert_eq!(buf.literal(TokenIdx(0)).map(f64::from_bits), Some(3.5));
    }

    #[test]
    fn suffixed_integer_literal_parses() {
        let buf = lex("10u8");
        assert_eq!(buf.kind(TokenIdx(0)), TokenKind::IntLiteral);
        assert_eq!(buf.literal(TokenIdx(0)), Some(10));
    }

    #[test]
    fn signed_64_bit_boundary_literal_parses() {
        let buf = lex("9223372036854775807i64");
        assert_eq!(buf.kind(TokenIdx(0)), TokenKind::IntLiteral);
        assert_eq!(buf.literal(TokenIdx(0)), Some(9223372036854775807));
    }

    #[test]
    fn literal_past_the_signed_64_bit_boundary_is_invalid() {
        let buf = lex("9223372036854775808i64");
        assert_eq!(buf.kind(TokenIdx(0)), TokenKind::Invalid);
    }

    #[test]
    fn unsuffixed_unprefixed_literal_past_the_signed_64_bit_boundary_is_invalid() {
        let buf = lex("9223372036854775808");
        assert_eq!(buf.kind(TokenIdx(0)), TokenKind::Invalid);
    }

    #[test]
    fn prefixed_literal_past_the_signed_64_bit_boundary_still_parses_as_unsigned() {
        let buf = lex("0xFFFFFFFFFFFFFFFF");
        assert_eq!(buf.kind(TokenIdx(0)), TokenKind::IntLiteral);
        assert_eq!(buf.literal(TokenIdx(0)), Some(u64::MAX));
    }

    #[test]
    fn exponent_literal_is_a_float() {
        let buf = lex("1e10");
        assert_eq!(buf.kind(TokenIdx(0)), TokenKind::FloatLiteral);
    }
}
