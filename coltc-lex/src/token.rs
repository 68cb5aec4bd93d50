//! Lexeme kinds and the handful of range-compare membership predicates
//! that replace table lookups for token classification (§3.1, §6.4).
//!
//! Kinds are grouped into contiguous numeric bands in declaration order so
//! every `is_*` predicate below is a single range compare. The ordering
//! constraint from §6.4 - unary-eligible operators, then other binary
//! operators, then assignment operators, then comparison operators - is
//! encoded directly in the explicit discriminants; don't reorder variants
//! without re-checking the band constants at the bottom of this file.
//!
//! Non-assignable unary operators (`!`, `~`) and non-assignable binary
//! operators (`&&`, `||`) are deliberately placed *outside* the run of
//! assignable operators (`-, *, &, +, /, %, |, ^, <<, >>`) so that the
//! compound-assignment kinds map back to their base by one fixed offset
//! (see [`TokenKind::assignment_base`]).

#[repr(u16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // ---- structural (is_punctuation) ----
    Eof = 0,
    Comment = 1,
    Ident = 2,
    Underscore = 3,
    LParen = 4,
    RParen = 5,
    LBrace = 6,
    RBrace = 7,
    LBracket = 8,
    RBracket = 9,
    Comma = 10,
    Semicolon = 11,
    Colon = 12,
    ColonColon = 13,
    Dot = 14,
    DotDot = 15,
    DotDotEq = 16,
    DotDotDot = 17,
    Arrow = 18,
    FatArrow = 19,
    At = 20,
    Question = 21,

    // ---- unary-eligible operators (is_unary) ----
    Bang = 22,
    Tilde = 23,
    Minus = 24,
    Star = 25,
    Ampersand = 26,

    // ---- other binary operators (is_binary continues) ----
    Plus = 27,
    Slash = 28,
    Percent = 29,
    Pipe = 30,
    Caret = 31,
    Shl = 32,
    Shr = 33,
    AndAnd = 34,
    OrOr = 35,

    // ---- assignment operators ----
    Eq = 36,
    MinusEq = 37,
    StarEq = 38,
    AmpersandEq = 39,
    PlusEq = 40,
    SlashEq = 41,
    PercentEq = 42,
    PipeEq = 43,
    CaretEq = 44,
    ShlEq = 45,
    ShrEq = 46,

    // ---- comparison operators ----
    EqEq = 47,
    NotEq = 48,
    Lt = 49,
    LtEq = 50,
    Gt = 51,
    GtEq = 52,

    // ---- keywords (is_keyword) ----
    KwLet = 53,
    KwVar = 54,
    KwMut = 55,
    KwUndefined = 56,
    KwIf = 57,
    KwElif = 58,
    KwElse = 59,
    KwFn = 60,
    KwReturn = 61,
    KwAs = 62,
    KwBitAs = 63,
    KwTrue = 64,
    KwFalse = 65,
    KwPublic = 66,
    KwPrivate = 67,
    KwImport = 68,
    KwModule = 69,

    // ---- built-in type keywords, contiguous sub-band (is_built_in_type) ----
    KwBool = 70,
    KwChar = 71,
    KwI8 = 72,
    KwI16 = 73,
    KwI32 = 74,
    KwI64 = 75,
    KwU8 = 76,
    KwU16 = 77,
    KwU32 = 78,
    KwU64 = 79,
    KwF32 = 80,
    KwF64 = 81,
    KwByte = 82,
    KwWord = 83,
    KwDword = 84,
    KwQword = 85,
    KwVoid = 86,
    KwPtr = 87,

    // ---- literal kinds (is_literal) ----
    IntLiteral = 88,
    FloatLiteral = 89,
    StringLiteral = 90,
    CharLiteral = 91,
    BoolLiteral = 92,

    /// A byte the dispatch table couldn't classify, or a literal that
    /// failed to parse. Deliberately outside every band above.
    Invalid = 93,
}

const PUNCTUATION_START: u16 = TokenKind::Eof as u16;
const PUNCTUATION_END: u16 = TokenKind::Question as u16;
const UNARY_START: u16 = TokenKind::Bang as u16;
const UNARY_END: u16 = TokenKind::Ampersand as u16;
const BINARY_START: u16 = TokenKind::Minus as u16;
const BINARY_END: u16 = TokenKind::GtEq as u16;
const ASSIGN_START: u16 = TokenKind::Eq as u16;
const ASSIGN_END: u16 = TokenKind::ShrEq as u16;
const COMPARISON_START: u16 = TokenKind::EqEq as u16;
const COMPARISON_END: u16 = TokenKind::GtEq as u16;
const KEYWORD_START: u16 = TokenKind::KwLet as u16;
const KEYWORD_END: u16 = TokenKind::KwPtr as u16;
const BUILT_IN_TYPE_START: u16 = TokenKind::KwBool as u16;
const BUILT_IN_TYPE_END: u16 = TokenKind::KwPtr as u16;
const LITERAL_START: u16 = TokenKind::IntLiteral as u16;
const LITERAL_END: u16 = TokenKind::BoolLiteral as u16;

/// The fixed offset between a compound-assignment kind (`PlusEq`) and its
/// non-assign base (`Plus`): `base = compound as u16 - ASSIGNMENT_OFFSET`.
const ASSIGNMENT_OFFSET: u16 = 13;

impl TokenKind {
    #[inline]
    fn band(self) -> u16 {
        self as u16
    }

    pub fn is_punctuation(self) -> bool {
        (PUNCTUATION_START..=PUNCTUATION_END).contains(&self.band())
    }

    pub fn is_unary(self) -> bool {
        (UNARY_START..=UNARY_END).contains(&self.band())
    }

    pub fn is_binary(self) -> bool {
        (BINARY_START..=BINARY_END).contains(&self.band())
    }

    pub fn is_assignment(self) -> bool {
        (ASSIGN_START..=ASSIGN_END).contains(&self.band())
    }

    pub fn is_comparison(self) -> bool {
        (COMPARISON_START..=COMPARISON_END).contains(&self.band())
    }

    pub fn is_keyword(self) -> bool {
        (KEYWORD_START..=KEYWORD_END).contains(&self.band())
    }

    pub fn is_built_in_type(self) -> bool {
        (BUILT_IN_TYPE_START..=BUILT_IN_TYPE_END).contains(&self.band())
    }

    pub fn is_literal(self) -> bool {
        (LITERAL_START..=LITERAL_END).contains(&self.band())
    }

    pub fn is_error(self) -> bool {
        matches!(self, TokenKind::Invalid)
    }

    /// The non-assign operator a compound-assignment kind applies, or
    /// `None` for `Eq` (plain assignment has no base operator) and for
    /// every kind outside the assignment band.
    pub fn assignment_base(self) -> Option<TokenKind> {
        let n = self.band();
        if n == ASSIGN_START || !(ASSIGN_START..=ASSIGN_END).contains(&n) {
            return None;
        }
        TokenKind::from_u16(n - ASSIGNMENT_OFFSET)
    }

    fn from_u16(n: u16) -> Option<TokenKind> {
        // SAFETY: `TokenKind` is `repr(u16)` with every discriminant in
        // `0..=93` assigned exactly once above, so any value in that range
        // corresponds to a valid variant.
        if n <= TokenKind::Invalid as u16 {
            Some(unsafe { std::mem::transmute::<u16, TokenKind>(n) })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_non_error_kinds() -> Vec<TokenKind> {
        (0..TokenKind::Invalid as u16).filter_map(TokenKind::from_u16).collect()
    }

    #[test]
    fn predicates_cover_every_non_error_kind() {
        for kind in all_non_error_kinds() {
            assert!(
                kind.is_binary()
                    || kind.is_unary()
                    || kind.is_literal()
                    || kind.is_built_in_type()
                    || kind.is_punctuation()
                    || kind.is_keyword(),
                "{kind:?} is not covered by any membership predicate"
            );
        }
    }

    #[test]
    fn compound_assignment_maps_to_correct_base() {
        assert_eq!(TokenKind::PlusEq.assignment_base(), Some(TokenKind::Plus));
        assert_eq!(TokenKind::MinusEq.assignment_base(), Some(TokenKind::Minus));
        assert_eq!(TokenKind::StarEq.assignment_base(), Some(TokenKind::Star));
        assert_eq!(TokenKind::SlashEq.assignment_base(), Some(TokenKind::Slash));
        assert_eq!(TokenKind::ShrEq.assignment_base(), Some(TokenKind::Shr));
        assert_eq!(TokenKind::Eq.assignment_base(), None);
        assert_eq!(TokenKind::Plus.assignment_base(), None);
    }

    #[test]
    fn unary_eligible_operators_are_also_binary() {
        assert!(TokenKind::Minus.is_unary());
        assert!(TokenKind::Minus.is_binary());
        assert!(TokenKind::Star.is_unary());
        assert!(TokenKind::Star.is_binary());
    }

    #[test]
    fn non_assignable_unary_ops_are_not_binary() {
        assert!(TokenKind::Bang.is_unary());
        assert!(!TokenKind::Bang.is_binary());
        assert!(TokenKind::Tilde.is_unary());
        assert!(!TokenKind::Tilde.is_binary());
    }

    #[test]
    fn built_in_types_are_a_subset_of_keywords() {
        assert!(TokenKind::KwI32.is_built_in_type());
        assert!(TokenKind::KwI32.is_keyword());
        assert!(TokenKind::KwLet.is_keyword());
        assert!(!TokenKind::KwLet.is_built_in_type());
    }

    #[test]
    fn invalid_is_outside_every_band() {
        let invalid = TokenKind::Invalid;
        assert!(!invalid.is_binary());
        assert!(!invalid.is_unary());
        assert!(!invalid.is_literal());
        assert!(!invalid.is_built_in_type());
        assert!(!invalid.is_punctuation());
        assert!(!invalid.is_keyword());
        assert!(invalid.is_error());
    }
}
