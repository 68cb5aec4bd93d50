//! The columnar token buffer (§3.2, §4.2).
//!
//! Storage is split by field ("structure of arrays") rather than a single
//! `Vec<Token>` of a fat struct, matching the data-oriented design the
//! base spec calls for. Literal values and identifier views live in their
//! own side tables so the hot per-token arrays (kind/line/column/length)
//! stay small and uniformly sized.

use coltc_util::index_vec::Idx;
use coltc_util::symbol::{StringTable, Symbol};
use coltc_util::{define_idx, IndexVec};

use crate::token::TokenKind;

define_idx!(pub struct TokenIdx);
define_idx!(pub struct LiteralIdx);
define_idx!(pub struct IdentIdx);

/// A half-open `[start, end)` range of token indices, the unit of
/// diagnostic highlighting (§4.2 `range_from`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenRange {
    pub start: TokenIdx,
    pub end: TokenIdx,
}

/// The reconstructed excerpt for a token or token range (§4.2 `source_info`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceInfo {
    pub line_begin: u32,
    pub line_end: u32,
    pub lines_view: String,
    pub expr_view: String,
}

/// Append-only during lexing, read-only during parsing.
pub struct TokenBuffer {
    kinds: Vec<TokenKind>,
    lines: Vec<u32>,
    columns: Vec<u32>,
    lengths: Vec<u32>,
    end_lines: Vec<u32>,
    literal_payloads: Vec<Option<LiteralIdx>>,
    ident_payloads: Vec<Option<IdentIdx>>,

    literals: IndexVec<LiteralIdx, u64>,
    identifiers: IndexVec<IdentIdx, Symbol>,

    /// Every full source line seen so far, 1-indexed via `lines[n-1]`.
    source_lines: Vec<String>,

    /// Formatting strings produced by `format!`-style diagnostic calls;
    /// kept alive here so views into them stay valid through reporting.
    format_scratch: Vec<String>,

    #[cfg(debug_assertions)]
    buffer_id: u64,
}

#[cfg(debug_assertions)]
static NEXT_BUFFER_ID: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);

impl TokenBuffer {
    pub fn new() -> Self {
        TokenBuffer {
            kinds: Vec::new(),
            lines: Vec::new(),
            columns: Vec::new(),
            lengths: Vec::new(),
            end_lines: Vec::new(),
            literal_payloads: Vec::new(),
            ident_payloads: Vec::new(),
            literals: IndexVec::new(),
            identifiers: IndexVec::new(),
            source_lines: Vec::new(),
            format_scratch: Vec::new(),
            #[cfg(debug_assertions)]
            buffer_id: NEXT_BUFFER_ID.fetch_add(1, std::sync::atomic::Ordering::Relaxed),
        }
    }

    /// Records the full source text so `source_info` can reconstruct
    /// excerpts later; call once before lexing begins.
    pub fn set_source(&mut self, source: &str) {
        self.source_lines = source.lines().map(str::to_owned).collect();
        if self.source_lines.is_empty() {
            self.source_lines.push(String::new());
        }
    }

    fn push_common(&mut self, kind: TokenKind, line: u32, column: u32, length: u32) -> TokenIdx {
        let idx = TokenIdx::from_usize(self.kinds.len());
        self.kinds.push(kind);
        self.lines.push(line);
        self.columns.push(column);
        self.lengths.push(length);
        self.end_lines.push(line);
        self.literal_payloads.push(None);
        self.ident_payloads.push(None);
        idx
    }

    pub fn append_token(&mut self, kind: TokenKind, line: u32, column: u32, length: u32) -> TokenIdx {
        self.push_common(kind, line, column, length)
    }

    /// Records the token's `end_line`, for tokens spanning multiple source
    /// lines (e.g. unterminated multi-line comments recovering with an
    /// error token).
    pub fn set_end_line(&mut self, token: TokenIdx, end_line: u32) {
        self.end_lines[token.index()] = end_line;
    }

    pub fn append_literal(
        &mut self,
        value: u64,
        kind: TokenKind,
        line: u32,
        column: u32,
        length: u32,
    ) -> TokenIdx {
        let idx = self.push_common(kind, line, column, length);
        let literal_idx = self.literals.push(value);
        self.literal_payloads[idx.index()] = Some(literal_idx);
        idx
    }

    pub fn append_identifier(
        &mut self,
        view: Symbol,
        kind: TokenKind,
        line: u32,
        column: u32,
        length: u32,
    ) -> TokenIdx {
        let idx = self.push_common(kind, line, column, length);
        let ident_idx = self.identifiers.push(view);
        self.ident_payloads[idx.index()] = Some(ident_idx);
        idx
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn kind(&self, token: TokenIdx) -> TokenKind {
        self.kinds[token.index()]
    }

    pub fn as_kinds(&self) -> &[TokenKind] {
        &self.kinds
    }

    pub fn line(&self, token: TokenIdx) -> u32 {
        self.lines[token.index()]
    }

    pub fn column(&self, token: TokenIdx) -> u32 {
        self.columns[token.index()]
    }

    pub fn length(&self, token: TokenIdx) -> u32 {
        self.lengths[token.index()]
    }

    pub fn literal(&self, token: TokenIdx) -> Option<u64> {
        let idx = self.literal_payloads[token.index()]?;
        self.literals.get(idx).copied()
    }

    pub fn identifier(&self, token: TokenIdx) -> Option<Symbol> {
        let idx = self.ident_payloads[token.index()]?;
        self.identifiers.get(idx).copied()
    }

    /// Ends the buffer with exactly one EOF token, per invariant 6 (§8).
    pub fn has_trailing_eof(&self) -> bool {
        matches!(self.kinds.last(), Some(TokenKind::Eof))
            && self.kinds.iter().rev().skip(1).all(|k| *k != TokenKind::Eof)
    }

    pub fn range_from(&self, start: TokenIdx, end: TokenIdx) -> TokenRange {
        TokenRange { start, end }
    }

    fn line_text(&self, line: u32) -> &str {
        self.source_lines
            .get(line.saturating_sub(1) as usize)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn source_info(&self, token: TokenIdx) -> SourceInfo {
        let line_begin = self.line(token);
        let line_end = self.end_lines[token.index()].max(line_begin);
        let lines_view: String = (line_begin..=line_end)
            .map(|l| self.line_text(l))
            .collect::<Vec<_>>()
            .join("\n");

        let col = self.column(token).saturating_sub(1) as usize;
        let len = self.length(token) as usize;
        let first_line = self.line_text(line_begin);
        let expr_view = if line_begin == line_end {
            first_line
                .get(col..(col + len).min(first_line.len()))
                .unwrap_or("")
                .to_string()
        } else {
            lines_view.clone()
        };

        SourceInfo { line_begin, line_end, lines_view, expr_view }
    }

    /// `source_info` over a half-open token range; concatenates the
    /// endpoints' excerpts per §4.2.
    pub fn source_info_range(&self, range: TokenRange) -> SourceInfo {
        if range.start == range.end {
            return self.source_info(range.start);
        }
        let start_info = self.source_info(range.start);
        let last = TokenIdx::from_usize(range.end.index().saturating_sub(1).max(range.start.index()));
        let end_info = self.source_info(last);

        let line_begin = start_info.line_begin;
        let line_end = end_info.line_end.max(line_begin);
        let lines_view: String = (line_begin..=line_end)
            .map(|l| self.line_text(l))
            .collect::<Vec<_>>()
            .join("\n");
        SourceInfo {
            line_begin,
            line_end,
            lines_view,
            expr_view: format!("{}{}", start_info.expr_view, end_info.expr_view),
        }
    }

    /// Stashes a formatted diagnostic string so a `&str` view into it can
    /// outlive the call that produced it, until the buffer is reset.
    pub fn intern_format(&mut self, s: String) -> &str {
        self.format_scratch.push(s);
        self.format_scratch.last().unwrap()
    }

    #[cfg(debug_assertions)]
    pub fn buffer_id(&self) -> u64 {
        self.buffer_id
    }
}

impl Default for TokenBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_token_returns_stable_index() {
        let mut buf = TokenBuffer::new();
        buf.set_source("let x = 1;");
        let t0 = buf.append_token(TokenKind::KwLet, 1, 1, 3);
        let t1 = buf.append_token(TokenKind::Eof, 1, 11, 0);
        assert_eq!(buf.kind(t0), TokenKind::KwLet);
        assert_eq!(buf.kind(t1), TokenKind::Eof);
    }

    #[test]
    fn source_info_expr_is_substring_of_lines() {
        let mut buf = TokenBuffer::new();
        buf.set_source("let x = 1;");
        let t = buf.append_token(TokenKind::KwLet, 1, 1, 3);
        let info = buf.source_info(t);
        assert!(info.lines_view.contains(&info.expr_view));
        assert_eq!(info.expr_view, "let");
    }

    #[test]
    fn range_from_same_token_matches_single_source_info() {
        let mut buf = TokenBuffer::new();
        buf.set_source("x");
        let t = buf.append_token(TokenKind::Ident, 1, 1, 1);
        let range = buf.range_from(t, t);
        assert_eq!(buf.source_info_range(range), buf.source_info(t));
    }

    #[test]
    fn literal_and_identifier_round_trip_through_payload() {
        let mut buf = TokenBuffer::new();
        buf.set_source("42 x");
        let mut strings = StringTable::new();
        let lit = buf.append_literal(42, TokenKind::IntLiteral, 1, 1, 2);
        let sym = strings.intern("x");
        let ident = buf.append_identifier(sym, TokenKind::Ident, 1, 4, 1);
        assert_eq!(buf.literal(lit), Some(42));
        assert_eq!(buf.identifier(ident), Some(sym));
    }

    #[test]
    fn ends_with_exactly_one_eof() {
        let mut buf = TokenBuffer::new();
        buf.set_source("x");
        buf.append_token(TokenKind::Ident, 1, 1, 1);
        buf.append_token(TokenKind::Eof, 1, 2, 0);
        assert!(buf.has_trailing_eof());
    }
}
