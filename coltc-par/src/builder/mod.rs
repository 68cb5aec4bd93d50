//! The fused recursive-descent + Pratt parser, name resolver, type
//! checker, constant folder, and diagnostic emitter (§4.4).

mod expr;
mod fold;
mod panic;
mod stmt;

use coltc_lex::token::TokenKind;
use coltc_lex::token_buffer::{TokenBuffer, TokenIdx, TokenRange};
use coltc_util::diagnostic::DiagnosticBuilder;
use coltc_util::span::{FileId, Span};
use coltc_util::symbol::StringTable;
use coltc_util::Reporter;

use crate::expr::ExprArena;
use crate::locals::LocalVarTable;
use crate::module::{ModuleId, ModuleTable};
use crate::types::TypeBuffer;
use crate::warn_for::WarnFor;
pub use panic::PanicConsumer;

/// Bound on parser recursion depth (§4.4.9, §8 "Boundary behaviors").
pub const MAX_RECURSION_DEPTH: u32 = 256;

/// Raised when recursion depth is exceeded; caught at the nearest
/// statement boundary (§4.4.9, §5 "Cancellation").
pub(crate) struct RecursionExceeded;

pub type ParseResult<T> = Result<T, RecursionExceeded>;

/// One builder per compilation unit (§4.4). Borrows the token buffer and
/// the process-wide shared tables, and owns its own expression arena and
/// local variable table.
pub struct AstBuilder<'a> {
    tokens: &'a TokenBuffer,
    cursor: TokenIdx,
    pub(crate) arena: ExprArena,
    strings: &'a mut StringTable,
    types: &'a mut TypeBuffer,
    modules: &'a mut ModuleTable,
    reporter: &'a mut dyn Reporter,
    locals: LocalVarTable,
    warn_for: WarnFor,
    current_module: ModuleId,
    current_visibility: Option<bool>,
    depth: u32,
    pub(crate) panic_consumer: PanicConsumer,
    last_recovery_pos: Option<usize>,
    file_id: FileId,
}

impl<'a> AstBuilder<'a> {
    pub fn new(
        tokens: &'a TokenBuffer,
        strings: &'a mut StringTable,
        types: &'a mut TypeBuffer,
        modules: &'a mut ModuleTable,
        reporter: &'a mut dyn Reporter,
    ) -> Self {
        let current_module = modules.root();
        AstBuilder {
            tokens,
            cursor: TokenIdx(0),
            arena: ExprArena::new(),
            strings,
            types,
            modules,
            reporter,
            locals: LocalVarTable::new(),
            warn_for: WarnFor::default(),
            current_module,
            current_visibility: None,
            depth: 0,
            panic_consumer: PanicConsumer::ToSemicolon,
            last_recovery_pos: None,
            file_id: FileId::new(0),
        }
    }

    pub fn with_warn_for(mut self, warn_for: WarnFor) -> Self {
        self.warn_for = warn_for;
        self
    }

    pub fn with_file_id(mut self, file_id: FileId) -> Self {
        self.file_id = file_id;
        self
    }

    /// Parses the whole unit, emitting one statement per top-level
    /// construct until end-of-file. Recovers at statement boundaries when
    /// the recursion bound is hit.
    pub fn parse_program(&mut self) -> Vec<crate::expr::StmtExprToken> {
        let mut statements = Vec::new();
        while !self.at_eof() {
            let start = self.cursor;
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(RecursionExceeded) => {
                    self.report_error_at_current("exceeded recursion depth");
                    let range = self.range_since(start);
                    statements.push(self.arena.add_stmt_error(range));
                    self.recover();
                }
            }
            if self.cursor == start && !self.at_eof() {
                // Guarantee forward progress even if a sub-parser
                // recognized nothing and didn't consume or recover.
                self.bump();
            }
        }
        statements
    }

    pub fn into_arena(self) -> ExprArena {
        self.arena
    }

    // --- cursor ---

    pub(crate) fn current_kind(&self) -> TokenKind {
        self.tokens.kind(self.cursor)
    }

    pub(crate) fn peek_kind(&self, ahead: usize) -> TokenKind {
        let idx = TokenIdx(self.cursor.0 + ahead as u32);
        if (idx.0 as usize) < self.tokens.len() {
            self.tokens.kind(idx)
        } else {
            TokenKind::Eof
        }
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.current_kind() == TokenKind::Eof
    }

    pub(crate) fn bump(&mut self) -> TokenIdx {
        let current = self.cursor;
        if !self.at_eof() {
            self.cursor = TokenIdx(self.cursor.0 + 1);
        }
        current
    }

    pub(crate) fn check(&mut self, kind: TokenKind) -> bool {
        if self.current_kind() == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind, what: &str) -> Option<TokenIdx> {
        if self.current_kind() == kind {
            Some(self.bump())
        } else {
            self.report_error_at_current(&format!("expected {what}"));
            None
        }
    }

    pub(crate) fn range_since(&self, start: TokenIdx) -> TokenRange {
        self.tokens.range_from(start, self.cursor)
    }

    pub(crate) fn cursor_index(&self) -> usize {
        self.cursor.0 as usize
    }

    // --- diagnostics ---

    fn span_for(&self, idx: TokenIdx) -> Span {
        let start = self.tokens.column(idx) as usize;
        let len = self.tokens.length(idx).max(1) as usize;
        Span::with_file(start, start + len, self.file_id, self.tokens.line(idx), self.tokens.column(idx))
    }

    fn span_for_range(&self, range: TokenRange) -> Span {
        let start = self.span_for(range.start);
        if range.end == range.start {
            return start;
        }
        let last = TokenIdx(range.end.0.saturating_sub(1).max(range.start.0));
        start.merge(self.span_for(last))
    }

    pub(crate) fn report_error_at_current(&mut self, message: &str) {
        let span = self.span_for(self.cursor);
        DiagnosticBuilder::error(message.to_string()).span(span).emit(self.reporter);
    }

    pub(crate) fn report_error_range(&mut self, message: &str, range: TokenRange) {
        let span = self.span_for_range(range);
        DiagnosticBuilder::error(message.to_string()).span(span).emit(self.reporter);
    }

    pub(crate) fn report_warning_range(&mut self, message: &str, range: TokenRange) {
        let span = self.span_for_range(range);
        DiagnosticBuilder::warning(message.to_string()).span(span).emit(self.reporter);
    }

    pub(crate) fn warn_for(&self) -> WarnFor {
        self.warn_for
    }

    pub(crate) fn strings_mut(&mut self) -> &mut StringTable {
        self.strings
    }

    pub(crate) fn types_mut(&mut self) -> &mut TypeBuffer {
        self.types
    }

    pub(crate) fn locals_mut(&mut self) -> &mut LocalVarTable {
        &mut self.locals
    }

    pub(crate) fn locals(&self) -> &LocalVarTable {
        &self.locals
    }

    pub(crate) fn current_module(&self) -> ModuleId {
        self.current_module
    }

    pub(crate) fn current_visibility(&self) -> Option<bool> {
        self.current_visibility
    }

    pub(crate) fn set_current_visibility(&mut self, public: bool) {
        self.current_visibility = Some(public);
    }

    pub(crate) fn modules_mut(&mut self) -> &mut ModuleTable {
        self.modules
    }

    pub(crate) fn modules_ref(&self) -> &ModuleTable {
        self.modules
    }

    pub(crate) fn error_type(&self) -> crate::types::TypeToken {
        self.types.error_type()
    }

    // --- recursion guard ---

    /// Enters one level of parser recursion; the guard decrements on
    /// drop, including on the early-return path (§4.4.9, §9 "Scoped
    /// state").
    pub(crate) fn enter_recursion(&mut self) -> ParseResult<DepthGuard<'_, 'a>> {
        if self.depth >= MAX_RECURSION_DEPTH {
            return Err(RecursionExceeded);
        }
        self.depth += 1;
        Ok(DepthGuard { builder: self })
    }
}

pub(crate) struct DepthGuard<'b, 'a> {
    builder: &'b mut AstBuilder<'a>,
}

impl<'b, 'a> std::ops::Deref for DepthGuard<'b, 'a> {
    type Target = AstBuilder<'a>;
    fn deref(&self) -> &Self::Target {
        self.builder
    }
}

impl<'b, 'a> std::ops::DerefMut for DepthGuard<'b, 'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.builder
    }
}

impl<'b, 'a> Drop for DepthGuard<'b, 'a> {
    fn drop(&mut self) {
        self.builder.depth -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coltc_lex::Lexer;
    use coltc_util::diagnostic::Sink;
    use coltc_util::span::FileId;

    fn build(source: &str) -> (Vec<crate::expr::StmtExprToken>, ExprArena) {
        let mut strings = StringTable::new();
        let mut sink = Sink;
        let buf = Lexer::new(source, &mut strings, &mut sink, FileId::new(0)).lex();
        let mut types = TypeBuffer::new();
        let root_name = strings.intern("root");
        let mut modules = ModuleTable::new(root_name);
        let mut builder = AstBuilder::new(&buf, &mut strings, &mut types, &mut modules, &mut sink);
        let stmts = builder.parse_program();
        (stmts, builder.into_arena())
    }

    #[test]
    fn empty_program_parses_to_no_statements() {
        let (stmts, _arena) = build("");
        assert!(stmts.is_empty());
    }

    #[test]
    fn deeply_nested_parentheses_within_bound_succeed() {
        let mut source = String::new();
        for _ in 0..200 {
            source.push('(');
        }
        source.push('1');
        for _ in 0..200 {
            source.push(')');
        }
        source.push(';');
        let (stmts, _arena) = build(&source);
        assert_eq!(stmts.len(), 1);
    }
}
