//! Top-down statement and declaration parsing (§4.4.5 - §4.4.7).

use coltc_lex::token::TokenKind;

use crate::expr::ProdExprKind;
use crate::locals::{INIT, UNDEF};
use crate::types::{BinaryOp, BuiltinType};

use super::{AstBuilder, ParseResult, RecursionExceeded};

impl<'a> AstBuilder<'a> {
    /// One statement: a declaration, a conditional, a `{ ... }` scope, or a
    /// bare expression followed by `;`.
    pub(crate) fn parse_statement(&mut self) -> ParseResult<crate::expr::StmtExprToken> {
        match self.current_kind() {
            TokenKind::KwLet | TokenKind::KwVar => self.parse_var_decl(),
            TokenKind::KwIf => self.parse_condition(),
            TokenKind::LBrace => self.parse_scope_block(),
            TokenKind::KwPublic | TokenKind::KwPrivate => self.parse_visibility_section(),
            _ => self.parse_expr_statement(),
        }
    }

    /// A `public:`/`private:` section marker (§6.2 `redundant_visibility`).
    /// Flips the builder's visibility state for whatever declarations
    /// follow; two markers of the same kind in a row with no change in
    /// between warn as redundant.
    fn parse_visibility_section(&mut self) -> ParseResult<crate::expr::StmtExprToken> {
        let start_idx = self.cursor;
        let public = self.current_kind() == TokenKind::KwPublic;
        self.bump();
        self.expect(TokenKind::Colon, "':'");
        let range = self.range_since(start_idx);

        if self.warn_for().redundant_visibility && self.current_visibility() == Some(public) {
            self.report_warning_range("redundant visibility section marker", range);
        }
        self.set_current_visibility(public);

        Ok(self.arena.add_visibility_section(public, range))
    }

    fn parse_expr_statement(&mut self) -> ParseResult<crate::expr::StmtExprToken> {
        let start_idx = self.cursor;
        let value = self.parse_expr()?;
        self.expect(TokenKind::Semicolon, "';'");
        let range = self.range_since(start_idx);
        Ok(self.arena.add_expr_stmt(value, range))
    }

    /// `var` is "mutable let"; `let` takes an optional `mut`; `var mut` is
    /// redundant and warns (§4.4.5). An uninitialized local must carry an
    /// explicit type annotation. The covered grammar has no function or
    /// module-declaration syntax, so every `let`/`var` statement this
    /// parser reaches declares a local; `GlobalDecl` and the module table
    /// stay reachable only through the identifier-read fallback lookup and
    /// direct `ModuleTable` use, per the "module resolution beyond the
    /// builder's lookup hook" non-goal.
    fn parse_var_decl(&mut self) -> ParseResult<crate::expr::StmtExprToken> {
        let start_idx = self.cursor;

        if self.current_kind() == TokenKind::KwVar {
            self.bump();
            if self.check(TokenKind::KwMut) {
                let range = self.range_since(start_idx);
                self.report_warning_range("redundant 'mut' after 'var'", range);
            }
        } else {
            self.expect(TokenKind::KwLet, "'let'");
            self.check(TokenKind::KwMut);
        }

        let Some(name_idx) = self.expect(TokenKind::Ident, "a variable name") else {
            self.recover();
            let range = self.range_since(start_idx);
            return Ok(self.arena.add_stmt_error(range));
        };
        let name = self
            .tokens
            .identifier(name_idx)
            .unwrap_or_else(|| panic!("identifier token without an interned name"));

        let mut annotated_ty = None;
        if self.check(TokenKind::Colon) {
            annotated_ty = self.parse_type_name();
            if annotated_ty.is_none() {
                self.report_error_at_current("expected a type name");
            }
        }

        self.expect(TokenKind::Eq, "'='");

        let (init, init_ty) = if self.current_kind() == TokenKind::KwUndefined {
            self.bump();
            (None, None)
        } else {
            let value = self.parse_expr()?;
            let ty = self.arena.prod(value).ty;
            (Some(value), Some(ty))
        };

        if init.is_none() && annotated_ty.is_none() {
            let range = self.range_since(start_idx);
            self.report_error_range("an uninitialized declaration must have an explicit type", range);
        }

        let declared_ty = annotated_ty.or(init_ty).unwrap_or_else(|| self.error_type());

        self.expect(TokenKind::Semicolon, "';'");
        let range = self.range_since(start_idx);

        if self.warn_for().var_shadowing && self.locals().shadows(name) {
            self.report_warning_range("declaration shadows an enclosing variable", range);
        }
        let state = if init.is_some() { INIT } else { UNDEF };
        let placeholder = crate::expr::StmtExprToken(0);
        let local = self.locals_mut().push(name, placeholder, state, declared_ty);
        let stmt = self.arena.add_var_decl(name, local, init, range);
        self.locals_mut().get_mut(local).declaration = stmt;
        Ok(stmt)
    }

    /// A `{ ... }` block; owns the ordered list of child statements and of
    /// locals declared directly within it (§3.4, §4.4.6).
    fn parse_scope_block(&mut self) -> ParseResult<crate::expr::StmtExprToken> {
        let _guard = self.enter_recursion()?;
        let start_idx = self.cursor;
        self.bump();

        let mark = self.locals_mut().mark();
        let mut children = Vec::new();
        while !self.at_eof() && self.current_kind() != TokenKind::RBrace {
            let stmt_start = self.cursor_index();
            match self.parse_statement() {
                Ok(stmt) => children.push(stmt),
                Err(RecursionExceeded) => {
                    self.report_error_at_current("exceeded recursion depth");
                    let range = self.range_since(self.cursor);
                    children.push(self.arena.add_stmt_error(range));
                    self.recover();
                }
            }
            if self.cursor_index() == stmt_start && !self.at_eof() {
                self.bump();
            }
        }
        self.expect(TokenKind::RBrace, "'}'");

        let declarations = self.locals().declared_since(mark);
        self.locals_mut().truncate_to(mark);
        let range = self.range_since(start_idx);
        Ok(self.arena.add_scope(children, declarations, range))
    }

    /// A scope is a `{ ... }` block or, where the grammar permits it, a
    /// single statement introduced by `:` (§4.4.6).
    fn parse_scope(&mut self) -> ParseResult<crate::expr::StmtExprToken> {
        if self.current_kind() == TokenKind::LBrace {
            return self.parse_scope_block();
        }

        let _guard = self.enter_recursion()?;
        let start_idx = self.cursor;
        self.expect(TokenKind::Colon, "':' or '{'");

        let mark = self.locals_mut().mark();
        let stmt = self.parse_statement()?;

        let declarations = self.locals().declared_since(mark);
        self.locals_mut().truncate_to(mark);
        let range = self.range_since(start_idx);
        Ok(self.arena.add_scope(vec![stmt], declarations, range))
    }

    /// `if COND SCOPE (elif COND SCOPE)* (else SCOPE)?`. `elif` desugars to
    /// a nested `if` inside the else branch (§4.4.7).
    fn parse_condition(&mut self) -> ParseResult<crate::expr::StmtExprToken> {
        let _guard = self.enter_recursion()?;
        let start_idx = self.cursor;
        self.bump();
        let cond = self.parse_cond_expr()?;
        let then_branch = self.parse_scope()?;

        let else_branch = if self.current_kind() == TokenKind::KwElif {
            Some(self.parse_elif_chain()?)
        } else if self.check(TokenKind::KwElse) {
            Some(self.parse_scope()?)
        } else {
            None
        };

        let range = self.range_since(start_idx);
        Ok(self.arena.add_condition(cond, then_branch, else_branch, range))
    }

    fn parse_elif_chain(&mut self) -> ParseResult<crate::expr::StmtExprToken> {
        let _guard = self.enter_recursion()?;
        let start_idx = self.cursor;
        self.bump();
        let cond = self.parse_cond_expr()?;
        let then_branch = self.parse_scope()?;

        let else_branch = if self.current_kind() == TokenKind::KwElif {
            Some(self.parse_elif_chain()?)
        } else if self.check(TokenKind::KwElse) {
            Some(self.parse_scope()?)
        } else {
            None
        };

        let range = self.range_since(start_idx);
        Ok(self.arena.add_condition(cond, then_branch, else_branch, range))
    }

    /// Parses a conditional's guard and applies the boolean-read rewrite
    /// (§4.4.7): a bare variable/global read of boolean type becomes
    /// `cond == true` so every later pass sees a uniform comparison.
    fn parse_cond_expr(&mut self) -> ParseResult<crate::expr::ProdExprToken> {
        let cond = self.parse_expr()?;
        Ok(self.normalize_condition(cond))
    }

    fn normalize_condition(&mut self, cond: crate::expr::ProdExprToken) -> crate::expr::ProdExprToken {
        let already_comparison = matches!(
            self.arena.prod(cond).kind,
            ProdExprKind::Binary { op, .. } if op.is_comparison() || op == BinaryOp::And || op == BinaryOp::Or
        );
        if already_comparison {
            return cond;
        }
        let is_read = matches!(self.arena.prod(cond).kind, ProdExprKind::VarRead { .. } | ProdExprKind::GlobalRead { .. });
        if !is_read {
            return cond;
        }

        let bool_ty = self.types_mut().intern_builtin(BuiltinType::Bool);
        let range = self.arena.prod(cond).range;
        let true_literal = self.arena.add_bool_literal(true, bool_ty, range);
        self.make_comparison(BinaryOp::Eq, cond, true_literal)
    }
}

#[cfg(test)]
mod tests {
    use coltc_lex::Lexer;
    use coltc_util::diagnostic::Sink;
    use coltc_util::span::FileId;
    use coltc_util::StringTable;

    use crate::builder::AstBuilder;
    use crate::expr::{ExprArena, ProdExprKind, StmtExprKind, StmtExprToken};
    use crate::module::ModuleTable;
    use crate::types::TypeBuffer;

    fn build(source: &str) -> (Vec<StmtExprToken>, ExprArena) {
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
    fn folded_declaration_matches_scenario_one() {
        let (stmts, arena) = build("let x: i32 = 2 + 3 * 4;");
        assert_eq!(stmts.len(), 1);
        let StmtExprKind::VarDecl { init, .. } = arena.stmt(stmts[0]).kind else {
            panic!("expected a variable declaration");
        };
        assert!(matches!(arena.prod(init.unwrap()).kind, ProdExprKind::IntLiteral(14)));
    }

    #[test]
    fn nested_block_comment_does_not_disturb_the_following_statement() {
        let (stmts, arena) = build("/* a /* b */ c */ let z = 1;");
        assert_eq!(stmts.len(), 1);
        assert!(matches!(arena.stmt(stmts[0]).kind, StmtExprKind::VarDecl { .. }));
    }

    #[test]
    fn block_scope_declarations_do_not_leak_past_scope_exit() {
        let (stmts, arena) = build("{ let x = 1; }");
        assert_eq!(stmts.len(), 1);
        let StmtExprKind::Scope { declarations, .. } = &arena.stmt(stmts[0]).kind else {
            panic!("expected a scope");
        };
        assert_eq!(declarations.len(), 1);
    }

    #[test]
    fn comparison_chain_condition_desugars_without_diagnostics() {
        let (stmts, arena) = build("if (1 < 2 < 3) { }");
        assert_eq!(stmts.len(), 1);
        let StmtExprKind::Condition { cond, .. } = arena.stmt(stmts[0]).kind else {
            panic!("expected a condition");
        };
        assert!(matches!(arena.prod(cond).kind, ProdExprKind::Binary { op: crate::types::BinaryOp::And, .. }));
    }

    #[test]
    fn mismatched_comparison_chain_in_a_condition_still_parses_the_body() {
        let (stmts, _arena) = build("if (1 < 2 == 3) { }");
        assert_eq!(stmts.len(), 1);
    }
}
