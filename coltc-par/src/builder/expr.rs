//! Expression parsing: Pratt-style precedence climbing over a primary
//! grammar of literals, variable reads, parenthesized groups, unary
//! operators and `as`/`bit_as` conversions (§4.4.1 - §4.4.4).

use coltc_lex::token::TokenKind;
use coltc_util::index_vec::Idx;

use crate::expr::{ProdExprKind, ProdExprToken};
use crate::types::{BinaryOp, TypeToken, UnaryOp};

use super::{AstBuilder, ParseResult, RecursionExceeded};

/// `(left_bp, right_bp)`; a higher number binds tighter. Assignment is
/// lowest and right-associative, comparisons sit below arithmetic so a
/// chain like `a < b < c` is captured whole by [`parse_comparison_chain`]
/// before ordinary binary folding ever sees it.
fn infix_binding_power(kind: TokenKind) -> Option<(u8, u8)> {
    match kind {
        TokenKind::OrOr => Some((1, 2)),
        TokenKind::AndAnd => Some((3, 4)),
        TokenKind::Pipe => Some((5, 6)),
        TokenKind::Caret => Some((7, 8)),
        TokenKind::Ampersand => Some((9, 10)),
        TokenKind::Shl | TokenKind::Shr => Some((11, 12)),
        TokenKind::Plus | TokenKind::Minus => Some((13, 14)),
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Some((15, 16)),
        _ => None,
    }
}

fn token_to_binop(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Plus => Some(BinaryOp::Add),
        TokenKind::Minus => Some(BinaryOp::Sub),
        TokenKind::Star => Some(BinaryOp::Mul),
        TokenKind::Slash => Some(BinaryOp::Div),
        TokenKind::Percent => Some(BinaryOp::Rem),
        TokenKind::Ampersand => Some(BinaryOp::BitAnd),
        TokenKind::Pipe => Some(BinaryOp::BitOr),
        TokenKind::Caret => Some(BinaryOp::BitXor),
        TokenKind::Shl => Some(BinaryOp::Shl),
        TokenKind::Shr => Some(BinaryOp::Shr),
        TokenKind::AndAnd => Some(BinaryOp::And),
        TokenKind::OrOr => Some(BinaryOp::Or),
        _ => None,
    }
}

fn comparison_binop(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Lt => Some(BinaryOp::Lt),
        TokenKind::LtEq => Some(BinaryOp::LtEq),
        TokenKind::EqEq => Some(BinaryOp::Eq),
        TokenKind::Gt => Some(BinaryOp::Gt),
        TokenKind::GtEq => Some(BinaryOp::GtEq),
        TokenKind::NotEq => Some(BinaryOp::NotEq),
        _ => None,
    }
}

/// The four mutually-exclusive comparison "families" (§4.4.3). Operators
/// within a family chain onto one another (`a < b <= c`); crossing
/// families (`a < b == c`) is a diagnosed error.
fn comparison_family(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::Lt | BinaryOp::LtEq => 0,
        BinaryOp::Eq => 1,
        BinaryOp::Gt | BinaryOp::GtEq => 2,
        BinaryOp::NotEq => 3,
        _ => unreachable!("comparison_family called on a non-comparison op"),
    }
}

fn op_symbol(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Lt => "<",
        BinaryOp::LtEq => "<=",
        BinaryOp::Eq => "==",
        BinaryOp::Gt => ">",
        BinaryOp::GtEq => ">=",
        BinaryOp::NotEq => "!=",
        _ => "?",
    }
}

fn family_description(family: u8) -> &'static str {
    match family {
        0 => "'<' or '<='",
        1 => "'=='",
        2 => "'>' or '>='",
        _ => "'!='",
    }
}

impl<'a> AstBuilder<'a> {
    pub(crate) fn parse_expr(&mut self) -> ParseResult<ProdExprToken> {
        self.parse_assignment()
    }

    /// Assignment binds loosest and is right-associative: `a = b = c`
    /// parses as `a = (b = c)`. Resolves the historical ambiguity over
    /// whether assignment actually produces a write node rather than
    /// silently returning the left-hand side unchanged (§9): it always
    /// consumes the right-hand side and emits `VarWrite`/`GlobalWrite`/
    /// `PointerStore`.
    fn parse_assignment(&mut self) -> ParseResult<ProdExprToken> {
        let lhs = self.parse_comparison_chain()?;

        if self.current_kind() != TokenKind::Eq {
            return Ok(lhs);
        }
        let eq_start = self.cursor_index();
        self.bump();
        let rhs = self.parse_assignment()?;
        Ok(self.build_write(lhs, rhs, eq_start))
    }

    fn build_write(&mut self, target: ProdExprToken, value: ProdExprToken, start_idx: usize) -> ProdExprToken {
        let range = self.arena.prod(target).range;
        let ty = self.arena.prod(target).ty;
        let _ = start_idx;
        match self.arena.prod(target).kind.clone() {
            ProdExprKind::VarRead { local } => self.arena.add_var_write(local, value, ty, range),
            ProdExprKind::GlobalRead { global } => self.arena.add_global_write(global, value, ty, range),
            ProdExprKind::PointerLoad { pointer } => {
                let pointee_ty = ty;
                self.arena.add_pointer_store(pointer, value, true, pointee_ty, range)
            }
            _ => {
                self.report_error_range("left-hand side of '=' is not assignable", range);
                self.arena.add_error(range, self.error_type())
            }
        }
    }

    /// Captures a run of same-family comparisons and desugars it into a
    /// conjunction of adjacent pairs (§4.4.3): `a < b < c` becomes
    /// `(a < b) && (b < c)`. A second comparison from a different family
    /// is a diagnosed error; parsing continues past it so the rest of the
    /// statement still gets parsed.
    fn parse_comparison_chain(&mut self) -> ParseResult<ProdExprToken> {
        let mut lhs = self.parse_binary(0)?;
        let Some(first_op) = comparison_binop(self.current_kind()) else {
            return Ok(lhs);
        };
        let family = comparison_family(first_op);
        let op_start = self.cursor_index();
        self.bump();
        let mut rhs = self.parse_binary(0)?;
        let mut chain = self.make_comparison(first_op, lhs, rhs);
        let mut prev_operand = rhs;

        loop {
            let Some(next_op) = comparison_binop(self.current_kind()) else { break };
            if comparison_family(next_op) != family {
                self.report_error_range(
                    &format!("'{}' cannot be chained with {}", op_symbol(next_op), family_description(family)),
                    self.arena.prod(chain).range,
                );
                break;
            }
            self.bump();
            lhs = prev_operand;
            rhs = self.parse_binary(0)?;
            let link = self.make_comparison(next_op, lhs, rhs);
            let bool_ty = self.types_mut().intern_builtin(crate::types::BuiltinType::Bool);
            let range = self.arena.prod(chain).range;
            chain = self.arena.add_binary(BinaryOp::And, chain, link, bool_ty, range);
            prev_operand = rhs;
        }

        let _ = op_start;
        Ok(chain)
    }

    pub(crate) fn make_comparison(&mut self, op: BinaryOp, lhs: ProdExprToken, rhs: ProdExprToken) -> ProdExprToken {
        let bool_ty = self.types_mut().intern_builtin(crate::types::BuiltinType::Bool);
        let range = self.arena.prod(lhs).range;
        match self.fold_binary(op, lhs, rhs, bool_ty, range) {
            Some(folded) => folded,
            None => self.arena.add_binary(op, lhs, rhs, bool_ty, range),
        }
    }

    fn parse_binary(&mut self, min_bp: u8) -> ParseResult<ProdExprToken> {
        let _guard = self.enter_recursion()?;
        let mut lhs = self.parse_prefix()?;

        loop {
            let Some((lbp, rbp)) = infix_binding_power(self.current_kind()) else { break };
            if lbp < min_bp {
                break;
            }
            let Some(op) = token_to_binop(self.current_kind()) else { break };
            self.bump();
            let rhs = self.parse_binary(rbp)?;
            lhs = self.build_binary(op, lhs, rhs);
        }

        Ok(lhs)
    }

    fn build_binary(&mut self, op: BinaryOp, lhs: ProdExprToken, rhs: ProdExprToken) -> ProdExprToken {
        let lhs_ty = self.arena.prod(lhs).ty;
        let rhs_ty = self.arena.prod(rhs).ty;
        let range = self.arena.prod(lhs).range;

        let result_ty = match self.types_mut().supports_binary(lhs_ty, op, rhs_ty) {
            crate::types::BinarySupport::Builtin => {
                if op.is_comparison() || op.is_logical() {
                    self.types_mut().intern_builtin(crate::types::BuiltinType::Bool)
                } else {
                    lhs_ty
                }
            }
            crate::types::BinarySupport::InvalidOp => {
                self.report_error_range(&format!("operator '{}' is not supported for this type", op_symbol_any(op)), range);
                self.error_type()
            }
            crate::types::BinarySupport::InvalidType => {
                self.report_error_range("operand types are not compatible with this operator", range);
                self.error_type()
            }
        };

        match self.fold_binary(op, lhs, rhs, result_ty, range) {
            Some(folded) => folded,
            None => self.arena.add_binary(op, lhs, rhs, result_ty, range),
        }
    }

    /// Primary grammar with trailing conversion suffixes (§4.4.2): a
    /// primary optionally followed by `as Type` or `bit_as Type`.
    fn parse_prefix(&mut self) -> ParseResult<ProdExprToken> {
        let _guard = self.enter_recursion()?;
        let primary = self.parse_unary()?;
        self.parse_conversion_suffix(primary)
    }

    fn parse_conversion_suffix(&mut self, value: ProdExprToken) -> ParseResult<ProdExprToken> {
        if self.current_kind() != TokenKind::KwAs && self.current_kind() != TokenKind::KwBitAs {
            return Ok(value);
        }
        let bit_cast = self.current_kind() == TokenKind::KwBitAs;
        self.bump();
        let range = self.arena.prod(value).range;
        let Some(target) = self.parse_type_name() else {
            self.report_error_range("expected a type name after a cast", range);
            return Ok(value);
        };

        let from_ty = self.arena.prod(value).ty;
        let support = if bit_cast {
            self.types_mut().bit_castable_to(from_ty, target)
        } else {
            self.types_mut().castable_to(from_ty, target)
        };
        match support {
            crate::types::CastSupport::Builtin => {
                let cast = self.arena.add_cast(value, bit_cast, target, range);
                self.parse_conversion_suffix(cast)
            }
            crate::types::CastSupport::Invalid => {
                let kind = if bit_cast { "bit_as" } else { "as" };
                self.report_error_range(&format!("value cannot be converted with '{kind}'"), range);
                Ok(self.arena.add_error(range, self.error_type()))
            }
        }
    }

    /// Unary prefix operators and address-of/pointer-load (§4.4.1).
    /// A bare unary `+` is deliberately rejected: the grammar has no
    /// unary-plus production, so one is a diagnosed error rather than a
    /// silent no-op.
    fn parse_unary(&mut self) -> ParseResult<ProdExprToken> {
        let _guard = self.enter_recursion()?;
        match self.current_kind() {
            TokenKind::Plus => {
                let start = self.cursor_index();
                self.bump();
                self.report_error_at_current("unary '+' is not a valid operator");
                let _ = start;
                self.parse_unary()
            }
            TokenKind::Minus => self.parse_unary_op(UnaryOp::Neg),
            TokenKind::Bang => self.parse_unary_op(UnaryOp::Not),
            TokenKind::Tilde => self.parse_unary_op(UnaryOp::BitNot),
            TokenKind::Star => self.parse_pointer_load(),
            TokenKind::Ampersand => self.parse_address_of(),
            _ => self.parse_primary(),
        }
    }

    fn parse_unary_op(&mut self, op: UnaryOp) -> ParseResult<ProdExprToken> {
        self.bump();
        let operand = self.parse_unary()?;
        let operand_ty = self.arena.prod(operand).ty;
        let range = self.arena.prod(operand).range;

        let ty = match self.types_mut().supports_unary(operand_ty, op) {
            crate::types::UnarySupport::Builtin => {
                if op == UnaryOp::Not {
                    self.types_mut().intern_builtin(crate::types::BuiltinType::Bool)
                } else {
                    operand_ty
                }
            }
            crate::types::UnarySupport::Invalid => {
                self.report_error_range(&format!("unary '{}' is not supported for this type", unary_symbol(op)), range);
                self.error_type()
            }
        };

        Ok(match self.fold_unary(op, operand, ty, range) {
            Some(folded) => folded,
            None => self.arena.add_unary(op, operand, ty, range),
        })
    }

    /// `*p`: valid only on a non-opaque pointer (§6.1 scenario 6).
    fn parse_pointer_load(&mut self) -> ParseResult<ProdExprToken> {
        self.bump();
        let pointer = self.parse_unary()?;
        let pointer_ty = self.arena.prod(pointer).ty;
        let range = self.arena.prod(pointer).range;

        match self.types_mut().supports_unary(pointer_ty, UnaryOp::Deref) {
            crate::types::UnarySupport::Builtin => {
                let pointee_ty = match self.types_mut().get(pointer_ty) {
                    crate::types::TypeVariant::Pointer { pointee, .. } => pointee,
                    _ => self.error_type(),
                };
                Ok(self.arena.add_pointer_load(pointer, pointee_ty, range))
            }
            crate::types::UnarySupport::Invalid => {
                self.report_error_range("Unary '*' can only be applied on a non-opaque pointer!", range);
                Ok(self.arena.add_error(range, self.error_type()))
            }
        }
    }

    /// `&x`: only ever targets a variable or global read (§4.5); any other
    /// operand is a diagnosed error rather than a `debug_assert!` panic,
    /// since the input here is untrusted source text, not an internal
    /// invariant.
    fn parse_address_of(&mut self) -> ParseResult<ProdExprToken> {
        self.bump();
        let mutable = self.check(TokenKind::KwMut);
        let target = self.parse_unary()?;
        let range = self.arena.prod(target).range;

        if !matches!(self.arena.prod(target).kind, ProdExprKind::VarRead { .. } | ProdExprKind::GlobalRead { .. }) {
            self.report_error_range("'&' can only be applied to a variable", range);
            return Ok(self.arena.add_error(range, self.error_type()));
        }

        let pointee_ty = self.arena.prod(target).ty;
        let pointer_ty = self.types_mut().intern_pointer(pointee_ty, mutable);
        Ok(self.arena.add_address_of(target, mutable, pointer_ty, range))
    }

    /// Literals, identifiers, and parenthesized groups (§4.4.1 base case).
    fn parse_primary(&mut self) -> ParseResult<ProdExprToken> {
        let start = self.cursor;
        match self.current_kind() {
            TokenKind::IntLiteral => {
                let value = self.tokens_literal();
                self.bump();
                let ty = self.types_mut().intern_builtin(crate::types::BuiltinType::I64);
                Ok(self.arena.add_int_literal(value, ty, self.range_since(start)))
            }
            TokenKind::FloatLiteral => {
                let bits = self.tokens_literal();
                self.bump();
                let ty = self.types_mut().intern_builtin(crate::types::BuiltinType::F64);
                Ok(self.arena.add_float_literal(f64::from_bits(bits), ty, self.range_since(start)))
            }
            TokenKind::KwTrue | TokenKind::KwFalse => {
                let value = self.current_kind() == TokenKind::KwTrue;
                self.bump();
                let ty = self.types_mut().intern_builtin(crate::types::BuiltinType::Bool);
                Ok(self.arena.add_bool_literal(value, ty, self.range_since(start)))
            }
            TokenKind::Ident => self.parse_identifier_read(),
            TokenKind::LParen => {
                self.bump();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen, "')'");
                Ok(inner)
            }
            _ => {
                self.report_error_at_current("expected an expression");
                let range = self.range_since(start);
                Ok(self.arena.add_error(range, self.error_type()))
            }
        }
    }

    fn parse_identifier_read(&mut self) -> ParseResult<ProdExprToken> {
        let start = self.cursor;
        let name = self.tokens_identifier();
        self.bump();
        let range = self.range_since(start);

        if let Some(local) = self.locals().resolve(name) {
            let ty = self.locals().get(local).ty;
            return Ok(self.arena.add_var_read(local, ty, range));
        }

        let module = self.current_module();
        match self.modules_ref().lookup_by_qualified_name(module, name) {
            Ok(global) => {
                let resolved = self.modules_ref().resolve_alias_chain(global).unwrap_or(global);
                let ty = self.global_type(resolved);
                Ok(self.arena.add_global_read(resolved, ty, range))
            }
            Err(_) => {
                self.report_error_range("undeclared identifier", range);
                Ok(self.arena.add_error(range, self.error_type()))
            }
        }
    }

    fn global_type(&self, global: crate::module::GlobalId) -> TypeToken {
        match self.modules_ref().global(global) {
            crate::module::GlobalVariant::Function { ty }
            | crate::module::GlobalVariant::Variable { ty }
            | crate::module::GlobalVariant::Type { ty } => ty,
            crate::module::GlobalVariant::Alias { .. } => self.error_type(),
        }
    }

    /// Parses a type name: a built-in keyword, or `ptr` / `ptr.mut.T` /
    /// `ptr.T` for an opaque or pointee-typed pointer (§9 open question:
    /// the pointer-type grammar isn't spelled out by name in the base
    /// spec beyond the `ptr.i32` example in scenario 6, so `ptr` alone is
    /// taken to mean an opaque pointer and `ptr.mut.T` an explicitly
    /// mutable one).
    pub(crate) fn parse_type_name(&mut self) -> Option<TypeToken> {
        let builtin = match self.current_kind() {
            TokenKind::KwBool => Some(crate::types::BuiltinType::Bool),
            TokenKind::KwChar => Some(crate::types::BuiltinType::Char),
            TokenKind::KwI8 => Some(crate::types::BuiltinType::I8),
            TokenKind::KwI16 => Some(crate::types::BuiltinType::I16),
            TokenKind::KwI32 => Some(crate::types::BuiltinType::I32),
            TokenKind::KwI64 => Some(crate::types::BuiltinType::I64),
            TokenKind::KwU8 => Some(crate::types::BuiltinType::U8),
            TokenKind::KwU16 => Some(crate::types::BuiltinType::U16),
            TokenKind::KwU32 => Some(crate::types::BuiltinType::U32),
            TokenKind::KwU64 => Some(crate::types::BuiltinType::U64),
            TokenKind::KwF32 => Some(crate::types::BuiltinType::F32),
            TokenKind::KwF64 => Some(crate::types::BuiltinType::F64),
            TokenKind::KwByte => Some(crate::types::BuiltinType::Byte),
            TokenKind::KwWord => Some(crate::types::BuiltinType::Word),
            TokenKind::KwDword => Some(crate::types::BuiltinType::Dword),
            TokenKind::KwQword => Some(crate::types::BuiltinType::Qword),
            TokenKind::KwVoid => Some(crate::types::BuiltinType::Void),
            _ => None,
        };
        if let Some(builtin) = builtin {
            self.bump();
            return Some(self.types_mut().intern_builtin(builtin));
        }

        if self.current_kind() == TokenKind::KwPtr {
            self.bump();
            if !self.check(TokenKind::Dot) {
                return Some(self.types_mut().intern_opaque_pointer(false));
            }
            let mutable = self.check(TokenKind::KwMut);
            if mutable {
                self.expect(TokenKind::Dot, "'.'");
            }
            let pointee = self.parse_type_name()?;
            return Some(self.types_mut().intern_pointer(pointee, mutable));
        }

        None
    }

    fn tokens_literal(&self) -> u64 {
        self.tokens.literal(self.cursor).unwrap_or(0)
    }

    fn tokens_identifier(&self) -> coltc_util::symbol::Symbol {
        self.tokens.identifier(self.cursor).unwrap_or_else(|| panic!("identifier token without an interned name"))
    }
}

fn op_symbol_any(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Rem => "%",
        BinaryOp::BitAnd => "&",
        BinaryOp::BitOr => "|",
        BinaryOp::BitXor => "^",
        BinaryOp::Shl => "<<",
        BinaryOp::Shr => ">>",
        BinaryOp::And => "&&",
        BinaryOp::Or => "||",
        other => op_symbol(other),
    }
}

fn unary_symbol(op: UnaryOp) -> &'static str {
    match op {
        UnaryOp::Neg => "-",
        UnaryOp::Not => "!",
        UnaryOp::BitNot => "~",
        UnaryOp::Deref => "*",
        UnaryOp::AddressOf => "&",
    }
}

#[cfg(test)]
mod tests {
    use coltc_lex::Lexer;
    use coltc_util::diagnostic::Sink;
    use coltc_util::span::FileId;
    use coltc_util::StringTable;

    use crate::builder::AstBuilder;
    use crate::expr::ProdExprKind;
    use crate::module::ModuleTable;
    use crate::types::TypeBuffer;

    fn parse_one_expr(source: &str) -> (crate::expr::ExprArena, crate::expr::ProdExprToken) {
        let mut strings = StringTable::new();
        let mut sink = Sink;
        let buf = Lexer::new(source, &mut strings, &mut sink, FileId::new(0)).lex();
        let mut types = TypeBuffer::new();
        let root_name = strings.intern("root");
        let mut modules = ModuleTable::new(root_name);
        let mut builder = AstBuilder::new(&buf, &mut strings, &mut types, &mut modules, &mut sink);
        let expr = builder.parse_expr().expect("no recursion overflow in a tiny expression");
        (builder.into_arena(), expr)
    }

    #[test]
    fn addition_then_multiplication_folds_left_to_right_by_precedence() {
        let (arena, expr) = parse_one_expr("2 + 3 * 4");
        assert!(matches!(arena.prod(expr).kind, ProdExprKind::IntLiteral(14)));
    }

    #[test]
    fn comparison_chain_of_same_family_desugars_to_conjunction() {
        let (arena, expr) = parse_one_expr("1 < 2 < 3");
        assert!(matches!(arena.prod(expr).kind, ProdExprKind::Binary { op: crate::types::BinaryOp::And, .. }));
    }

    #[test]
    fn mismatched_comparison_family_reports_and_recovers() {
        let mut strings = StringTable::new();
        let mut sink = Sink;
        let buf = Lexer::new("1 < 2 == 3", &mut strings, &mut sink, FileId::new(0)).lex();
        let mut types = TypeBuffer::new();
        let root_name = strings.intern("root");
        let mut modules = ModuleTable::new(root_name);
        let mut builder = AstBuilder::new(&buf, &mut strings, &mut types, &mut modules, &mut sink);
        let result = builder.parse_expr();
        assert!(result.is_ok());
    }
}
