//! Constant folding (§4.4.4): binary/unary operators on two literal
//! operands evaluate immediately in the AST builder rather than leaving a
//! live operator node behind. Every arithmetic fold reasons about the
//! operand's 64-bit storage slot directly, the same representation the
//! token buffer already uses for literals (§3.2).

use coltc_lex::token_buffer::TokenRange;

use crate::expr::{ProdExprKind, ProdExprToken};
use crate::types::{BinaryOp, BuiltinType, TypeToken, UnaryOp};

use super::AstBuilder;

impl<'a> AstBuilder<'a> {
    /// Folds `lhs op rhs` when both sides are literals of a builtin type,
    /// emitting a warning (gated by [`crate::warn_for::WarnFor`]) for NaN
    /// results, signed/unsigned over/underflow, and out-of-range shifts.
    /// Division and remainder by a literal zero are always an error,
    /// never gated - the base spec's own scenario 2 (§6.1).
    pub(crate) fn fold_binary(
        &mut self,
        op: BinaryOp,
        lhs: ProdExprToken,
        rhs: ProdExprToken,
        ty: TypeToken,
        range: TokenRange,
    ) -> Option<ProdExprToken> {
        let (lhs_kind, rhs_kind) = (self.arena.prod(lhs).kind.clone(), self.arena.prod(rhs).kind.clone());
        let builtin = self.types_mut().get(ty).as_builtin();

        match (lhs_kind, rhs_kind) {
            (ProdExprKind::BoolLiteral(l), ProdExprKind::BoolLiteral(r)) => self.fold_bool_binary(op, l, r, ty, range),
            (ProdExprKind::IntLiteral(l), ProdExprKind::IntLiteral(r)) => {
                let builtin = builtin.unwrap_or(BuiltinType::I64);
                self.fold_int_binary(op, l, r, builtin, ty, range)
            }
            (ProdExprKind::FloatLiteral(l), ProdExprKind::FloatLiteral(r)) => self.fold_float_binary(op, l, r, ty, range),
            _ => None,
        }
    }

    fn fold_bool_binary(&mut self, op: BinaryOp, l: bool, r: bool, ty: TypeToken, range: TokenRange) -> Option<ProdExprToken> {
        let (result_ty, value) = match op {
            BinaryOp::And => (ty, l && r),
            BinaryOp::Or => (ty, l || r),
            BinaryOp::Eq => (self.bool_ty(), l == r),
            BinaryOp::NotEq => (self.bool_ty(), l != r),
            _ => return None,
        };
        Some(self.arena.add_bool_literal(value, result_ty, range))
    }

    fn fold_float_binary(&mut self, op: BinaryOp, l: f64, r: f64, ty: TypeToken, range: TokenRange) -> Option<ProdExprToken> {
        if op.is_comparison() {
            let value = match op {
                BinaryOp::Eq => l == r,
                BinaryOp::NotEq => l != r,
                BinaryOp::Lt => l < r,
                BinaryOp::LtEq => l <= r,
                BinaryOp::Gt => l > r,
                BinaryOp::GtEq => l >= r,
                _ => unreachable!(),
            };
            return Some(self.arena.add_bool_literal(value, self.bool_ty(), range));
        }

        let result = match op {
            BinaryOp::Add => l + r,
            BinaryOp::Sub => l - r,
            BinaryOp::Mul => l * r,
            BinaryOp::Div => l / r,
            BinaryOp::Rem => l % r,
            _ => return None,
        };

        if result.is_nan() && self.warn_for().constant_folding_nan {
            self.report_warning_range("constant folding produced NaN", range);
        }
        Some(self.arena.add_float_literal(result, ty, range))
    }

    fn fold_int_binary(
        &mut self,
        op: BinaryOp,
        l: u64,
        r: u64,
        builtin: BuiltinType,
        ty: TypeToken,
        range: TokenRange,
    ) -> Option<ProdExprToken> {
        if op.is_comparison() {
            let value = if builtin.is_signed() {
                let (l, r) = (l as i64, r as i64);
                match op {
                    BinaryOp::Eq => l == r,
                    BinaryOp::NotEq => l != r,
                    BinaryOp::Lt => l < r,
                    BinaryOp::LtEq => l <= r,
                    BinaryOp::Gt => l > r,
                    BinaryOp::GtEq => l >= r,
                    _ => unreachable!(),
                }
            } else {
                match op {
                    BinaryOp::Eq => l == r,
                    BinaryOp::NotEq => l != r,
                    BinaryOp::Lt => l < r,
                    BinaryOp::LtEq => l <= r,
                    BinaryOp::Gt => l > r,
                    BinaryOp::GtEq => l >= r,
                    _ => unreachable!(),
                }
            };
            return Some(self.arena.add_bool_literal(value, self.bool_ty(), range));
        }

        if op.is_bitwise() && matches!(op, BinaryOp::Shl | BinaryOp::Shr) {
            let bits = builtin.bit_width() as u64;
            if r >= bits && self.warn_for().constant_folding_invalid_shift {
                self.report_warning_range("shift amount is greater than or equal to the operand's bit width", range);
            }
        }

        if matches!(op, BinaryOp::Div | BinaryOp::Rem) && r == 0 {
            self.report_error_range("Integral division by zero is not allowed!", range);
            return Some(self.arena.add_error(range, ty));
        }

        let value = if builtin.is_signed() {
            self.fold_signed(op, l as i64, r as i64, builtin, range)
        } else {
            self.fold_unsigned(op, l, r, builtin, range)
        };
        Some(self.arena.add_int_literal(value, ty, range))
    }

    fn fold_signed(&mut self, op: BinaryOp, l: i64, r: i64, builtin: BuiltinType, range: TokenRange) -> u64 {
        let bits = builtin.bit_width();
        let (wrapped, overflowed) = match op {
            BinaryOp::Add => l.overflowing_add(r),
            BinaryOp::Sub => l.overflowing_sub(r),
            BinaryOp::Mul => l.overflowing_mul(r),
            BinaryOp::Div => l.overflowing_div(r),
            BinaryOp::Rem => l.overflowing_rem(r),
            BinaryOp::BitAnd => (l & r, false),
            BinaryOp::BitOr => (l | r, false),
            BinaryOp::BitXor => (l ^ r, false),
            BinaryOp::Shl => (l.wrapping_shl(r as u32), r as u32 >= bits),
            BinaryOp::Shr => (l.wrapping_shr(r as u32), r as u32 >= bits),
            _ => unreachable!("not a signed-foldable operator"),
        };

        let narrowed = narrow_signed(wrapped, bits);
        let out_of_range = bits < 64 && narrowed != wrapped;
        if (overflowed || out_of_range) && self.warn_for().constant_folding_signed_ou {
            self.report_warning_range("constant expression overflows or underflows its type", range);
        }

        narrowed as u64
    }

    fn fold_unsigned(&mut self, op: BinaryOp, l: u64, r: u64, builtin: BuiltinType, range: TokenRange) -> u64 {
        let bits = builtin.bit_width();
        let (wrapped, overflowed) = match op {
            BinaryOp::Add => l.overflowing_add(r),
            BinaryOp::Sub => l.overflowing_sub(r),
            BinaryOp::Mul => l.overflowing_mul(r),
            BinaryOp::Div => l.overflowing_div(r),
            BinaryOp::Rem => l.overflowing_rem(r),
            BinaryOp::BitAnd => (l & r, false),
            BinaryOp::BitOr => (l | r, false),
            BinaryOp::BitXor => (l ^ r, false),
            BinaryOp::Shl => (l.wrapping_shl(r as u32), r as u32 >= bits),
            BinaryOp::Shr => (l.wrapping_shr(r as u32), r as u32 >= bits),
            _ => unreachable!("not an unsigned-foldable operator"),
        };

        let narrowed = narrow_unsigned(wrapped, bits);
        let out_of_range = bits < 64 && narrowed != wrapped;
        if (overflowed || out_of_range) && self.warn_for().constant_folding_unsigned_ou {
            self.report_warning_range("constant expression overflows or underflows its type", range);
        }

        narrowed
    }

    /// Folds a unary operator applied to a literal operand.
    pub(crate) fn fold_unary(&mut self, op: UnaryOp, operand: ProdExprToken, ty: TypeToken, range: TokenRange) -> Option<ProdExprToken> {
        match (op, self.arena.prod(operand).kind.clone()) {
            (UnaryOp::Neg, ProdExprKind::IntLiteral(v)) => {
                let builtin = self.types_mut().get(ty).as_builtin().unwrap_or(BuiltinType::I64);
                let bits = builtin.bit_width();
                let negated = narrow_signed((v as i64).wrapping_neg(), bits);
                Some(self.arena.add_int_literal(negated as u64, ty, range))
            }
            (UnaryOp::Neg, ProdExprKind::FloatLiteral(v)) => Some(self.arena.add_float_literal(-v, ty, range)),
            (UnaryOp::Not, ProdExprKind::BoolLiteral(v)) => Some(self.arena.add_bool_literal(!v, ty, range)),
            (UnaryOp::BitNot, ProdExprKind::IntLiteral(v)) => {
                let builtin = self.types_mut().get(ty).as_builtin().unwrap_or(BuiltinType::I64);
                let bits = builtin.bit_width();
                let flipped = narrow_unsigned(!v, bits);
                Some(self.arena.add_int_literal(flipped, ty, range))
            }
            _ => None,
        }
    }

    fn bool_ty(&mut self) -> TypeToken {
        self.types_mut().intern_builtin(BuiltinType::Bool)
    }
}

fn narrow_signed(value: i64, bits: u32) -> i64 {
    if bits == 0 || bits >= 64 {
        return value;
    }
    let shift = 64 - bits;
    (value << shift) >> shift
}

fn narrow_unsigned(value: u64, bits: u32) -> u64 {
    if bits == 0 || bits >= 64 {
        return value;
    }
    value & ((1u64 << bits) - 1)
}

#[cfg(test)]
mod tests {
    use coltc_lex::Lexer;
    use coltc_util::diagnostic::{Diagnostic, Level};
    use coltc_util::span::FileId;
    use coltc_util::{Reporter, StringTable};

    use crate::builder::AstBuilder;
    use crate::expr::{ExprArena, ProdExprKind, ProdExprToken};
    use crate::module::ModuleTable;
    use crate::types::TypeBuffer;

    #[derive(Default)]
    struct Recorder {
        messages: Vec<(Level, String)>,
    }

    impl Reporter for Recorder {
        fn report(&mut self, diagnostic: Diagnostic) {
            self.messages.push((diagnostic.level, diagnostic.message));
        }
        fn count_for(&self, level: Level) -> u64 {
            self.messages.iter().filter(|(l, _)| *l == level).count() as u64
        }
    }

    fn fold(source: &str) -> (ExprArena, ProdExprToken, Vec<(Level, String)>) {
        let mut strings = StringTable::new();
        let mut recorder = Recorder::default();
        let buf = Lexer::new(source, &mut strings, &mut recorder, FileId::new(0)).lex();
        let mut types = TypeBuffer::new();
        let root_name = strings.intern("root");
        let mut modules = ModuleTable::new(root_name);
        let mut builder = AstBuilder::new(&buf, &mut strings, &mut types, &mut modules, &mut recorder);
        let expr = builder.parse_expr().unwrap();
        let messages = recorder.messages;
        (builder.into_arena(), expr, messages)
    }

    #[test]
    fn addition_and_multiplication_fold_to_a_single_literal() {
        let (arena, expr, _) = fold("2 + 3 * 4");
        assert!(matches!(arena.prod(expr).kind, ProdExprKind::IntLiteral(14)));
    }

    #[test]
    fn division_by_a_literal_zero_is_always_an_error() {
        let (_arena, _expr, messages) = fold("5 / 0");
        assert!(messages.iter().any(|(level, msg)| *level == Level::Error && msg == "Integral division by zero is not allowed!"));
    }
}
