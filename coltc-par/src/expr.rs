//! Producer/statement expression arenas (§3.4, §4.5).
//!
//! Two disjoint handle spaces index into two node arenas. Nodes are
//! idiomatic data-carrying enum variants rather than a packed
//! discriminant-plus-padding-bytes layout - the base spec itself allows
//! this ("implementations may prefer pattern matching where the target
//! language offers it", §9) and Rust's enum layout already gives cheap,
//! safe downcasts via `match`.

use coltc_lex::token_buffer::TokenRange;
use coltc_util::index_vec::Idx;
use coltc_util::symbol::Symbol;
use coltc_util::{define_idx, IndexVec};

use crate::locals::LocalId;
use crate::module::GlobalId;
use crate::types::{BinaryOp, TypeToken, UnaryOp};

define_idx!(pub struct ProdExprToken);
define_idx!(pub struct StmtExprToken);

/// An expression that produces a value (§3.4).
#[derive(Clone, Debug)]
pub enum ProdExprKind {
    Error,
    IntLiteral(u64),
    FloatLiteral(f64),
    BoolLiteral(bool),
    Unary { op: UnaryOp, operand: ProdExprToken },
    Binary { op: BinaryOp, lhs: ProdExprToken, rhs: ProdExprToken },
    Cast { value: ProdExprToken, bit_cast: bool },
    AddressOf { target: ProdExprToken, mutable: bool },
    PointerLoad { pointer: ProdExprToken },
    VarRead { local: LocalId },
    GlobalRead { global: GlobalId },
    Call { callee: GlobalId, args: Vec<ProdExprToken> },
    Move { value: ProdExprToken },
    Copy { value: ProdExprToken },
    ConditionalMove { cond: ProdExprToken, if_true: ProdExprToken, if_false: ProdExprToken },
    VarWrite { local: LocalId, value: ProdExprToken },
    PointerStore { pointer: ProdExprToken, value: ProdExprToken },
    GlobalWrite { global: GlobalId, value: ProdExprToken },
    NoOp,
}

#[derive(Clone, Debug)]
pub struct ProdExpr {
    pub kind: ProdExprKind,
    pub ty: TypeToken,
    pub range: TokenRange,
}

/// A statement-level expression (§3.4).
#[derive(Clone, Debug)]
pub enum StmtExprKind {
    Error,
    /// A bare producer expression used for its side effect (e.g. `*p;`,
    /// an assignment statement).
    ExprStmt { value: ProdExprToken },
    VarDecl { name: Symbol, local: LocalId, init: Option<ProdExprToken> },
    GlobalDecl { name: Symbol, global: GlobalId, init: ProdExprToken },
    Scope { children: Vec<StmtExprToken>, declarations: Vec<LocalId> },
    Condition { cond: ProdExprToken, then_branch: StmtExprToken, else_branch: Option<StmtExprToken> },
    /// A `public:`/`private:` section marker; carries no declarations of
    /// its own, only flips the builder's current visibility state.
    VisibilitySection { public: bool },
}

#[derive(Clone, Debug)]
pub struct StmtExpr {
    pub kind: StmtExprKind,
    pub range: TokenRange,
}

/// Owns both expression arenas for one compilation unit. Nodes are never
/// freed individually and live for the whole unit; cross-references use
/// handles, never pointers, so either arena may relocate on growth
/// without invalidating a previously issued handle.
#[derive(Default)]
pub struct ExprArena {
    prods: IndexVec<ProdExprToken, ProdExpr>,
    stmts: IndexVec<StmtExprToken, StmtExpr>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prod(&self, token: ProdExprToken) -> &ProdExpr {
        &self.prods[token]
    }

    pub fn stmt(&self, token: StmtExprToken) -> &StmtExpr {
        &self.stmts[token]
    }

    pub fn add_error(&mut self, range: TokenRange, error_type: TypeToken) -> ProdExprToken {
        self.prods.push(ProdExpr { kind: ProdExprKind::Error, ty: error_type, range })
    }

    pub fn add_int_literal(&mut self, value: u64, ty: TypeToken, range: TokenRange) -> ProdExprToken {
        self.prods.push(ProdExpr { kind: ProdExprKind::IntLiteral(value), ty, range })
    }

    pub fn add_float_literal(&mut self, value: f64, ty: TypeToken, range: TokenRange) -> ProdExprToken {
        self.prods.push(ProdExpr { kind: ProdExprKind::FloatLiteral(value), ty, range })
    }

    pub fn add_bool_literal(&mut self, value: bool, ty: TypeToken, range: TokenRange) -> ProdExprToken {
        self.prods.push(ProdExpr { kind: ProdExprKind::BoolLiteral(value), ty, range })
    }

    pub fn add_unary(&mut self, op: UnaryOp, operand: ProdExprToken, ty: TypeToken, range: TokenRange) -> ProdExprToken {
        self.prods.push(ProdExpr { kind: ProdExprKind::Unary { op, operand }, ty, range })
    }

    pub fn add_binary(
        &mut self,
        op: BinaryOp,
        lhs: ProdExprToken,
        rhs: ProdExprToken,
        ty: TypeToken,
        range: TokenRange,
    ) -> ProdExprToken {
        self.prods.push(ProdExpr { kind: ProdExprKind::Binary { op, lhs, rhs }, ty, range })
    }

    pub fn add_cast(&mut self, value: ProdExprToken, bit_cast: bool, ty: TypeToken, range: TokenRange) -> ProdExprToken {
        self.prods.push(ProdExpr { kind: ProdExprKind::Cast { value, bit_cast }, ty, range })
    }

    /// `&x` only ever targets a variable read; its pointee's mutability is
    /// the addressed variable's own mutability (§4.5).
    pub fn add_address_of(
        &mut self,
        target: ProdExprToken,
        mutable: bool,
        pointer_ty: TypeToken,
        range: TokenRange,
    ) -> ProdExprToken {
        debug_assert!(
            matches!(self.prods[target].kind, ProdExprKind::VarRead { .. } | ProdExprKind::GlobalRead { .. }),
            "address-of must target a variable or global read"
        );
        self.prods.push(ProdExpr { kind: ProdExprKind::AddressOf { target, mutable }, ty: pointer_ty, range })
    }

    pub fn add_pointer_load(&mut self, pointer: ProdExprToken, pointee_ty: TypeToken, range: TokenRange) -> ProdExprToken {
        self.prods.push(ProdExpr { kind: ProdExprKind::PointerLoad { pointer }, ty: pointee_ty, range })
    }

    pub fn add_var_read(&mut self, local: LocalId, ty: TypeToken, range: TokenRange) -> ProdExprToken {
        self.prods.push(ProdExpr { kind: ProdExprKind::VarRead { local }, ty, range })
    }

    pub fn add_global_read(&mut self, global: GlobalId, ty: TypeToken, range: TokenRange) -> ProdExprToken {
        self.prods.push(ProdExpr { kind: ProdExprKind::GlobalRead { global }, ty, range })
    }

    pub fn add_var_write(&mut self, local: LocalId, value: ProdExprToken, ty: TypeToken, range: TokenRange) -> ProdExprToken {
        self.prods.push(ProdExpr { kind: ProdExprKind::VarWrite { local, value }, ty, range })
    }

    /// Asserts the target is a mutable pointer of matching pointee type
    /// (§4.5); callers must have already checked the pointee types agree.
    pub fn add_pointer_store(
        &mut self,
        pointer: ProdExprToken,
        value: ProdExprToken,
        pointer_is_mutable: bool,
        ty: TypeToken,
        range: TokenRange,
    ) -> ProdExprToken {
        debug_assert!(pointer_is_mutable, "pointer-store target must be a mutable pointer");
        self.prods.push(ProdExpr { kind: ProdExprKind::PointerStore { pointer, value }, ty, range })
    }

    pub fn add_global_write(&mut self, global: GlobalId, value: ProdExprToken, ty: TypeToken, range: TokenRange) -> ProdExprToken {
        self.prods.push(ProdExpr { kind: ProdExprKind::GlobalWrite { global, value }, ty, range })
    }

    pub fn add_no_op(&mut self, ty: TypeToken, range: TokenRange) -> ProdExprToken {
        self.prods.push(ProdExpr { kind: ProdExprKind::NoOp, ty, range })
    }

    pub fn add_stmt_error(&mut self, range: TokenRange) -> StmtExprToken {
        self.stmts.push(StmtExpr { kind: StmtExprKind::Error, range })
    }

    pub fn add_expr_stmt(&mut self, value: ProdExprToken, range: TokenRange) -> StmtExprToken {
        self.stmts.push(StmtExpr { kind: StmtExprKind::ExprStmt { value }, range })
    }

    pub fn add_var_decl(
        &mut self,
        name: Symbol,
        local: LocalId,
        init: Option<ProdExprToken>,
        range: TokenRange,
    ) -> StmtExprToken {
        self.stmts.push(StmtExpr { kind: StmtExprKind::VarDecl { name, local, init }, range })
    }

    pub fn add_global_decl(&mut self, name: Symbol, global: GlobalId, init: ProdExprToken, range: TokenRange) -> StmtExprToken {
        self.stmts.push(StmtExpr { kind: StmtExprKind::GlobalDecl { name, global, init }, range })
    }

    pub fn add_scope(&mut self, children: Vec<StmtExprToken>, declarations: Vec<LocalId>, range: TokenRange) -> StmtExprToken {
        self.stmts.push(StmtExpr { kind: StmtExprKind::Scope { children, declarations }, range })
    }

    pub fn add_visibility_section(&mut self, public: bool, range: TokenRange) -> StmtExprToken {
        self.stmts.push(StmtExpr { kind: StmtExprKind::VisibilitySection { public }, range })
    }

    pub fn add_condition(
        &mut self,
        cond: ProdExprToken,
        then_branch: StmtExprToken,
        else_branch: Option<StmtExprToken>,
        range: TokenRange,
    ) -> StmtExprToken {
        self.stmts.push(StmtExpr { kind: StmtExprKind::Condition { cond, then_branch, else_branch }, range })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coltc_lex::token_buffer::TokenIdx;

    fn dummy_range() -> TokenRange {
        TokenRange { start: TokenIdx(0), end: TokenIdx(1) }
    }

    #[test]
    fn handles_are_stable_after_many_pushes() {
        let mut arena = ExprArena::new();
        let ty = crate::types::TypeToken(0);
        let first = arena.add_int_literal(1, ty, dummy_range());
        for i in 0..100 {
            arena.add_int_literal(i, ty, dummy_range());
        }
        assert!(matches!(arena.prod(first).kind, ProdExprKind::IntLiteral(1)));
    }

    #[test]
    fn address_of_requires_a_variable_read_target() {
        let mut arena = ExprArena::new();
        let ty = crate::types::TypeToken(0);
        let local = LocalId(0);
        let read = arena.add_var_read(local, ty, dummy_range());
        let addr = arena.add_address_of(read, true, ty, dummy_range());
        assert!(matches!(arena.prod(addr).kind, ProdExprKind::AddressOf { mutable: true, .. }));
    }
}
