//! The local variable table (§3.6).
//!
//! A flat, stack-like `Vec<LocalVarInfo>` truncated back to its
//! scope-entry length on scope exit. `faxc-sem/src/scope.rs`'s
//! persistent scope tree keeps every rib alive for the program's whole
//! lifetime, which is right for a persistent lexical-scope tree but
//! wrong for this table: the base spec (§4.4.6) requires scope exit to
//! *shrink* the table back to what it held on entry, so this is a
//! deliberate departure rather than a port (and `faxc-sem` itself was
//! never carried into this workspace).

use coltc_util::index_vec::Idx;
use coltc_util::symbol::Symbol;
use coltc_util::define_idx;

use crate::expr::StmtExprToken;
use crate::types::TypeToken;

define_idx!(pub struct LocalId);

pub const UNDEF: u8 = 0b001;
pub const INIT: u8 = 0b010;
pub const MOVED: u8 = 0b100;

/// Combines two branches' state flags; always has popcount <= 2 for any
/// pair of the three legal single-bit inputs (§8 invariant 4).
pub fn merge_state(a: u8, b: u8) -> u8 {
    a | b
}

#[derive(Clone, Debug)]
pub struct LocalVarInfo {
    pub name: Symbol,
    pub declaration: StmtExprToken,
    pub state: u8,
    pub ty: TypeToken,
}

/// A mark recorded on scope entry; scope exit truncates back to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScopeMark(usize);

#[derive(Default)]
pub struct LocalVarTable {
    locals: Vec<LocalVarInfo>,
}

impl LocalVarTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&self) -> ScopeMark {
        ScopeMark(self.locals.len())
    }

    /// Truncates the table back to a previously recorded mark (§4.4.6).
    pub fn truncate_to(&mut self, mark: ScopeMark) {
        self.locals.truncate(mark.0);
    }

    /// Every local pushed since `mark`, in declaration order - the
    /// declaration list a `Scope` node owns (§3.4).
    pub fn declared_since(&self, mark: ScopeMark) -> Vec<LocalId> {
        (mark.0..self.locals.len()).map(LocalId::from_usize).collect()
    }

    pub fn push(&mut self, name: Symbol, declaration: StmtExprToken, state: u8, ty: TypeToken) -> LocalId {
        let id = LocalId::from_usize(self.locals.len());
        self.locals.push(LocalVarInfo { name, declaration, state, ty });
        id
    }

    pub fn get(&self, id: LocalId) -> &LocalVarInfo {
        &self.locals[id.index()]
    }

    pub fn get_mut(&mut self, id: LocalId) -> &mut LocalVarInfo {
        &mut self.locals[id.index()]
    }

    /// Looks up the innermost (most recently declared) local named `name`
    /// still visible at the current table length, for shadowing checks
    /// and identifier resolution.
    pub fn resolve(&self, name: Symbol) -> Option<LocalId> {
        self.locals
            .iter()
            .enumerate()
            .rev()
            .find(|(_, info)| info.name == name)
            .map(|(i, _)| LocalId::from_usize(i))
    }

    /// True if `name` is already declared anywhere currently visible -
    /// used to emit the `var_shadowing` warning (§6.2).
    pub fn shadows(&self, name: Symbol) -> bool {
        self.resolve(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.locals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coltc_util::symbol::StringTable;

    fn dummy_decl() -> StmtExprToken {
        StmtExprToken(0)
    }

    fn dummy_ty() -> TypeToken {
        TypeToken(0)
    }

    #[test]
    fn scope_exit_truncates_back_to_entry_mark() {
        let mut table = LocalVarTable::new();
        let mut strings = StringTable::new();
        let mark = table.mark();
        let name = strings.intern("x");
        table.push(name, dummy_decl(), INIT, dummy_ty());
        assert_eq!(table.len(), 1);
        table.truncate_to(mark);
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn merge_state_popcount_is_at_most_two() {
        for a in [UNDEF, INIT, MOVED] {
            for b in [UNDEF, INIT, MOVED] {
                assert!(merge_state(a, b).count_ones() <= 2);
            }
        }
    }

    #[test]
    fn merge_state_is_idempotent_on_equal_inputs() {
        assert_eq!(merge_state(INIT, INIT), INIT);
    }

    #[test]
    fn resolve_finds_the_innermost_shadowing_declaration() {
        let mut table = LocalVarTable::new();
        let mut strings = StringTable::new();
        let name = strings.intern("x");
        let outer = table.push(name, dummy_decl(), INIT, dummy_ty());
        let inner = table.push(name, dummy_decl(), INIT, dummy_ty());
        assert_ne!(outer, inner);
        assert_eq!(table.resolve(name), Some(inner));
    }
}
