//! Namespaced module/global symbol storage (§3.5).

use coltc_util::index_vec::Idx;
use coltc_util::symbol::Symbol;
use coltc_util::{define_idx, FxHashMap, IndexVec};

use crate::types::TypeToken;

define_idx!(pub struct ModuleId);
define_idx!(pub struct GlobalId);

/// The compile-time bound on module nesting depth (§3.5).
pub const MAX_MODULE_DEPTH: u32 = 64;

/// What a name in a module's symbol table resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlobalVariant {
    Function { ty: TypeToken },
    Variable { ty: TypeToken },
    Type { ty: TypeToken },
    Alias { target: GlobalId },
}

pub struct Module {
    pub name: Symbol,
    pub parent: Option<ModuleId>,
    pub depth: u32,
    pub children: Vec<ModuleId>,
    pub symbols: FxHashMap<Symbol, GlobalId>,
}

/// Errors resolving a qualified name or an alias chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ModuleError {
    #[error("name not found in module")]
    NotFound,
    #[error("module nesting exceeds the maximum depth of {max}")]
    DepthExceeded { max: u32 },
    #[error("alias chain contains a cycle")]
    AliasCycle,
}

/// Owns every module and global in a compilation session (§9 "Global
/// shared tables" - survives across units; mutation points are
/// `create_child` and `register_global`/alias insertion).
pub struct ModuleTable {
    modules: IndexVec<ModuleId, Module>,
    globals: IndexVec<GlobalId, GlobalVariant>,
    root: ModuleId,
}

impl ModuleTable {
    pub fn new(root_name: Symbol) -> Self {
        let mut modules = IndexVec::new();
        let root = modules.push(Module {
            name: root_name,
            parent: None,
            depth: 0,
            children: Vec::new(),
            symbols: FxHashMap::default(),
        });
        ModuleTable { modules, globals: IndexVec::new(), root }
    }

    pub fn root(&self) -> ModuleId {
        self.root
    }

    pub fn create_child(&mut self, parent: ModuleId, name: Symbol) -> Result<ModuleId, ModuleError> {
        let parent_depth = self.modules[parent].depth;
        if parent_depth + 1 > MAX_MODULE_DEPTH {
            return Err(ModuleError::DepthExceeded { max: MAX_MODULE_DEPTH });
        }
        let child = self.modules.push(Module {
            name,
            parent: Some(parent),
            depth: parent_depth + 1,
            children: Vec::new(),
            symbols: FxHashMap::default(),
        });
        self.modules[parent].children.push(child);
        Ok(child)
    }

    pub fn register_global(&mut self, module: ModuleId, name: Symbol, variant: GlobalVariant) -> GlobalId {
        let id = self.globals.push(variant);
        self.modules[module].symbols.insert(name, id);
        id
    }

    pub fn global(&self, id: GlobalId) -> GlobalVariant {
        self.globals[id]
    }

    pub fn lookup_local(&self, module: ModuleId, name: Symbol) -> Option<GlobalId> {
        self.modules[module].symbols.get(&name).copied()
    }

    /// Walks up the parent chain, resolving `name` against the nearest
    /// enclosing module that declares it.
    pub fn lookup_by_qualified_name(&self, mut module: ModuleId, name: Symbol) -> Result<GlobalId, ModuleError> {
        loop {
            if let Some(id) = self.lookup_local(module, name) {
                return Ok(id);
            }
            match self.modules[module].parent {
                Some(parent) => module = parent,
                None => return Err(ModuleError::NotFound),
            }
        }
    }

    /// Follows `Alias` globals to their ultimate non-alias target, guarding
    /// against a cycle.
    pub fn resolve_alias_chain(&self, mut id: GlobalId) -> Result<GlobalId, ModuleError> {
        let mut seen = std::collections::HashSet::new();
        loop {
            if !seen.insert(id) {
                return Err(ModuleError::AliasCycle);
            }
            match self.global(id) {
                GlobalVariant::Alias { target } => id = target,
                _ => return Ok(id),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coltc_util::symbol::StringTable;

    fn setup() -> (ModuleTable, StringTable) {
        let mut strings = StringTable::new();
        let root_name = strings.intern("root");
        (ModuleTable::new(root_name), strings)
    }

    #[test]
    fn child_module_is_reachable_from_root() {
        let (mut table, mut strings) = setup();
        let child_name = strings.intern("child");
        let child = table.create_child(table.root(), child_name).unwrap();
        assert_eq!(table.modules[child].parent, Some(table.root()));
    }

    #[test]
    fn lookup_by_qualified_name_walks_up_to_parent() {
        let (mut table, mut strings) = setup();
        let name = strings.intern("x");
        let ty = crate::types::TypeToken(0);
        let id = table.register_global(table.root(), name, GlobalVariant::Variable { ty });
        let child_name = strings.intern("child");
        let child = table.create_child(table.root(), child_name).unwrap();
        assert_eq!(table.lookup_by_qualified_name(child, name), Ok(id));
    }

    #[test]
    fn alias_cycle_is_detected() {
        let (mut table, mut strings) = setup();
        let a_name = strings.intern("a");
        let b_name = strings.intern("b");
        let a = table.register_global(table.root(), a_name, GlobalVariant::Alias { target: GlobalId(1) });
        let _b = table.register_global(table.root(), b_name, GlobalVariant::Alias { target: a });
        assert_eq!(table.resolve_alias_chain(a), Err(ModuleError::AliasCycle));
    }
}
