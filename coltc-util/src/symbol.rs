//! String interning.
//!
//! Identifiers and string literals are interned once and referred to by a
//! cheap `Copy` handle afterward. The backing bytes live in a `bumpalo`
//! arena for the lifetime of the table and are leaked to `'static` so that
//! a `Symbol` can be compared, hashed, and displayed without borrowing
//! anything.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use rustc_hash::FxHashMap;

use crate::error::{SymbolError, SymbolResult};

/// An interned string handle.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol {
    index: u32,
}

impl Symbol {
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.index
    }

    #[inline]
    pub fn from_u32_unchecked(index: u32) -> Self {
        Symbol { index }
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.index)
    }
}

/// An arena-backed string interner.
///
/// Hash collisions are resolved by an exact string comparison against the
/// already-interned candidate before accepting a miss, so a 64-bit hash
/// collision can never silently alias two distinct strings.
pub struct StringTable {
    index: FxHashMap<u64, Vec<u32>>,
    strings: Vec<&'static str>,
    arena: bumpalo::Bump,
}

impl StringTable {
    pub fn new() -> Self {
        Self {
            index: FxHashMap::default(),
            strings: Vec::new(),
            arena: bumpalo::Bump::new(),
        }
    }

    fn hash_string(s: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        s.hash(&mut hasher);
        hasher.finish()
    }

    /// Interns `s`, returning the existing symbol if already present.
    pub fn intern(&mut self, s: &str) -> Symbol {
        let hash = Self::hash_string(s);

        if let Some(candidates) = self.index.get(&hash) {
            for &idx in candidates {
                if self.strings[idx as usize] == s {
                    return Symbol { index: idx };
                }
            }
        }

        let allocated: &str = self.arena.alloc_str(s);
        // SAFETY: bumpalo never moves or frees a chunk once allocated, and
        // `self.arena` is never dropped before `self` is, so this reference
        // stays valid for as long as any `Symbol` handle derived from it
        // could be looked up. We erase the borrow to `'static` purely so
        // `Symbol::get` doesn't need to thread the table's lifetime through
        // every caller.
        let leaked: &'static str = unsafe { std::mem::transmute(allocated) };

        let idx = self.strings.len() as u32;
        self.strings.push(leaked);
        self.index.entry(hash).or_default().push(idx);
        Symbol { index: idx }
    }

    pub fn get(&self, symbol: Symbol) -> Option<&'static str> {
        self.strings.get(symbol.index as usize).copied()
    }

    pub fn try_get(&self, symbol: Symbol) -> SymbolResult<&'static str> {
        self.get(symbol).ok_or(SymbolError::NotFound { index: symbol.index })
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Default for StringTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_same_string_twice_returns_same_symbol() {
        let mut table = StringTable::new();
        let a = table.intern("hello");
        let b = table.intern("hello");
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_strings_get_distinct_symbols() {
        let mut table = StringTable::new();
        let a = table.intern("foo");
        let b = table.intern("bar");
        assert_ne!(a, b);
    }

    #[test]
    fn round_trips_through_get() {
        let mut table = StringTable::new();
        let sym = table.intern("round_trip");
        assert_eq!(table.get(sym), Some("round_trip"));
    }

    #[quickcheck_macros::quickcheck]
    fn interning_is_idempotent(s: String) -> bool {
        let mut table = StringTable::new();
        let a = table.intern(&s);
        let b = table.intern(&s);
        a == b && table.get(a) == Some(table.get(b).unwrap())
    }
}
