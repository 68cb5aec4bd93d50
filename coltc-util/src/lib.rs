//! Shared infrastructure used by every stage of the front-end: typed index
//! vectors for handle arenas, a string interner, source spans and source
//! map, and the diagnostic/reporter stack.

pub mod diagnostic;
pub mod error;
pub mod index_vec;
pub mod span;
pub mod symbol;

pub use diagnostic::{Diagnostic, DiagnosticBuilder, Level, Reporter};
pub use index_vec::{Idx, IndexVec};
pub use span::{FileId, SourceFile, SourceMap, Span};
pub use symbol::{StringTable, Symbol};

pub use rustc_hash::{FxHashMap, FxHashSet};
