//! Recursive-descent AST builder: parsing, name resolution, type
//! checking, and constant folding fused into a single pass (§4, §4.4).

pub mod builder;
pub mod expr;
pub mod locals;
pub mod module;
pub mod types;
pub mod warn_for;

pub use builder::AstBuilder;
pub use expr::{ExprArena, ProdExpr, ProdExprKind, ProdExprToken, StmtExpr, StmtExprKind, StmtExprToken};
pub use locals::{LocalId, LocalVarInfo, LocalVarTable};
pub use module::{GlobalId, GlobalVariant, ModuleError, ModuleId, ModuleTable};
pub use types::{BinaryOp, BinarySupport, BuiltinType, CastSupport, TypeBuffer, TypeToken, TypeVariant, UnaryOp, UnarySupport};
pub use warn_for::WarnFor;
