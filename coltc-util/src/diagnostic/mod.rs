//! Diagnostics: levels, codes, builder, and the composable reporter stack.

pub mod builder;
pub mod codes;
pub mod level;
pub mod reporter;

pub use builder::{Diagnostic, DiagnosticBuilder, SourceSnippet};
pub use codes::DiagnosticCode;
pub use level::{ColorConfig, Level};
pub use reporter::{Console, Filter, Limiter, Reporter, Sink, UNLIMITED};
