//! Single-pass lexer and columnar token buffer (§3, §4.1, §4.2).

pub mod cursor;
pub mod lexer;
pub mod token;
pub mod token_buffer;

pub use cursor::Cursor;
pub use lexer::Lexer;
pub use token::TokenKind;
pub use token_buffer::{SourceInfo, TokenBuffer, TokenIdx, TokenRange};
