//! Error types for the shared utility layer.
//!
//! These model *infrastructure* failures (bad index, bad span, interner
//! miss) - never language-level diagnostics. A misplaced comment or an
//! undeclared variable is reported through the diagnostic/reporter stack
//! in `crate::diagnostic`, not through `Result`.

#[derive(Debug, thiserror::Error)]
pub enum SymbolError {
    #[error("failed to intern string: {0}")]
    InternFailed(String),
    #[error("symbol {index} is not present in this table")]
    NotFound { index: u32 },
}

#[derive(Debug, thiserror::Error)]
pub enum SourceMapError {
    #[error("file not found: {0}")]
    FileNotFound(String),
    #[error("invalid span: start={start}, end={end}")]
    InvalidSpan { start: usize, end: usize },
    #[error("span out of bounds: file length {file_len}, span [{span_start}, {span_end})")]
    SpanOutOfBounds { file_len: usize, span_start: usize, span_end: usize },
    #[error("invalid line number {line} (file has {max_lines} lines)")]
    InvalidLineNumber { line: usize, max_lines: usize },
    #[error("failed to extract source text: {0}")]
    ExtractFailed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum IndexVecError {
    #[error("index {index} out of bounds (length {length})")]
    OutOfBounds { index: usize, length: usize },
    #[error("invalid index: {0}")]
    InvalidIndex(String),
}

pub type SymbolResult<T> = Result<T, SymbolError>;
pub type SourceMapResult<T> = Result<T, SourceMapError>;
pub type IndexVecResult<T> = Result<T, IndexVecError>;
