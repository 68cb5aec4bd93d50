//! Source locations and the source map.
//!
//! `Span` is a byte-range plus the line/column of its start, scoped to a
//! `FileId`. `SourceMap` owns the source text of every file in a
//! compilation session and can turn a span back into a rendered excerpt
//! for diagnostics.

use std::sync::Arc;

use crate::error::{SourceMapError, SourceMapResult};

/// Identifies a source file within a `SourceMap`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct FileId(pub usize);

impl FileId {
    pub const DUMMY: FileId = FileId(usize::MAX);

    pub fn new(index: usize) -> Self {
        FileId(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// A byte range in some file, with the line/column of its start recorded
/// for cheap display without re-scanning the source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
    pub file_id: FileId,
}

impl Span {
    pub const DUMMY: Span = Span { start: 0, end: 0, line: 0, column: 0, file_id: FileId::DUMMY };

    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Span { start, end, line, column, file_id: FileId::DUMMY }
    }

    pub fn with_file(start: usize, end: usize, file_id: FileId, line: u32, column: u32) -> Self {
        Span { start, end, line, column, file_id }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// The smallest span covering both `self` and `other`.
    pub fn merge(&self, other: Span) -> Span {
        let start = self.start.min(other.start);
        let end = self.end.max(other.end);
        let (line, column) = if self.start <= other.start {
            (self.line, self.column)
        } else {
            (other.line, other.column)
        };
        Span { start, end, line, column, file_id: self.file_id }
    }
}

/// The full text and line index of one source file.
pub struct SourceFile {
    id: FileId,
    name: String,
    content: Arc<str>,
    line_starts: Arc<[usize]>,
}

fn compute_line_starts(content: &str) -> Vec<usize> {
    let mut starts = vec![0];
    for (i, c) in content.char_indices() {
        if c == '\n' {
            starts.push(i + 1);
        }
    }
    starts
}

impl SourceFile {
    pub fn new(id: FileId, name: impl Into<String>, content: impl Into<Arc<str>>) -> Self {
        let content = content.into();
        let line_starts = compute_line_starts(&content).into();
        SourceFile { id, name: name.into(), content, line_starts }
    }

    pub fn id(&self) -> FileId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// 0-indexed line start offset.
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line).copied()
    }

    pub fn offset_to_line_col(&self, offset: usize) -> (usize, usize) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert_at) => insert_at.saturating_sub(1),
        };
        let col = offset - self.line_starts[line];
        (line, col)
    }

    /// 1-indexed line text, without its trailing newline.
    pub fn line_at(&self, line: usize) -> Option<&str> {
        if line == 0 {
            return None;
        }
        let idx = line - 1;
        let start = *self.line_starts.get(idx)?;
        let end = self.line_starts.get(idx + 1).copied().unwrap_or(self.content.len());
        let text = &self.content[start..end];
        Some(text.trim_end_matches(['\n', '\r']))
    }

    pub fn extract(&self, range: std::ops::Range<usize>) -> SourceMapResult<&str> {
        self.content.get(range.clone()).ok_or(SourceMapError::SpanOutOfBounds {
            file_len: self.content.len(),
            span_start: range.start,
            span_end: range.end,
        })
    }
}

/// Owns every source file in a compilation session and renders spans into
/// human-readable excerpts for diagnostics.
#[derive(Default)]
pub struct SourceMap {
    files: Vec<Arc<SourceFile>>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, name: impl Into<String>, content: impl Into<Arc<str>>) -> FileId {
        let id = FileId(self.files.len());
        self.files.push(Arc::new(SourceFile::new(id, name, content)));
        id
    }

    pub fn get(&self, id: FileId) -> Option<Arc<SourceFile>> {
        self.files.get(id.index()).cloned()
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Renders `"--> name:line:col\n<gutter> | <line>\n<gutter> | <carets>\n"`.
    pub fn format_span(&self, span: Span) -> Option<String> {
        let file = self.get(span.file_id)?;
        let line_text = file.line_at(span.line as usize)?;
        let width = span.line.to_string().len().max(3);
        let start_col = span.column.saturating_sub(1) as usize;
        let caret_len = span.len().max(1);
        Some(format!(
            "--> {}:{}:{}\n{:>width$} | {}\n{:>width$} | {}{}\n",
            file.name(),
            span.line,
            span.column,
            span.line,
            line_text,
            "",
            " ".repeat(start_col),
            "^".repeat(caret_len),
            width = width,
        ))
    }
}
