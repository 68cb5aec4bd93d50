//! Fluent diagnostic construction and source-excerpt formatting.

use crate::diagnostic::codes::DiagnosticCode;
use crate::diagnostic::level::Level;
use crate::span::Span;

/// A rendered source-code excerpt attached to a diagnostic.
#[derive(Clone, Debug)]
pub struct SourceSnippet {
    pub line: String,
    pub line_number: usize,
    pub start_column: usize,
    pub end_column: usize,
    pub label: Option<String>,
}

impl SourceSnippet {
    pub fn new(
        line: impl Into<String>,
        line_number: usize,
        start_column: usize,
        end_column: usize,
        label: Option<impl Into<String>>,
    ) -> Self {
        SourceSnippet {
            line: line.into(),
            line_number,
            start_column,
            end_column,
            label: label.map(Into::into),
        }
    }

    pub fn point(line: impl Into<String>, line_number: usize, column: usize) -> Self {
        SourceSnippet::new(line, line_number, column, column + 1, None::<String>)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Renders the two-line gutter-and-caret form described in §6.3: the
    /// numbered source line, then a caret/tilde underline beneath the span.
    pub fn format(&self) -> String {
        let width = self.line_number.to_string().len().max(3);
        let gutter = " ".repeat(width);
        let underline_start = self.start_column.saturating_sub(1);
        let underline_len = (self.end_column.saturating_sub(self.start_column)).max(1);

        let mut out = format!("{:>width$} | {}\n", self.line_number, self.line, width = width);
        out.push_str(&format!("{gutter} | "));
        out.push_str(&" ".repeat(underline_start));
        out.push('^');
        if underline_len > 1 {
            out.push_str(&"~".repeat(underline_len - 1));
        }
        if let Some(label) = &self.label {
            out.push(' ');
            out.push_str(label);
        }
        out.push('\n');
        out
    }
}

/// A fully formed diagnostic, ready for a reporter to render.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
    pub span: Span,
    pub code: Option<DiagnosticCode>,
    pub notes: Vec<String>,
    pub helps: Vec<String>,
    pub snippets: Vec<SourceSnippet>,
}

impl Diagnostic {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Diagnostic {
            level,
            message: message.into(),
            span: Span::DUMMY,
            code: None,
            notes: Vec::new(),
            helps: Vec::new(),
            snippets: Vec::new(),
        }
    }
}

/// Builds a [`Diagnostic`] through chained setters.
pub struct DiagnosticBuilder {
    level: Level,
    message: String,
    span: Span,
    code: Option<DiagnosticCode>,
    notes: Vec<String>,
    helps: Vec<String>,
    snippets: Vec<SourceSnippet>,
}

impl DiagnosticBuilder {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        DiagnosticBuilder {
            level,
            message: message.into(),
            span: Span::DUMMY,
            code: None,
            notes: Vec::new(),
            helps: Vec::new(),
            snippets: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Level::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Level::Warning, message)
    }

    pub fn code(mut self, code: DiagnosticCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.helps.push(help.into());
        self
    }

    pub fn snippet(mut self, snippet: SourceSnippet) -> Self {
        self.snippets.push(snippet);
        self
    }

    pub fn build(self) -> Diagnostic {
        Diagnostic {
            level: self.level,
            message: self.message,
            span: self.span,
            code: self.code,
            notes: self.notes,
            helps: self.helps,
            snippets: self.snippets,
        }
    }

    /// Builds and immediately hands the diagnostic to `reporter`.
    pub fn emit(self, reporter: &mut dyn crate::diagnostic::reporter::Reporter) {
        let diag = self.build();
        reporter.report(diag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_format_has_caret_under_span() {
        let snippet = SourceSnippet::new("let x = 1;", 1, 5, 6, None::<String>);
        let rendered = snippet.format();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "  1 | let x = 1;");
        assert!(lines[1].ends_with('^'));
    }

    #[test]
    fn builder_chains_all_fields() {
        let diag = DiagnosticBuilder::error("bad thing")
            .code(DiagnosticCode::new("E_TEST", 1))
            .note("a note")
            .help("a help")
            .build();
        assert_eq!(diag.level, Level::Error);
        assert_eq!(diag.notes.len(), 1);
        assert_eq!(diag.helps.len(), 1);
        assert!(diag.code.is_some());
    }
}
