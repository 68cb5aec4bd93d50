//! The composable error-reporter stack (§4.3).
//!
//! None of this workspace's lineage has a reporter with this exact shape -
//! `faxc_util::diagnostic::Handler` is a flat `Vec<Diagnostic>` collector.
//! This module builds the pluggable Sink/Console/Filter/Limiter
//! composition the base spec calls for, in the same builder-of-structs
//! idiom `Handler`/`DiagnosticBuilder` already use elsewhere in this crate.
//!
//! Every layer implements [`Reporter`]; layers compose by wrapping one
//! another (`Filter` and `Limiter` both hold a `Box<dyn Reporter>` they
//! forward to).

use std::collections::HashMap;

use crate::diagnostic::builder::Diagnostic;
use crate::diagnostic::level::{ColorConfig, Level};
use crate::span::SourceMap;

/// Something that can accept a finished diagnostic and keep running
/// counts of what it has seen, broken down by severity.
pub trait Reporter {
    fn report(&mut self, diagnostic: Diagnostic);

    fn message_count(&self) -> u64 {
        self.count_for(Level::Note) + self.count_for(Level::Help)
    }
    fn warning_count(&self) -> u64 {
        self.count_for(Level::Warning)
    }
    fn error_count(&self) -> u64 {
        self.count_for(Level::Error)
    }
    fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Per-severity count, used by the default message/warning/error
    /// accessors above; layers that don't track counts themselves (e.g.
    /// `Sink`) can return 0.
    fn count_for(&self, level: Level) -> u64;
}

/// Discards every diagnostic. Counts are always zero.
#[derive(Default)]
pub struct Sink;

impl Reporter for Sink {
    fn report(&mut self, _diagnostic: Diagnostic) {}
    fn count_for(&self, _level: Level) -> u64 {
        0
    }
}

/// Renders diagnostics as text, optionally colored, against a `SourceMap`.
///
/// Header line is `"(X<id>) <message>"` per §6.3; a single-line span is
/// then shown as a gutter+caret pair, a multi-line span as a fully
/// rendered, per-line-prefixed excerpt.
pub struct Console<'a> {
    sources: &'a SourceMap,
    color: ColorConfig,
    is_tty: bool,
    counts: HashMap<Level, u64>,
    out: String,
}

impl<'a> Console<'a> {
    pub fn new(sources: &'a SourceMap, color: ColorConfig, is_tty: bool) -> Self {
        Console { sources, color, is_tty, counts: HashMap::new(), out: String::new() }
    }

    /// Everything rendered so far (tests and non-interactive drivers read
    /// this instead of writing to stdout).
    pub fn rendered(&self) -> &str {
        &self.out
    }

    fn render_header(&self, diagnostic: &Diagnostic) -> String {
        let id = diagnostic
            .code
            .as_ref()
            .map(|c| c.as_string())
            .unwrap_or_default();
        let use_color = self.color.use_color(self.is_tty);
        let (prefix, suffix) = if use_color {
            match diagnostic.level {
                Level::Error => ("\x1b[31m", "\x1b[0m"),
                Level::Warning => ("\x1b[33m", "\x1b[0m"),
                Level::Note | Level::Help => ("\x1b[36m", "\x1b[0m"),
            }
        } else {
            ("", "")
        };
        format!(
            "{prefix}({}{}){suffix} {}\n",
            diagnostic.level.tag(),
            id,
            diagnostic.message
        )
    }

    fn render_excerpt(&self, diagnostic: &Diagnostic) -> Option<String> {
        let file = self.sources.get(diagnostic.span.file_id)?;
        let start_line = diagnostic.span.line as usize;
        let (end_line, _) = file.offset_to_line_col(diagnostic.span.end.saturating_sub(1).max(diagnostic.span.start));
        let end_line = (end_line + 1).max(start_line);

        if end_line <= start_line {
            let line_text = file.line_at(start_line)?;
            let snippet = crate::diagnostic::builder::SourceSnippet::new(
                line_text,
                start_line,
                diagnostic.span.column as usize,
                (diagnostic.span.column as usize) + diagnostic.span.len().max(1),
                None::<String>,
            );
            Some(snippet.format())
        } else {
            let width = end_line.to_string().len().max(3);
            let mut out = String::new();
            for line in start_line..=end_line {
                if let Some(text) = file.line_at(line) {
                    out.push_str(&format!("{:>width$} | {}\n", line, text, width = width));
                }
            }
            Some(out)
        }
    }
}

impl<'a> Reporter for Console<'a> {
    fn report(&mut self, diagnostic: Diagnostic) {
        *self.counts.entry(diagnostic.level).or_insert(0) += 1;
        self.out.push_str(&self.render_header(&diagnostic));
        if let Some(excerpt) = self.render_excerpt(&diagnostic) {
            self.out.push_str(&excerpt);
        }
        for note in &diagnostic.notes {
            self.out.push_str(&format!("  = note: {note}\n"));
        }
        for help in &diagnostic.helps {
            self.out.push_str(&format!("  = help: {help}\n"));
        }
    }

    fn count_for(&self, level: Level) -> u64 {
        self.counts.get(&level).copied().unwrap_or(0)
    }
}

/// Forwards a diagnostic only if `predicate(level)` returns true.
pub struct Filter {
    inner: Box<dyn Reporter>,
    predicate: Box<dyn Fn(Level) -> bool>,
}

impl Filter {
    pub fn new(inner: Box<dyn Reporter>, predicate: impl Fn(Level) -> bool + 'static) -> Self {
        Filter { inner, predicate: Box::new(predicate) }
    }
}

impl Reporter for Filter {
    fn report(&mut self, diagnostic: Diagnostic) {
        if (self.predicate)(diagnostic.level) {
            self.inner.report(diagnostic);
        }
    }

    fn count_for(&self, level: Level) -> u64 {
        self.inner.count_for(level)
    }
}

/// Sentinel disabling the per-severity cap entirely.
pub const UNLIMITED: u64 = u64::MAX;

/// Caps the number of reports forwarded per severity; once the cap is
/// reached, emits a single "No more <severity> will be reported." through
/// the wrapped reporter and suppresses everything after.
pub struct Limiter {
    inner: Box<dyn Reporter>,
    limits: HashMap<Level, u64>,
    seen: HashMap<Level, u64>,
    announced: HashMap<Level, bool>,
}

impl Limiter {
    pub fn new(inner: Box<dyn Reporter>) -> Self {
        Limiter { inner, limits: HashMap::new(), seen: HashMap::new(), announced: HashMap::new() }
    }

    pub fn with_limit(mut self, level: Level, limit: u64) -> Self {
        self.limits.insert(level, limit);
        self
    }
}

impl Reporter for Limiter {
    fn report(&mut self, diagnostic: Diagnostic) {
        let level = diagnostic.level;
        let limit = self.limits.get(&level).copied().unwrap_or(UNLIMITED);
        let seen = self.seen.entry(level).or_insert(0);

        if limit != UNLIMITED && *seen >= limit {
            if !self.announced.get(&level).copied().unwrap_or(false) {
                self.announced.insert(level, true);
                self.inner.report(Diagnostic::new(
                    level,
                    format!("No more {level} will be reported."),
                ));
            }
            return;
        }

        *seen += 1;
        self.inner.report(diagnostic);
    }

    fn count_for(&self, level: Level) -> u64 {
        self.inner.count_for(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::builder::DiagnosticBuilder;

    #[test]
    fn sink_discards_everything() {
        let mut sink = Sink;
        sink.report(DiagnosticBuilder::error("boom").build());
        assert_eq!(sink.error_count(), 0);
    }

    #[test]
    fn filter_suppresses_warnings() {
        let mut filter = Filter::new(Box::new(InMemory::default()), |l| l != Level::Warning);
        filter.report(DiagnosticBuilder::warning("ignored").build());
        filter.report(DiagnosticBuilder::error("kept").build());
        assert_eq!(filter.count_for(Level::Warning), 0);
        assert_eq!(filter.count_for(Level::Error), 1);
    }

    #[test]
    fn limiter_stops_after_cap_and_announces_once() {
        let recorder = InMemory::default();
        let mut limiter = Limiter::new(Box::new(recorder)).with_limit(Level::Error, 2);
        for _ in 0..5 {
            limiter.report(DiagnosticBuilder::error("repeated").build());
        }
        // 2 real errors + 1 announcement, all routed through `inner`.
        assert_eq!(limiter.count_for(Level::Error), 3);
    }

    #[test]
    fn limiter_sentinel_disables_cap() {
        let mut limiter = Limiter::new(Box::new(InMemory::default())).with_limit(Level::Error, UNLIMITED);
        for _ in 0..10 {
            limiter.report(DiagnosticBuilder::error("many").build());
        }
        assert_eq!(limiter.count_for(Level::Error), 10);
    }

    #[derive(Default)]
    struct InMemory {
        counts: HashMap<Level, u64>,
    }

    impl Reporter for InMemory {
        fn report(&mut self, diagnostic: Diagnostic) {
            *self.counts.entry(diagnostic.level).or_insert(0) += 1;
        }
        fn count_for(&self, level: Level) -> u64 {
            self.counts.get(&level).copied().unwrap_or(0)
        }
    }
}
