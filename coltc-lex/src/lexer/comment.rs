//! Whitespace and comment skipping, including nested block comments.

use super::core::CommentDepthExceeded;
use super::core::Lexer;

/// Hard bound on `/* ... */` nesting depth (§4.1). Exceeding it raises
/// [`CommentDepthExceeded`], which `Lexer::lex` turns into an
/// "exceeded recursion depth" diagnostic and an early EOF.
const MAX_COMMENT_DEPTH: u32 = 255;

impl<'a> Lexer<'a> {
    /// Skips runs of whitespace and comments between tokens. Checks for a
    /// leading UTF-8 BOM exactly once, on the very first call.
    pub(crate) fn skip_whitespace_and_comments(&mut self) -> Result<(), CommentDepthExceeded> {
        if !self.bom_checked {
            self.bom_checked = true;
            if self.cursor.remaining().starts_with('\u{feff}') {
                self.cursor.advance();
            }
        }

        loop {
            match self.cursor.current_char() {
                ' ' | '\t' | '\r' | '\n' => {
                    self.cursor.advance();
                }
                '/' if self.cursor.peek_char(1) == '/' => {
                    self.skip_line_comment();
                }
                '/' if self.cursor.peek_char(1) == '*' => {
                    let start = self.cursor.snapshot();
                    self.cursor.advance();
                    self.cursor.advance();
                    self.skip_block_comment(start.position, start.line, start.column)?;
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn skip_line_comment(&mut self) {
        while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
            self.cursor.advance();
        }
    }

    /// Consumes a `/* ... */` comment, already past the opening `/*`.
    /// `outer_line`/`outer_column` track the outermost `/*` so an
    /// unterminated comment reports there, not at the innermost nesting
    /// level where the end-of-file was actually hit.
    fn skip_block_comment(
        &mut self,
        outer_position: usize,
        outer_line: u32,
        outer_column: u32,
    ) -> Result<(), CommentDepthExceeded> {
        let mut depth: u32 = 1;

        loop {
            if self.cursor.is_at_end() {
                self.report_unterminated_comment(outer_position, outer_line, outer_column);
                return Ok(());
            }

            match self.cursor.current_char() {
                '*' if self.cursor.peek_char(1) == '/' => {
                    self.cursor.advance();
                    self.cursor.advance();
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                '/' if self.cursor.peek_char(1) == '*' => {
                    self.cursor.advance();
                    self.cursor.advance();
                    depth += 1;
                    if depth > MAX_COMMENT_DEPTH {
                        return Err(CommentDepthExceeded);
                    }
                }
                _ => self.cursor.advance(),
            }
        }
    }

    fn report_unterminated_comment(&mut self, position: usize, line: u32, column: u32) {
        use coltc_util::diagnostic::DiagnosticBuilder;
        use coltc_util::span::Span;

        let span = Span::with_file(position, self.cursor.position(), self.file_id, line, column);
        DiagnosticBuilder::error("unterminated block comment".to_string())
            .span(span)
            .emit(self.reporter);
    }
}
