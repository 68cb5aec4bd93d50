//! Diagnostic severity and color configuration.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Error,
    Warning,
    Note,
    Help,
}

impl Level {
    /// The single-letter tag used in the `"(X<id>) message"` header (§6.3).
    pub fn tag(self) -> char {
        match self {
            Level::Error => 'E',
            Level::Warning => 'W',
            Level::Note | Level::Help => 'M',
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Note => "note",
            Level::Help => "help",
        };
        write!(f, "{s}")
    }
}

/// Whether ANSI color escapes should be emitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorConfig {
    Always,
    Never,
    Auto,
}

impl ColorConfig {
    pub fn use_color(self, is_tty: bool) -> bool {
        match self {
            ColorConfig::Always => true,
            ColorConfig::Never => false,
            ColorConfig::Auto => is_tty,
        }
    }
}
