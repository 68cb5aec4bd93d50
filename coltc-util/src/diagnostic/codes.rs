//! Stable diagnostic codes.
//!
//! A code is a short prefix plus a number (`E_LEX0003`). Codes are optional
//! on a `Diagnostic` - the reporter's `<id>` field in the §6.3 header is
//! this code's rendered form, when present.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DiagnosticCode {
    prefix: &'static str,
    number: u32,
}

impl DiagnosticCode {
    pub const fn new(prefix: &'static str, number: u32) -> Self {
        DiagnosticCode { prefix, number }
    }

    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn as_string(&self) -> String {
        format!("{}{:04}", self.prefix, self.number)
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

pub const E_LEX_UNTERMINATED_COMMENT: DiagnosticCode = DiagnosticCode::new("E_LEX", 1);
pub const E_LEX_INVALID_CHARACTER: DiagnosticCode = DiagnosticCode::new("E_LEX", 2);
pub const E_LEX_INVALID_NUMBER: DiagnosticCode = DiagnosticCode::new("E_LEX", 3);
pub const E_LEX_RESERVED_IDENT: DiagnosticCode = DiagnosticCode::new("E_LEX", 4);
pub const E_LEX_COMMENT_DEPTH: DiagnosticCode = DiagnosticCode::new("E_LEX", 5);

pub const E_PAR_UNEXPECTED_TOKEN: DiagnosticCode = DiagnosticCode::new("E_PAR", 1);
pub const E_PAR_EXPECTED_TOKEN: DiagnosticCode = DiagnosticCode::new("E_PAR", 2);
pub const E_PAR_RECURSION_DEPTH: DiagnosticCode = DiagnosticCode::new("E_PAR", 3);

pub const E_SEM_INVALID_OPERATOR: DiagnosticCode = DiagnosticCode::new("E_SEM", 1);
pub const E_SEM_INVALID_OPERAND_TYPE: DiagnosticCode = DiagnosticCode::new("E_SEM", 2);
pub const E_SEM_DIVISION_BY_ZERO: DiagnosticCode = DiagnosticCode::new("E_SEM", 3);
pub const E_SEM_INVALID_CAST: DiagnosticCode = DiagnosticCode::new("E_SEM", 4);
pub const E_SEM_INCOMPATIBLE_COMPARISON_CHAIN: DiagnosticCode = DiagnosticCode::new("E_SEM", 5);
pub const E_SEM_OPAQUE_DEREF: DiagnosticCode = DiagnosticCode::new("E_SEM", 6);
pub const E_SEM_UNDECLARED_TYPE_REQUIRED: DiagnosticCode = DiagnosticCode::new("E_SEM", 7);

pub const W_VAR_SHADOWING: DiagnosticCode = DiagnosticCode::new("W_SEM", 1);
pub const W_REDUNDANT_VISIBILITY: DiagnosticCode = DiagnosticCode::new("W_SEM", 2);
pub const W_CONST_FOLD_NAN: DiagnosticCode = DiagnosticCode::new("W_SEM", 3);
pub const W_CONST_FOLD_SIGNED_OU: DiagnosticCode = DiagnosticCode::new("W_SEM", 4);
pub const W_CONST_FOLD_UNSIGNED_OU: DiagnosticCode = DiagnosticCode::new("W_SEM", 5);
pub const W_CONST_FOLD_INVALID_SHIFT: DiagnosticCode = DiagnosticCode::new("W_SEM", 6);
pub const W_REDUNDANT_MUT: DiagnosticCode = DiagnosticCode::new("W_SEM", 7);
