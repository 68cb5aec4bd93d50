//! `WarnFor` configuration (§6.2): which folding/declaration conditions
//! produce a warning. All flags default to on; division-by-zero is never
//! gated by this struct because it is always an error (§4.4.4).

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WarnFor {
    pub var_shadowing: bool,
    pub redundant_visibility: bool,
    pub constant_folding_nan: bool,
    pub constant_folding_signed_ou: bool,
    pub constant_folding_unsigned_ou: bool,
    pub constant_folding_invalid_shift: bool,
}

impl Default for WarnFor {
    fn default() -> Self {
        WarnFor {
            var_shadowing: true,
            redundant_visibility: true,
            constant_folding_nan: true,
            constant_folding_signed_ou: true,
            constant_folding_unsigned_ou: true,
            constant_folding_invalid_shift: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_flags_default_to_enabled() {
        let warn_for = WarnFor::default();
        assert!(warn_for.var_shadowing);
        assert!(warn_for.redundant_visibility);
        assert!(warn_for.constant_folding_nan);
        assert!(warn_for.constant_folding_signed_ou);
        assert!(warn_for.constant_folding_unsigned_ou);
        assert!(warn_for.constant_folding_invalid_shift);
    }
}
