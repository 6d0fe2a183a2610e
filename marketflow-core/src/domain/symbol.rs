//! Canonical ↔ provider symbol mapping.
//!
//! Index vendors write share classes with a dot (`BRK.B`); Yahoo expects a
//! dash (`BRK-B`). Both transforms are total and pure — any input maps to a
//! syntactically valid symbol string, whether or not the provider ultimately
//! recognizes it.

/// Convert a canonical ticker to the provider's format.
pub fn to_provider_symbol(symbol: &str) -> String {
    symbol.trim().replace('.', "-")
}

/// Convert a provider ticker back to canonical form.
pub fn from_provider_symbol(provider_symbol: &str) -> String {
    provider_symbol.trim().replace('-', ".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn share_class_separator_is_mapped() {
        assert_eq!(to_provider_symbol("BRK.B"), "BRK-B");
        assert_eq!(to_provider_symbol("BF.B"), "BF-B");
    }

    #[test]
    fn plain_symbols_pass_through() {
        assert_eq!(to_provider_symbol("AAPL"), "AAPL");
    }

    #[test]
    fn whitespace_is_trimmed() {
        assert_eq!(to_provider_symbol("  MSFT "), "MSFT");
    }

    #[test]
    fn mapping_inverts() {
        assert_eq!(from_provider_symbol("BRK-B"), "BRK.B");
        assert_eq!(from_provider_symbol(&to_provider_symbol("BRK.B")), "BRK.B");
    }

    proptest! {
        #[test]
        fn provider_symbol_never_contains_a_dot(s in "[A-Z.]{1,8}") {
            prop_assert!(!to_provider_symbol(&s).contains('.'));
        }

        #[test]
        fn dash_free_symbols_roundtrip(s in "[A-Z]{1,6}(\\.[A-Z])?") {
            prop_assert_eq!(from_provider_symbol(&to_provider_symbol(&s)), s);
        }
    }
}
