//! Currency Table
//!
//! Static formatting rules per ISO currency code. Unknown or absent codes
//! fall back to [`DEFAULT_CURRENCY_CODE`].

use serde::Serialize;
use shared::models::Choice;

pub const DEFAULT_CURRENCY_CODE: &str = "CLP";

/// Where the symbol goes relative to the number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolPosition {
    /// `€12,50`
    Before,
    /// `12,50 kr`
    After,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Currency {
    pub code: &'static str,
    pub symbol: &'static str,
    pub decimals: u32,
    pub thousands_separator: &'static str,
    pub decimal_separator: &'static str,
    pub position: SymbolPosition,
}

/// A restaurant's currency: explicitly configured, or the platform default
pub type CurrencyChoice = Choice<&'static Currency>;

const fn currency(
    code: &'static str,
    symbol: &'static str,
    decimals: u32,
    thousands_separator: &'static str,
    decimal_separator: &'static str,
    position: SymbolPosition,
) -> Currency {
    Currency {
        code,
        symbol,
        decimals,
        thousands_separator,
        decimal_separator,
        position,
    }
}

use SymbolPosition::{After, Before};

pub static CURRENCIES: [Currency; 15] = [
    currency("CLP", "$", 0, ".", ",", Before),
    currency("COP", "$", 0, ".", ",", Before),
    currency("ARS", "$", 2, ".", ",", Before),
    currency("MXN", "$", 2, ",", ".", Before),
    currency("PEN", "S/", 2, ",", ".", Before),
    currency("USD", "$", 2, ",", ".", Before),
    currency("EUR", "€", 2, ".", ",", Before),
    currency("BRL", "R$", 2, ".", ",", Before),
    currency("UYU", "$U", 2, ".", ",", Before),
    currency("PYG", "₲", 0, ".", ",", Before),
    currency("BOB", "Bs", 2, ".", ",", Before),
    currency("GTQ", "Q", 2, ",", ".", Before),
    currency("CRC", "₡", 2, ".", ",", Before),
    currency("DOP", "RD$", 2, ",", ".", Before),
    currency("SEK", "kr", 2, " ", ",", After),
];

impl Currency {
    /// Exact lookup (case-insensitive)
    pub fn find(code: &str) -> Option<&'static Currency> {
        CURRENCIES.iter().find(|c| c.code.eq_ignore_ascii_case(code))
    }

    /// Lookup with fallback to the default currency
    pub fn lookup(code: &str) -> &'static Currency {
        Self::find(code).unwrap_or_else(Self::default_currency)
    }

    pub fn default_currency() -> &'static Currency {
        &CURRENCIES[0]
    }

    /// Resolve a stored `currency_code` column
    pub fn choose(code: Option<&str>) -> CurrencyChoice {
        Choice::from_option(code.and_then(Self::find))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_clp() {
        assert_eq!(Currency::default_currency().code, DEFAULT_CURRENCY_CODE);
        assert_eq!(Currency::lookup("XXX").code, "CLP");
        assert_eq!(Currency::lookup("").code, "CLP");
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(Currency::lookup("eur").symbol, "€");
    }

    #[test]
    fn codes_are_unique() {
        let mut codes: Vec<_> = CURRENCIES.iter().map(|c| c.code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), CURRENCIES.len());
    }

    #[test]
    fn table_values() {
        let sek = Currency::lookup("SEK");
        assert_eq!(sek.position, SymbolPosition::After);
        assert_eq!(sek.thousands_separator, " ");
        assert_eq!(Currency::lookup("PYG").decimals, 0);
        assert_eq!(Currency::lookup("DOP").symbol, "RD$");
        assert_eq!(Currency::lookup("MXN").decimal_separator, ".");
    }

    #[test]
    fn choice_distinguishes_default() {
        assert!(Currency::choose(None).is_default());
        assert!(Currency::choose(Some("ZZZ")).is_default());
        let usd = Currency::choose(Some("USD"));
        assert_eq!(usd.configured().map(|c| c.code), Some("USD"));

        let json = serde_json::to_value(Currency::choose(Some("USD"))).unwrap();
        assert_eq!(json["source"], "configured");
        assert_eq!(json["value"]["code"], "USD");
    }
}
