//! Currency Formatting
//!
//! `format_amount` renders a number with the currency's separators and
//! symbol; `parse_amount` reads such a string back.

use super::calculator::{round_decimal, to_decimal};
use super::currency::{Currency, SymbolPosition};

/// Insert `sep` every three digits from the right
fn group_thousands(digits: &str, sep: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * sep.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(sep);
        }
        out.push(ch);
    }
    out
}

/// Format an amount: round half-up to `decimals`, group thousands, place
/// the symbol. Negative amounts get a leading `-` before the symbol.
///
/// `None` when the amount has no decimal representation.
pub fn format_amount(amount: f64, currency: &Currency) -> Option<String> {
    let mut value = round_decimal(to_decimal(amount)?, currency.decimals);
    let negative = value.is_sign_negative() && !value.is_zero();
    value.set_sign_positive(true);
    value.rescale(currency.decimals);

    let plain = value.to_string();
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), ""));

    let mut number = group_thousands(int_part, currency.thousands_separator);
    if currency.decimals > 0 {
        number.push_str(currency.decimal_separator);
        number.push_str(frac_part);
    }

    let sign = if negative { "-" } else { "" };
    Some(match currency.position {
        SymbolPosition::Before => format!("{sign}{}{number}", currency.symbol),
        SymbolPosition::After => format!("{sign}{number} {}", currency.symbol),
    })
}

/// Format with a currency looked up by code (default currency if unknown)
pub fn format_price(amount: f64, code: &str) -> Option<String> {
    format_amount(amount, Currency::lookup(code))
}

/// Parse a string produced by [`format_amount`] back to a number
pub fn parse_amount(text: &str, currency: &Currency) -> Option<f64> {
    let text = text.trim();
    let (negative, text) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let number = match currency.position {
        SymbolPosition::Before => text.strip_prefix(currency.symbol)?,
        SymbolPosition::After => text.strip_suffix(currency.symbol)?.trim_end(),
    };

    let normalized: String = number
        .replace(currency.thousands_separator, "")
        .replace(currency.decimal_separator, ".");
    if normalized.is_empty()
        || !normalized.chars().all(|c| c.is_ascii_digit() || c == '.')
    {
        return None;
    }
    let value: f64 = normalized.parse().ok()?;
    Some(if negative { -value } else { value })
}
