//! Pricing Engine
//!
//! Computes what a menu item costs right now and how that amount is
//! displayed in the restaurant's currency.
//!
//! - [`currency`]: static currency table with CLP as default
//! - [`schedule`]: which scheduled discounts are live at an instant
//! - [`calculator`]: decimal final-price computation and [`PriceQuote`]
//! - [`format`]: locale formatting and its inverse

pub mod calculator;
pub mod currency;
pub mod format;
pub mod schedule;

pub use calculator::{
    DiscountSource, MAX_PRICE, PriceQuote, PricingContext, final_price, quote_item, round_amount,
    validate_percent, validate_price,
};
pub use currency::{CURRENCIES, Currency, CurrencyChoice, DEFAULT_CURRENCY_CODE, SymbolPosition};
pub use format::{format_amount, format_price, parse_amount};
pub use schedule::{
    DEFAULT_TIMEZONE, TimezoneChoice, best_active_discount, choose_timezone, is_window_active,
    parse_hhmm, validate_scheduled_discount,
};
