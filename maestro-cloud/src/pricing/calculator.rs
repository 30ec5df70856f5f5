//! Price Calculator
//!
//! Decimal arithmetic for final prices. Amounts travel as f64 and are
//! converted to `rust_decimal` for every computation.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rust_decimal::prelude::*;
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{MenuItem, ScheduledDiscount};

use super::currency::Currency;
use super::format::format_amount;
use super::schedule::best_active_discount;

/// Largest accepted base price. Well inside `Decimal`'s range (~7.9e28),
/// so every stored price converts without loss of magnitude.
pub const MAX_PRICE: f64 = 1_000_000_000_000.0;

/// `None` for NaN, infinities and magnitudes `Decimal` cannot hold
#[inline]
pub(crate) fn to_decimal(value: f64) -> Option<Decimal> {
    Decimal::from_f64(value)
}

/// Round half-up (away from zero) to `decimals` places
#[inline]
pub(crate) fn round_decimal(value: Decimal, decimals: u32) -> Decimal {
    value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero)
}

/// Round an amount to the currency's precision
pub fn round_amount(value: f64, currency: &Currency) -> Option<f64> {
    round_decimal(to_decimal(value)?, currency.decimals).to_f64()
}

/// `base * (1 - percent / 100)`, unrounded
pub fn final_price(base: f64, percent: f64) -> Option<f64> {
    let multiplier = Decimal::ONE - to_decimal(percent)? / Decimal::ONE_HUNDRED;
    to_decimal(base)?.checked_mul(multiplier)?.to_f64()
}

fn unpriceable(base: f64) -> AppError {
    tracing::error!(base, "Price outside the representable range");
    AppError::new(ErrorCode::InvalidPrice)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountSource {
    None,
    Direct,
    Scheduled,
}

/// Computed price of one menu item, as shown on the public menu
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceQuote {
    pub base_price: f64,
    pub final_price: f64,
    pub discount_percent: Option<f64>,
    pub discount_source: DiscountSource,
    pub scheduled_discount_id: Option<i64>,
    pub has_discount: bool,
    pub formatted_price: String,
    pub formatted_base_price: String,
}

/// Everything needed to price items of one restaurant at one instant
#[derive(Debug, Clone, Copy)]
pub struct PricingContext<'a> {
    pub currency: &'static Currency,
    pub timezone: Tz,
    pub now: DateTime<Utc>,
    pub scheduled: &'a [ScheduledDiscount],
}

impl PricingContext<'_> {
    pub fn quote(
        &self,
        base: f64,
        direct: Option<f64>,
        category_id: i64,
    ) -> Result<PriceQuote, AppError> {
        // A direct discount always wins, even 0%
        let (percent, source, scheduled_id) = match direct {
            Some(p) => (Some(p), DiscountSource::Direct, None),
            None => {
                let (now, tz) = (self.now, self.timezone);
                match best_active_discount(self.scheduled, category_id, now, tz) {
                    Some(d) => (Some(d.discount), DiscountSource::Scheduled, Some(d.id)),
                    None => (None, DiscountSource::None, None),
                }
            }
        };

        let unrounded = match percent {
            Some(p) => final_price(base, p),
            None => Some(base),
        };
        let final_price = unrounded
            .and_then(|v| round_amount(v, self.currency))
            .ok_or_else(|| unpriceable(base))?;
        let formatted_price =
            format_amount(final_price, self.currency).ok_or_else(|| unpriceable(base))?;
        let formatted_base_price =
            format_amount(base, self.currency).ok_or_else(|| unpriceable(base))?;

        Ok(PriceQuote {
            base_price: base,
            final_price,
            discount_percent: percent,
            discount_source: source,
            scheduled_discount_id: scheduled_id,
            has_discount: percent.is_some(),
            formatted_price,
            formatted_base_price,
        })
    }
}

pub fn quote_item(item: &MenuItem, ctx: &PricingContext<'_>) -> Result<PriceQuote, AppError> {
    ctx.quote(item.price, item.discount, item.category_id)
}

/// Base prices must be finite, non-negative and at most [`MAX_PRICE`]
pub fn validate_price(field: &str, value: f64) -> Result<(), AppError> {
    let message = if !value.is_finite() {
        "El precio debe ser un número válido"
    } else if value < 0.0 {
        "El precio no puede ser negativo"
    } else if value > MAX_PRICE {
        "El precio excede el máximo permitido"
    } else {
        return Ok(());
    };
    Err(AppError::with_message(ErrorCode::InvalidPrice, message).with_detail("field", field))
}

/// Discount percentages must be finite and within [0, 100]
pub fn validate_percent(field: &str, value: f64) -> Result<(), AppError> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        let message = "El descuento debe estar entre 0 y 100";
        return Err(
            AppError::with_message(ErrorCode::InvalidDiscount, message).with_detail("field", field),
        );
    }
    Ok(())
}
