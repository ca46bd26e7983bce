//! Prices

use rust_decimal::Decimal;
use rusty_money::{Money, iso};
use thiserror::Error;

use crate::items::CartLineItem;

/// Errors raised while resolving display currencies.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// The ISO 4217 code is not known.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Calculates the cart total: `Σ price_per_day × rental_days × quantity`.
///
/// Returns `None` if any line amount or the running sum overflows.
pub fn total_amount(items: &[CartLineItem]) -> Option<Decimal> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |total, item| total.checked_add(item.line_total()?))
}

/// Looks up an ISO currency by its alphabetic code (case-insensitive).
///
/// # Errors
///
/// - [`PricingError::UnknownCurrency`]: the code is not an ISO 4217 currency.
pub fn currency(code: &str) -> Result<&'static iso::Currency, PricingError> {
    iso::find(&code.to_ascii_uppercase())
        .ok_or_else(|| PricingError::UnknownCurrency(code.to_string()))
}

/// Projects a cart amount onto a currency for display.
pub fn to_money(amount: Decimal, currency: &'static iso::Currency) -> Money<'static, iso::Currency> {
    Money::from_decimal(amount, currency)
}
