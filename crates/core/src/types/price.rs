//! Money amounts and ordering thresholds.
//!
//! All amounts are `rust_decimal::Decimal` in a single currency (rupees).
//! Decimal arithmetic keeps the minimum-order comparison exact: a cart worth
//! `11999.99` never rounds up into an orderable one.

use rust_decimal::{Decimal, RoundingStrategy};

/// Currency symbol rendered in front of every amount.
pub const CURRENCY_SYMBOL: &str = "₹";

/// Minimum cart value required before an order can be submitted.
pub const MINIMUM_ORDER: Decimal = Decimal::from_parts(12_000, 0, 0, false, 0);

/// Format an amount for display (e.g., "₹1500.00").
///
/// # Example
///
/// ```rust
/// # use gvcatalogs_core::format_money;
/// # use rust_decimal::Decimal;
/// assert_eq!(format_money(Decimal::new(150_050, 2)), "₹1500.50");
/// ```
#[must_use]
pub fn format_money(amount: Decimal) -> String {
    format!(
        "{CURRENCY_SYMBOL}{:.2}",
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}
