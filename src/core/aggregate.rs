//! Per-group totals.

use crate::core::coerce::parse_amount;
use crate::domain::model::Row;
use rust_decimal::Decimal;

/// Sums the amount column. Values that do not coerce to a number add 0.
/// A sum past the decimal range saturates at `Decimal::MAX` or `Decimal::MIN`.
pub fn total(rows: &[Row], amount_id: &str) -> Decimal {
    rows.iter()
        .filter_map(|row| row.get(amount_id).and_then(parse_amount))
        .fold(Decimal::ZERO, |acc, amount| {
            acc.checked_add(amount).unwrap_or_else(|| {
                tracing::debug!("Total overflowed adding {}; saturating", amount);
                if amount.is_sign_negative() {
                    Decimal::MIN
                } else {
                    Decimal::MAX
                }
            })
        })
}

/// Number of rows whose amount is present but not numeric.
pub fn unparseable_amounts(rows: &[Row], amount_id: &str) -> usize {
    rows.iter()
        .filter_map(|row| row.get(amount_id))
        .filter(|value| parse_amount(value).is_none())
        .count()
}
