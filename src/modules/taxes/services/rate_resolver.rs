use rust_decimal::Decimal;

use crate::core::{AppError, Result};
use crate::modules::taxes::models::{TaxRateTable, DEFAULT_TAX_RATE_NAME};

/// Resolve the percentage for `category_name` in `table`.
///
/// - No table, or an empty one: 0
/// - Category present: its value
/// - Otherwise: the `"standard"` value
///
/// An unknown category never fails. A non-empty table without `"standard"`
/// fails with `MissingStandardRate` when the fallback is needed.
pub fn resolve_rate(category_name: Option<&str>, table: Option<&TaxRateTable>) -> Result<Decimal> {
    let table = match table {
        Some(table) if !table.is_empty() => table,
        _ => return Ok(Decimal::ZERO),
    };

    if let Some(rate) = category_name.and_then(|name| table.get(name)) {
        return Ok(rate.value);
    }

    table
        .get(DEFAULT_TAX_RATE_NAME)
        .map(|rate| rate.value)
        .ok_or(AppError::MissingStandardRate {
            country: table.country,
        })
}
