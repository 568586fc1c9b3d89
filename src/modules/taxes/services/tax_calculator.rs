use rust_decimal::Decimal;
use serde_json::Value;
use tracing::trace;

use super::rate_resolver::resolve_rate;
use crate::core::error::AppError;
use crate::core::{Money, Price, Result, TaxedMoney, TaxedMoneyRange, TaxedPrice};
use crate::modules::taxes::models::{TaxRate, TaxRateTable, DEFAULT_TAX_RATE_NAME};

/// TaxCalculator splits prices into net and gross using a country's rate table
pub struct TaxCalculator;

impl TaxCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Apply tax for `category_name` to any monetary shape.
    ///
    /// Money and TaxedMoney produce a TaxedMoney; ranges produce a
    /// TaxedMoneyRange with both endpoints taxed independently.
    ///
    /// Without tax data (no table, or an empty one) nothing is taxed: plain
    /// amounts become `net == gross` and already-taxed values are returned
    /// unchanged.
    ///
    /// With a table, the anchor side is the gross when `prices_include_tax`
    /// is set and the net otherwise. The anchor is kept exact; the derived
    /// side is rounded half-up to the currency's minor unit.
    pub fn apply_tax(
        &self,
        table: Option<&TaxRateTable>,
        category_name: &str,
        price: impl Into<Price>,
        prices_include_tax: bool,
    ) -> Result<TaxedPrice> {
        let price = price.into();

        let table = match table {
            Some(table) if !table.is_empty() => table,
            _ => return Ok(Self::untaxed(price)),
        };

        let rate = resolve_rate(Some(category_name), Some(table))?;
        trace!(
            country = %table.country,
            category = %category_name,
            rate = %rate,
            prices_include_tax,
            "Applying tax rate"
        );

        match price {
            Price::Money(money) => {
                Ok(TaxedPrice::Single(self.tax_amount(money, rate, prices_include_tax)?))
            }
            Price::Taxed(taxed) => {
                let anchor = Self::anchor(&taxed, prices_include_tax);
                Ok(TaxedPrice::Single(self.tax_amount(anchor, rate, prices_include_tax)?))
            }
            Price::Range(range) => {
                let start = self.tax_amount(range.start(), rate, prices_include_tax)?;
                let stop = self.tax_amount(range.stop(), rate, prices_include_tax)?;
                Ok(TaxedPrice::Range(TaxedMoneyRange::new(start, stop)?))
            }
            Price::TaxedRange(range) => {
                // Retaxing from the anchors can reorder the grosses
                let start = Self::anchor(&range.start(), prices_include_tax);
                let stop = Self::anchor(&range.stop(), prices_include_tax);
                Ok(TaxedPrice::Range(TaxedMoneyRange::new(
                    self.tax_amount(start, rate, prices_include_tax)?,
                    self.tax_amount(stop, rate, prices_include_tax)?,
                )?))
            }
        }
    }

    /// Same as [`apply_tax`](Self::apply_tax) for a price received as untyped JSON.
    /// Values that are not a recognized monetary shape fail with `InvalidInputType`.
    pub fn apply_tax_json(
        &self,
        table: Option<&TaxRateTable>,
        category_name: &str,
        price: &Value,
        prices_include_tax: bool,
    ) -> Result<TaxedPrice> {
        let price = Price::from_json(price)?;
        self.apply_tax(table, category_name, price, prices_include_tax)
    }

    /// Convenience wrapper for a single plain amount
    pub fn apply_tax_to_money(
        &self,
        table: Option<&TaxRateTable>,
        category_name: &str,
        money: Money,
        prices_include_tax: bool,
    ) -> Result<TaxedMoney> {
        self.apply_tax(table, category_name, money, prices_include_tax)?
            .into_single()
    }

    /// Shipping is taxed at the standard rate, and only when taxes are charged on shipping
    pub fn taxed_shipping_price(
        &self,
        price: Money,
        table: Option<&TaxRateTable>,
        charge_taxes_on_shipping: bool,
        prices_include_tax: bool,
    ) -> Result<TaxedMoney> {
        if !charge_taxes_on_shipping {
            return Ok(TaxedMoney::from_untaxed(price));
        }
        self.apply_tax_to_money(table, DEFAULT_TAX_RATE_NAME, price, prices_include_tax)
    }

    fn anchor(taxed: &TaxedMoney, prices_include_tax: bool) -> Money {
        if prices_include_tax {
            taxed.gross()
        } else {
            taxed.net()
        }
    }

    fn tax_amount(
        &self,
        anchor: Money,
        rate: Decimal,
        prices_include_tax: bool,
    ) -> Result<TaxedMoney> {
        TaxRate::validate_value(rate)?;
        let factor = Decimal::ONE + rate / Decimal::ONE_HUNDRED;
        let currency = anchor.currency;

        if prices_include_tax {
            let net = anchor
                .amount
                .checked_div(factor)
                .ok_or_else(|| Self::out_of_range(anchor, rate))?;
            TaxedMoney::new(Money::new(currency.round(net), currency), anchor)
        } else {
            let gross = anchor
                .amount
                .checked_mul(factor)
                .ok_or_else(|| Self::out_of_range(anchor, rate))?;
            TaxedMoney::new(anchor, Money::new(currency.round(gross), currency))
        }
    }

    fn out_of_range(anchor: Money, rate: Decimal) -> AppError {
        AppError::Validation(format!(
            "Cannot apply {}% tax to {}: amount out of range",
            rate, anchor
        ))
    }

    fn untaxed(price: Price) -> TaxedPrice {
        match price {
            Price::Money(money) => TaxedPrice::Single(TaxedMoney::from_untaxed(money)),
            Price::Taxed(taxed) => TaxedPrice::Single(taxed),
            Price::Range(range) => TaxedPrice::Range(TaxedMoneyRange::from_endpoints(
                TaxedMoney::from_untaxed(range.start()),
                TaxedMoney::from_untaxed(range.stop()),
            )),
            Price::TaxedRange(range) => TaxedPrice::Range(range),
        }
    }
}

impl Default for TaxCalculator {
    fn default() -> Self {
        Self::new()
    }
}
