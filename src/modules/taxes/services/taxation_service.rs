// Checkout and order tax aggregation.
//
// Every method takes the batch's `TaxCache` so a checkout computation that
// touches many lines and its shipping looks each country up only once.
// Discounts are computed elsewhere; line prices arrive already discounted
// and a voucher arrives as a plain amount to subtract.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use super::rate_resolver::resolve_rate;
use super::tax_cache::TaxCache;
use super::tax_calculator::TaxCalculator;
use crate::config::TaxSettings;
use crate::core::{CountryCode, Currency, Money, MoneyRange, Result, TaxedMoney, TaxedMoneyRange};
use crate::modules::taxes::models::{TaxRateTable, DEFAULT_TAX_RATE_NAME};

/// One priced line of a checkout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxableLine {
    /// Unit price after product discounts
    pub unit_price: Money,
    pub quantity: u32,
    /// Tax category assigned to the product; `"standard"` when unset
    #[serde(default)]
    pub tax_category: Option<String>,
}

impl TaxableLine {
    pub fn new(unit_price: Money, quantity: u32) -> Self {
        Self {
            unit_price,
            quantity,
            tax_category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.tax_category = Some(category.into());
        self
    }

    pub fn category(&self) -> &str {
        self.tax_category.as_deref().unwrap_or(DEFAULT_TAX_RATE_NAME)
    }
}

/// Everything needed to price a checkout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutInput {
    pub currency: Currency,
    pub lines: Vec<TaxableLine>,
    #[serde(default)]
    pub shipping_price: Option<Money>,
    /// Shipping address country
    #[serde(default)]
    pub country: Option<CountryCode>,
    /// Voucher amount, subtracted from net and gross
    #[serde(default)]
    pub voucher_discount: Option<Money>,
}

/// Tax-aware price aggregation for checkouts and orders
pub struct TaxationService {
    settings: TaxSettings,
    active: bool,
    calculator: TaxCalculator,
}

impl TaxationService {
    pub fn new(settings: TaxSettings, active: bool) -> Self {
        Self {
            settings,
            active,
            calculator: TaxCalculator::new(),
        }
    }

    pub fn settings(&self) -> &TaxSettings {
        &self.settings
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Explicit country, or the configured default
    pub fn resolve_country(&self, country: Option<CountryCode>) -> CountryCode {
        country.unwrap_or(self.settings.default_country)
    }

    /// Table for the batch, or none when taxes are switched off
    async fn table(
        &self,
        cache: &mut TaxCache<'_>,
        country: Option<CountryCode>,
    ) -> Option<Arc<TaxRateTable>> {
        if !self.active {
            return None;
        }
        Some(cache.get_cached_table(self.resolve_country(country)).await)
    }

    /// Taxed price of a product (or any single amount) in its category
    pub async fn product_price(
        &self,
        cache: &mut TaxCache<'_>,
        category: Option<&str>,
        price: Money,
        country: Option<CountryCode>,
    ) -> Result<TaxedMoney> {
        let table = self.table(cache, country).await;
        self.calculator.apply_tax_to_money(
            table.as_deref(),
            category.unwrap_or(DEFAULT_TAX_RATE_NAME),
            price,
            self.settings.prices_include_tax,
        )
    }

    /// Line total: the unit price is taxed, then multiplied by the quantity
    pub async fn line_total(
        &self,
        cache: &mut TaxCache<'_>,
        line: &TaxableLine,
        country: Option<CountryCode>,
    ) -> Result<TaxedMoney> {
        let unit = self
            .product_price(cache, Some(line.category()), line.unit_price, country)
            .await?;
        Ok(unit.times(line.quantity))
    }

    /// Sum of all line totals
    pub async fn checkout_subtotal(
        &self,
        cache: &mut TaxCache<'_>,
        currency: Currency,
        lines: &[TaxableLine],
        country: Option<CountryCode>,
    ) -> Result<TaxedMoney> {
        let mut subtotal = TaxedMoney::zero(currency);
        for line in lines {
            let total = self.line_total(cache, line, country).await?;
            subtotal = subtotal.try_add(&total)?;
        }
        Ok(subtotal)
    }

    /// Shipping price; zero when no shipping method is chosen
    pub async fn shipping_price(
        &self,
        cache: &mut TaxCache<'_>,
        currency: Currency,
        price: Option<Money>,
        country: Option<CountryCode>,
    ) -> Result<TaxedMoney> {
        match price {
            Some(price) => self.order_shipping(cache, price, country).await,
            None => Ok(TaxedMoney::zero(currency)),
        }
    }

    /// Subtotal + shipping - voucher, floored at zero
    pub async fn checkout_total(
        &self,
        cache: &mut TaxCache<'_>,
        checkout: &CheckoutInput,
    ) -> Result<TaxedMoney> {
        let subtotal = self
            .checkout_subtotal(cache, checkout.currency, &checkout.lines, checkout.country)
            .await?;
        let shipping = self
            .shipping_price(cache, checkout.currency, checkout.shipping_price, checkout.country)
            .await?;

        let mut total = subtotal.try_add(&shipping)?;
        if let Some(discount) = &checkout.voucher_discount {
            total = total.try_sub_money(discount)?;
        }
        let total = total.max_zero();

        debug!(
            country = %self.resolve_country(checkout.country),
            lines = checkout.lines.len(),
            net = %total.net(),
            gross = %total.gross(),
            "Calculated checkout total"
        );
        Ok(total)
    }

    /// Unit price of an already placed order line
    pub async fn order_line_unit(
        &self,
        cache: &mut TaxCache<'_>,
        unit_price: TaxedMoney,
        category: Option<&str>,
        country: Option<CountryCode>,
    ) -> Result<TaxedMoney> {
        let table = self.table(cache, country).await;
        self.calculator
            .apply_tax(
                table.as_deref(),
                category.unwrap_or(DEFAULT_TAX_RATE_NAME),
                unit_price,
                self.settings.prices_include_tax,
            )?
            .into_single()
    }

    /// Shipping price of an order
    pub async fn order_shipping(
        &self,
        cache: &mut TaxCache<'_>,
        price: Money,
        country: Option<CountryCode>,
    ) -> Result<TaxedMoney> {
        let table = self.table(cache, country).await;
        self.calculator.taxed_shipping_price(
            price,
            table.as_deref(),
            self.settings.charge_taxes_on_shipping,
            self.settings.prices_include_tax,
        )
    }

    /// Range of shipping prices available in a country, taxed at the standard rate
    pub async fn shipping_price_range(
        &self,
        cache: &mut TaxCache<'_>,
        range: MoneyRange,
        country: Option<CountryCode>,
    ) -> Result<TaxedMoneyRange> {
        let table = if self.settings.charge_taxes_on_shipping {
            self.table(cache, country).await
        } else {
            None
        };
        self.calculator
            .apply_tax(
                table.as_deref(),
                DEFAULT_TAX_RATE_NAME,
                range,
                self.settings.prices_include_tax,
            )?
            .into_range()
    }

    /// Percentage applied to `category` in `country`
    pub async fn tax_rate_percentage_value(
        &self,
        cache: &mut TaxCache<'_>,
        category: Option<&str>,
        country: Option<CountryCode>,
    ) -> Result<Decimal> {
        let table = self.table(cache, country).await;
        resolve_rate(
            Some(category.unwrap_or(DEFAULT_TAX_RATE_NAME)),
            table.as_deref(),
        )
    }
}
