//! Monetary value types used by the taxation engine.
//!
//! `Money` is a decimal amount tagged with its currency. `TaxedMoney` pairs a
//! net and a gross amount of the same currency, and the two range types carry
//! an ordered `(start, stop)` pair of either. None of these values are mutated
//! after construction; arithmetic returns new values and reports currency
//! mismatches as `AppError::CurrencyMismatch`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::core::{AppError, Currency, Result};

/// A decimal amount in a single currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    pub amount: Decimal,
    pub currency: Currency,
}

impl Money {
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    pub fn zero(currency: Currency) -> Self {
        Self::new(Decimal::ZERO, currency)
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<()> {
        if self.currency != other.currency {
            return Err(AppError::CurrencyMismatch {
                left: self.currency,
                right: other.currency,
            });
        }
        Ok(())
    }

    pub fn try_add(&self, other: &Money) -> Result<Money> {
        self.ensure_same_currency(other)?;
        Ok(Money::new(self.amount + other.amount, self.currency))
    }

    pub fn try_sub(&self, other: &Money) -> Result<Money> {
        self.ensure_same_currency(other)?;
        Ok(Money::new(self.amount - other.amount, self.currency))
    }

    /// Price of `quantity` units
    pub fn times(&self, quantity: u32) -> Money {
        Money::new(self.amount * Decimal::from(quantity), self.currency)
    }

    /// Rounds to the currency's minor unit (half-up)
    pub fn quantize(&self) -> Money {
        Money::new(self.currency.round(self.amount), self.currency)
    }

    fn max_zero(&self) -> Money {
        Money::new(self.amount.max(Decimal::ZERO), self.currency)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

/// A net/gross pair of the same currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TaxedMoney {
    net: Money,
    gross: Money,
}

impl TaxedMoney {
    pub fn new(net: Money, gross: Money) -> Result<Self> {
        net.ensure_same_currency(&gross)?;
        Ok(Self { net, gross })
    }

    /// Net and gross both equal to `money`
    pub fn from_untaxed(money: Money) -> Self {
        Self {
            net: money,
            gross: money,
        }
    }

    pub fn zero(currency: Currency) -> Self {
        Self::from_untaxed(Money::zero(currency))
    }

    pub fn net(&self) -> Money {
        self.net
    }

    pub fn gross(&self) -> Money {
        self.gross
    }

    pub fn currency(&self) -> Currency {
        self.net.currency
    }

    /// Tax portion (gross - net)
    pub fn tax(&self) -> Money {
        Money::new(self.gross.amount - self.net.amount, self.currency())
    }

    pub fn try_add(&self, other: &TaxedMoney) -> Result<TaxedMoney> {
        Ok(Self {
            net: self.net.try_add(&other.net)?,
            gross: self.gross.try_add(&other.gross)?,
        })
    }

    /// Subtracts a plain amount from both the net and the gross side
    pub fn try_sub_money(&self, money: &Money) -> Result<TaxedMoney> {
        Ok(Self {
            net: self.net.try_sub(money)?,
            gross: self.gross.try_sub(money)?,
        })
    }

    pub fn times(&self, quantity: u32) -> TaxedMoney {
        Self {
            net: self.net.times(quantity),
            gross: self.gross.times(quantity),
        }
    }

    pub fn quantize(&self) -> TaxedMoney {
        Self {
            net: self.net.quantize(),
            gross: self.gross.quantize(),
        }
    }

    /// Floors both sides at zero
    pub fn max_zero(&self) -> TaxedMoney {
        Self {
            net: self.net.max_zero(),
            gross: self.gross.max_zero(),
        }
    }

    /// Sums a currency-homogeneous sequence, starting from zero in `currency`
    pub fn sum<'a, I>(currency: Currency, items: I) -> Result<TaxedMoney>
    where
        I: IntoIterator<Item = &'a TaxedMoney>,
    {
        items
            .into_iter()
            .try_fold(TaxedMoney::zero(currency), |acc, item| acc.try_add(item))
    }
}

impl<'de> Deserialize<'de> for TaxedMoney {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            net: Money,
            gross: Money,
        }

        let raw = Raw::deserialize(deserializer)?;
        TaxedMoney::new(raw.net, raw.gross).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for TaxedMoney {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "net {} / gross {}", self.net, self.gross)
    }
}

/// Ordered `(start, stop)` pair of plain amounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoneyRange {
    start: Money,
    stop: Money,
}

impl MoneyRange {
    pub fn new(start: Money, stop: Money) -> Result<Self> {
        start.ensure_same_currency(&stop)?;
        if start.amount > stop.amount {
            return Err(AppError::validation(format!(
                "Range start {} is greater than stop {}",
                start, stop
            )));
        }
        Ok(Self { start, stop })
    }

    pub fn start(&self) -> Money {
        self.start
    }

    pub fn stop(&self) -> Money {
        self.stop
    }

    pub fn currency(&self) -> Currency {
        self.start.currency
    }
}

/// Ordered `(start, stop)` pair of taxed amounts, ordered by gross
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaxedMoneyRange {
    start: TaxedMoney,
    stop: TaxedMoney,
}

impl TaxedMoneyRange {
    pub fn new(start: TaxedMoney, stop: TaxedMoney) -> Result<Self> {
        start.gross.ensure_same_currency(&stop.gross)?;
        if start.gross.amount > stop.gross.amount {
            return Err(AppError::validation(format!(
                "Range start {} is greater than stop {}",
                start, stop
            )));
        }
        Ok(Self { start, stop })
    }

    /// Builds a range from endpoints that were derived from an already valid range
    pub(crate) fn from_endpoints(start: TaxedMoney, stop: TaxedMoney) -> Self {
        Self { start, stop }
    }

    pub fn start(&self) -> TaxedMoney {
        self.start
    }

    pub fn stop(&self) -> TaxedMoney {
        self.stop
    }

    pub fn currency(&self) -> Currency {
        self.start.currency()
    }
}

/// Any monetary shape the taxation engine accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Price {
    Money(Money),
    Taxed(TaxedMoney),
    Range(MoneyRange),
    TaxedRange(TaxedMoneyRange),
}

impl From<Money> for Price {
    fn from(value: Money) -> Self {
        Price::Money(value)
    }
}

impl From<TaxedMoney> for Price {
    fn from(value: TaxedMoney) -> Self {
        Price::Taxed(value)
    }
}

impl From<MoneyRange> for Price {
    fn from(value: MoneyRange) -> Self {
        Price::Range(value)
    }
}

impl From<TaxedMoneyRange> for Price {
    fn from(value: TaxedMoneyRange) -> Self {
        Price::TaxedRange(value)
    }
}

impl Price {
    /// Interprets an untyped JSON value as one of the four monetary shapes.
    ///
    /// Recognized shapes:
    /// - `{"amount": "10.00", "currency": "USD"}`
    /// - `{"net": <money>, "gross": <money>}`
    /// - `{"start": <money|taxed>, "stop": <money|taxed>}`
    ///
    /// Anything else (numbers, strings, arrays, other objects) is rejected
    /// with `AppError::InvalidInputType`.
    pub fn from_json(value: &Value) -> Result<Price> {
        let object = value.as_object().ok_or_else(|| {
            AppError::invalid_input(format!("expected a price, got {}", json_kind(value)))
        })?;

        if object.contains_key("amount") && object.contains_key("currency") {
            return Ok(Price::Money(money_from_json(value)?));
        }
        if object.contains_key("net") && object.contains_key("gross") {
            return Ok(Price::Taxed(taxed_from_json(value)?));
        }
        if let (Some(start), Some(stop)) = (object.get("start"), object.get("stop")) {
            return match (Price::from_json(start)?, Price::from_json(stop)?) {
                (Price::Money(start), Price::Money(stop)) => {
                    Ok(Price::Range(MoneyRange::new(start, stop)?))
                }
                (Price::Taxed(start), Price::Taxed(stop)) => {
                    Ok(Price::TaxedRange(TaxedMoneyRange::new(start, stop)?))
                }
                _ => Err(AppError::invalid_input(
                    "range endpoints must both be money or both be taxed money",
                )),
            };
        }

        Err(AppError::invalid_input(
            "object is not a money, taxed money or range value",
        ))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parses a JSON number or numeric string into an exact decimal
pub fn decimal_from_json(value: &Value) -> Result<Decimal> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => {
            return Err(AppError::invalid_input(format!(
                "expected a decimal amount, got {}",
                json_kind(other)
            )))
        }
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|e| AppError::validation(format!("Invalid amount {}: {}", text, e)))
}

fn money_from_json(value: &Value) -> Result<Money> {
    let amount = decimal_from_json(&value["amount"])?;
    let currency = value["currency"]
        .as_str()
        .ok_or_else(|| AppError::invalid_input("currency must be a string"))?
        .parse::<Currency>()
        .map_err(AppError::Validation)?;
    Ok(Money::new(amount, currency))
}

fn taxed_from_json(value: &Value) -> Result<TaxedMoney> {
    match (Price::from_json(&value["net"])?, Price::from_json(&value["gross"])?) {
        (Price::Money(net), Price::Money(gross)) => TaxedMoney::new(net, gross),
        _ => Err(AppError::invalid_input("net and gross must be money values")),
    }
}

/// Result of applying tax: a single taxed amount or a taxed range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TaxedPrice {
    Single(TaxedMoney),
    Range(TaxedMoneyRange),
}

impl TaxedPrice {
    pub fn as_single(&self) -> Option<&TaxedMoney> {
        match self {
            TaxedPrice::Single(money) => Some(money),
            TaxedPrice::Range(_) => None,
        }
    }

    pub fn as_range(&self) -> Option<&TaxedMoneyRange> {
        match self {
            TaxedPrice::Range(range) => Some(range),
            TaxedPrice::Single(_) => None,
        }
    }

    pub fn into_single(self) -> Result<TaxedMoney> {
        match self {
            TaxedPrice::Single(money) => Ok(money),
            TaxedPrice::Range(_) => Err(AppError::internal("expected a single taxed amount")),
        }
    }

    pub fn into_range(self) -> Result<TaxedMoneyRange> {
        match self {
            TaxedPrice::Range(range) => Ok(range),
            TaxedPrice::Single(_) => Err(AppError::internal("expected a taxed range")),
        }
    }
}
