use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::{AppError, CountryCode, Result};

/// Name of the fallback category every non-empty table must carry
pub const DEFAULT_TAX_RATE_NAME: &str = "standard";

/// A single rate category: percentage value (23 means 23%) and description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate {
    pub value: Decimal,
    #[serde(default)]
    pub description: String,
}

impl TaxRate {
    pub fn new(value: Decimal, description: impl Into<String>) -> Self {
        Self {
            value,
            description: description.into(),
        }
    }

    /// Validate a percentage rate (0-100) with max 4 decimal places
    pub fn validate_value(value: Decimal) -> Result<()> {
        if value < Decimal::ZERO {
            return Err(AppError::Validation(
                "Tax rate cannot be negative".to_string(),
            ));
        }

        if value > Decimal::ONE_HUNDRED {
            return Err(AppError::Validation(
                "Tax rate cannot exceed 100%".to_string(),
            ));
        }

        if value.normalize().scale() > 4 {
            return Err(AppError::Validation(
                "Tax rate cannot have more than 4 decimal places".to_string(),
            ));
        }

        Ok(())
    }
}

/// Mapping from category name to rate for one country
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRateTable {
    pub country: CountryCode,
    pub rates: BTreeMap<String, TaxRate>,
}

impl TaxRateTable {
    /// Table with no rates; resolves every category to 0%
    pub fn empty(country: CountryCode) -> Self {
        Self {
            country,
            rates: BTreeMap::new(),
        }
    }

    pub fn new(country: CountryCode, rates: BTreeMap<String, TaxRate>) -> Self {
        Self { country, rates }
    }

    /// Builder-style insert, mostly for fixtures
    pub fn with_rate(mut self, name: impl Into<String>, value: Decimal) -> Self {
        let name = name.into();
        let description = name.clone();
        self.rates.insert(name, TaxRate::new(value, description));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn get(&self, name: &str) -> Option<&TaxRate> {
        self.rates.get(name)
    }

    pub fn standard(&self) -> Option<&TaxRate> {
        self.rates.get(DEFAULT_TAX_RATE_NAME)
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.rates.keys().map(String::as_str)
    }

    /// Validate every rate and the presence of the fallback category.
    /// An empty table is valid and means "no tax data".
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        if self.standard().is_none() {
            return Err(AppError::MissingStandardRate {
                country: self.country,
            });
        }
        for (name, rate) in &self.rates {
            TaxRate::validate_value(rate.value).map_err(|e| {
                AppError::Validation(format!("{} rate {:?}: {}", self.country, name, e))
            })?;
        }
        Ok(())
    }
}
