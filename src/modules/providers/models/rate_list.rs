// Wire format of the vatlayer `rate_list` and `types` endpoints.
//
// The same shape is used for static rate datasets on disk, so an export of
// the live API can be dropped in as an offline provider.

use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

use crate::core::money::decimal_from_json;
use crate::core::{AppError, CountryCode, Result};
use crate::modules::taxes::models::{TaxRate, TaxRateTable, DEFAULT_TAX_RATE_NAME};

/// Error block returned with `success: false`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: i64,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub info: String,
}

/// Rates of one country as published by vatlayer
#[derive(Debug, Clone, Deserialize)]
pub struct CountryRates {
    #[serde(default)]
    pub country_name: String,
    pub standard_rate: Value,
    /// Object of `name: rate`; vatlayer sends `[]` for countries without reduced rates
    #[serde(default)]
    pub reduced_rates: Value,
}

impl CountryRates {
    /// Convert into a validated rate table with `"standard"` plus every reduced rate
    pub fn to_table(&self, country: CountryCode) -> Result<TaxRateTable> {
        let mut rates = BTreeMap::new();
        rates.insert(
            DEFAULT_TAX_RATE_NAME.to_string(),
            TaxRate::new(decimal_from_json(&self.standard_rate)?, DEFAULT_TAX_RATE_NAME),
        );

        match &self.reduced_rates {
            Value::Object(reduced) => {
                for (name, value) in reduced {
                    let rate = TaxRate::new(decimal_from_json(value)?, name.clone());
                    rates.insert(name.clone(), rate);
                }
            }
            Value::Null => {}
            Value::Array(items) if items.is_empty() => {}
            other => {
                return Err(AppError::provider(format!(
                    "unexpected reduced_rates for {}: {}",
                    country, other
                )))
            }
        }

        let table = TaxRateTable::new(country, rates);
        table.validate()?;
        Ok(table)
    }
}

/// Response of `GET /rate_list`
#[derive(Debug, Clone, Deserialize)]
pub struct RateListResponse {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub rates: HashMap<String, CountryRates>,
    pub error: Option<ApiError>,
}

/// Response of `GET /types`
#[derive(Debug, Clone, Deserialize)]
pub struct RateTypesResponse {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub types: Vec<String>,
    pub error: Option<ApiError>,
}

fn default_success() -> bool {
    true
}

impl RateListResponse {
    /// Fails with `ProviderLookup` when the API reported an error
    pub fn into_rates(self) -> Result<HashMap<String, CountryRates>> {
        if !self.success {
            return Err(api_failure(self.error));
        }
        Ok(self.rates)
    }

    /// Table for one country; unknown countries give an empty table
    pub fn table_for(&self, country: CountryCode) -> Result<TaxRateTable> {
        if !self.success {
            return Err(api_failure(self.error.clone()));
        }
        match self.rates.get(country.as_str()) {
            Some(rates) => rates.to_table(country),
            None => Ok(TaxRateTable::empty(country)),
        }
    }
}

impl RateTypesResponse {
    pub fn into_types(self) -> Result<Vec<String>> {
        if !self.success {
            return Err(api_failure(self.error));
        }
        Ok(self.types)
    }
}

fn api_failure(error: Option<ApiError>) -> AppError {
    match error {
        Some(error) => AppError::provider(format!(
            "vatlayer error {} ({}): {}",
            error.code, error.kind, error.info
        )),
        None => AppError::provider("vatlayer reported failure without details"),
    }
}
