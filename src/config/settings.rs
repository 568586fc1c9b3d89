use serde::{Deserialize, Serialize};
use std::env;

use super::parse_flag;
use crate::core::{AppError, CountryCode, Result};

/// Site-wide tax settings passed explicitly into every calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSettings {
    /// Catalog prices are gross (tax already included)
    pub prices_include_tax: bool,
    pub charge_taxes_on_shipping: bool,
    /// Used when a checkout or order has no shipping country
    pub default_country: CountryCode,
}

impl Default for TaxSettings {
    fn default() -> Self {
        Self {
            prices_include_tax: true,
            charge_taxes_on_shipping: true,
            default_country: CountryCode::US,
        }
    }
}

impl TaxSettings {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(TaxSettings {
            prices_include_tax: match env::var("INCLUDE_TAXES_IN_PRICES") {
                Ok(value) => parse_flag("INCLUDE_TAXES_IN_PRICES", &value)?,
                Err(_) => defaults.prices_include_tax,
            },
            charge_taxes_on_shipping: match env::var("CHARGE_TAXES_ON_SHIPPING") {
                Ok(value) => parse_flag("CHARGE_TAXES_ON_SHIPPING", &value)?,
                Err(_) => defaults.charge_taxes_on_shipping,
            },
            default_country: match env::var("DEFAULT_COUNTRY") {
                Ok(value) => value.parse().map_err(AppError::Configuration)?,
                Err(_) => defaults.default_country,
            },
        })
    }
}
