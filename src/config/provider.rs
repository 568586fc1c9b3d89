use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use super::parse_flag;
use crate::core::{AppError, Result};
use crate::modules::providers::models::ProviderKind;

pub const DEFAULT_VATLAYER_BASE_URL: &str = "http://apilayer.net/api";

/// Tax rate provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub active: bool,
    pub access_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub static_rates_path: Option<PathBuf>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Vatlayer,
            active: false,
            access_key: None,
            base_url: DEFAULT_VATLAYER_BASE_URL.to_string(),
            timeout_secs: 10,
            max_retries: 2,
            static_rates_path: None,
        }
    }
}

impl ProviderConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(ProviderConfig {
            kind: match env::var("TAX_PROVIDER") {
                Ok(value) => value.parse().map_err(AppError::Configuration)?,
                Err(_) => defaults.kind,
            },
            active: match env::var("VATLAYER_ACTIVE") {
                Ok(value) => parse_flag("VATLAYER_ACTIVE", &value)?,
                Err(_) => defaults.active,
            },
            access_key: env::var("VATLAYER_ACCESS_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            base_url: env::var("VATLAYER_BASE_URL").unwrap_or(defaults.base_url),
            timeout_secs: env::var("VATLAYER_TIMEOUT_SECS")
                .unwrap_or_else(|_| defaults.timeout_secs.to_string())
                .parse()
                .map_err(|_| {
                    AppError::Configuration("Invalid VATLAYER_TIMEOUT_SECS".to_string())
                })?,
            max_retries: env::var("VATLAYER_MAX_RETRIES")
                .unwrap_or_else(|_| defaults.max_retries.to_string())
                .parse()
                .map_err(|_| {
                    AppError::Configuration("Invalid VATLAYER_MAX_RETRIES".to_string())
                })?,
            static_rates_path: env::var("STATIC_RATES_PATH").ok().map(PathBuf::from),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(AppError::Configuration(
                "VATLAYER_TIMEOUT_SECS must be greater than 0".to_string(),
            ));
        }

        if self.kind == ProviderKind::Vatlayer && !self.base_url.starts_with("http") {
            return Err(AppError::Configuration(format!(
                "VATLAYER_BASE_URL must be an http(s) URL, got {}",
                self.base_url
            )));
        }

        Ok(())
    }
}
