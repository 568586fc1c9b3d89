use crate::core::{AppError, Result};
use crate::modules::providers::models::ProviderKind;
use serde::Deserialize;
use std::env;

pub mod provider;
pub mod settings;

pub use provider::ProviderConfig;
pub use settings::TaxSettings;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub provider: ProviderConfig,
    pub taxes: TaxSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
            provider: ProviderConfig::from_env()?,
            taxes: TaxSettings::from_env()?,
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.provider.validate()?;

        if self.provider.kind == ProviderKind::Static
            && self.provider.static_rates_path.is_none()
        {
            tracing::warn!(
                "TAX_PROVIDER=static without STATIC_RATES_PATH; every country resolves to 0%"
            );
        }

        Ok(())
    }
}

/// Parse a boolean environment flag (`true/false`, `1/0`, `yes/no`, `on/off`)
pub(crate) fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(AppError::Configuration(format!("Invalid {}: {}", name, value))),
    }
}
