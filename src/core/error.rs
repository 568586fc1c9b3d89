use crate::core::{CountryCode, Currency};

/// Application-wide Result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Alias kept for service signatures
pub type AppResult<T> = Result<T>;

/// Main application error type
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Price argument is not one of the recognized monetary shapes
    #[error("Invalid input type: {0}")]
    InvalidInputType(String),

    /// Non-empty tax table without the fallback category
    #[error("Tax table for {country} has no \"standard\" rate")]
    MissingStandardRate { country: CountryCode },

    /// Arithmetic between amounts in different currencies
    #[error("Currency mismatch: {left} vs {right}")]
    CurrencyMismatch { left: Currency, right: Currency },

    /// Tax rate provider lookup failure
    #[error("Provider lookup failed: {0}")]
    ProviderLookup(String),

    /// Plugin activated without its required settings
    #[error("Cannot activate {plugin}: missing configuration field(s) {fields}")]
    ActivationWithoutConfiguration { plugin: String, fields: String },

    /// Validation errors for business rules
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem errors (static rate datasets)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

// Helper functions for common error scenarios
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        AppError::InvalidInputType(msg.into())
    }

    pub fn provider(msg: impl Into<String>) -> Self {
        AppError::ProviderLookup(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        AppError::Configuration(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    /// True for errors that signal malformed tax data rather than a usage bug
    pub fn is_data_integrity(&self) -> bool {
        matches!(self, AppError::MissingStandardRate { .. })
    }
}
