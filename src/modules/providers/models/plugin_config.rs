use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{AppError, Result};

pub const PLUGIN_NAME: &str = "Vatlayer";

/// Provider implementations selectable by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Vatlayer,
    Static,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Vatlayer => write!(f, "vatlayer"),
            ProviderKind::Static => write!(f, "static"),
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vatlayer" => Ok(ProviderKind::Vatlayer),
            "static" => Ok(ProviderKind::Static),
            _ => Err(format!("Invalid tax provider: {}", s)),
        }
    }
}

/// Tax plugin configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginConfiguration {
    pub name: String,
    pub active: bool,
    pub provider: ProviderKind,
    #[serde(skip_serializing)]
    pub access_key: Option<String>,
}

/// Partial update as submitted by an admin; absent fields are left as they are
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigurationUpdate {
    pub active: Option<bool>,
    pub access_key: Option<String>,
}

impl Default for PluginConfiguration {
    fn default() -> Self {
        Self {
            name: PLUGIN_NAME.to_string(),
            active: false,
            provider: ProviderKind::Vatlayer,
            access_key: None,
        }
    }
}

impl PluginConfiguration {
    pub fn new(provider: ProviderKind, active: bool, access_key: Option<String>) -> Self {
        Self {
            active,
            provider,
            access_key,
            ..Self::default()
        }
    }

    /// Required fields that are missing or blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        let key_blank = self
            .access_key
            .as_deref()
            .map_or(true, |key| key.trim().is_empty());
        // only the remote provider needs credentials
        if self.provider == ProviderKind::Vatlayer && key_blank {
            missing.push("access_key");
        }
        missing
    }

    /// Validate that an active configuration carries its required settings
    pub fn validate(&self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(AppError::ActivationWithoutConfiguration {
                plugin: self.name.clone(),
                fields: missing.join(", "),
            });
        }
        Ok(())
    }

    /// Apply an update; on error the configuration is left untouched
    pub fn apply_update(&mut self, update: ConfigurationUpdate) -> Result<()> {
        let mut candidate = self.clone();
        if let Some(active) = update.active {
            candidate.active = active;
        }
        if let Some(access_key) = update.access_key {
            candidate.access_key = Some(access_key);
        }

        candidate.validate()?;
        *self = candidate;
        Ok(())
    }
}
