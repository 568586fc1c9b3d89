use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use tracing::info;

use super::provider_trait::TaxRateProvider;
use crate::core::{AppError, CountryCode, Result};
use crate::modules::providers::models::RateListResponse;
use crate::modules::taxes::models::{TaxRateTable, DEFAULT_TAX_RATE_NAME};

/// In-memory tax rate dataset
///
/// Serves tables built in code or loaded from a file in the vatlayer
/// `rate_list` format. Used for offline operation and in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    tables: HashMap<CountryCode, TaxRateTable>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table, replacing any previous one for the same country
    pub fn with_table(mut self, table: TaxRateTable) -> Self {
        self.tables.insert(table.country, table);
        self
    }

    /// Build from a parsed `rate_list` response
    pub fn from_rate_list(response: RateListResponse) -> Result<Self> {
        let mut provider = Self::new();
        for (code, rates) in response.into_rates()? {
            let country: CountryCode = code.parse().map_err(AppError::Validation)?;
            provider = provider.with_table(rates.to_table(country)?);
        }
        Ok(provider)
    }

    /// Load a `rate_list` JSON export from disk
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await?;
        let response: RateListResponse = serde_json::from_str(&raw)?;
        let provider = Self::from_rate_list(response)?;

        info!(
            path = %path.display(),
            countries = provider.tables.len(),
            "Loaded static tax rate dataset"
        );
        Ok(provider)
    }

    pub fn countries(&self) -> Vec<CountryCode> {
        let mut countries: Vec<_> = self.tables.keys().copied().collect();
        countries.sort();
        countries
    }
}

#[async_trait]
impl TaxRateProvider for StaticProvider {
    async fn get_table(&self, country: CountryCode) -> Result<TaxRateTable> {
        Ok(self
            .tables
            .get(&country)
            .cloned()
            .unwrap_or_else(|| TaxRateTable::empty(country)))
    }

    async fn rate_types(&self) -> Result<Vec<String>> {
        let types: BTreeSet<String> = self
            .tables
            .values()
            .flat_map(|table| table.category_names())
            .filter(|name| *name != DEFAULT_TAX_RATE_NAME)
            .map(str::to_string)
            .collect();
        Ok(types.into_iter().collect())
    }

    fn name(&self) -> &str {
        "static"
    }
}
