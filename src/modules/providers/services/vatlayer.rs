use async_trait::async_trait;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::provider_trait::TaxRateProvider;
use crate::config::ProviderConfig;
use crate::core::error::{AppError, AppResult};
use crate::core::CountryCode;
use crate::modules::providers::models::{RateListResponse, RateTypesResponse};
use crate::modules::taxes::models::TaxRateTable;

/// vatlayer.com tax rate client
pub struct VatlayerProvider {
    client: ClientWithMiddleware,
    access_key: String,
    base_url: String,
}

impl VatlayerProvider {
    pub fn new(
        access_key: String,
        base_url: String,
        timeout: Duration,
        max_retries: u32,
    ) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AppError::HttpClient)?;

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(max_retries);
        let client = ClientBuilder::new(http)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            access_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ProviderConfig) -> AppResult<Self> {
        let access_key = config
            .access_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AppError::configuration("VATLAYER_ACCESS_KEY not set"))?;

        Self::new(
            access_key,
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
            config.max_retries,
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> AppResult<T> {
        // vatlayer API: https://vatlayer.com/documentation
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(url = %url, "Requesting vatlayer endpoint");

        let response = self
            .client
            .get(&url)
            .query(&[("access_key", self.access_key.as_str())])
            .send()
            .await
            .map_err(|e| AppError::ProviderLookup(format!("vatlayer API error: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            return Err(AppError::ProviderLookup(format!(
                "vatlayer API error {}: {}",
                status, error_body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| {
                AppError::ProviderLookup(format!("Failed to parse vatlayer response: {}", e))
            })
    }
}

#[async_trait]
impl TaxRateProvider for VatlayerProvider {
    async fn get_table(&self, country: CountryCode) -> AppResult<TaxRateTable> {
        let response: RateListResponse = self.get_json("rate_list").await?;
        response.table_for(country)
    }

    async fn rate_types(&self) -> AppResult<Vec<String>> {
        let response: RateTypesResponse = self.get_json("types").await?;
        response.into_types()
    }

    fn name(&self) -> &str {
        "vatlayer"
    }
}
