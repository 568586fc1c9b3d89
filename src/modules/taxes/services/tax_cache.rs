use futures_util::future::join_all;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::core::{CountryCode, Result};
use crate::modules::providers::services::TaxRateProvider;
use crate::modules::taxes::models::TaxRateTable;

/// Read-through cache of country tax tables for one calculation batch.
///
/// Create one per checkout/order computation and drop it afterwards. Each
/// distinct country reaches the provider at most once per instance; failed
/// lookups are logged, counted and cached as empty tables so the batch
/// proceeds with 0% tax instead of failing.
pub struct TaxCache<'p> {
    provider: &'p dyn TaxRateProvider,
    tables: HashMap<CountryCode, Arc<TaxRateTable>>,
    provider_calls: usize,
    lookup_failures: usize,
}

impl<'p> TaxCache<'p> {
    pub fn new(provider: &'p dyn TaxRateProvider) -> Self {
        Self {
            provider,
            tables: HashMap::new(),
            provider_calls: 0,
            lookup_failures: 0,
        }
    }

    /// Table for `country`, fetched on first use
    pub async fn get_cached_table(&mut self, country: CountryCode) -> Arc<TaxRateTable> {
        if let Some(table) = self.tables.get(&country) {
            return Arc::clone(table);
        }

        let result = self.provider.get_table(country).await;
        self.store(country, result)
    }

    /// Fetch every not-yet-cached country concurrently
    pub async fn prefetch<I>(&mut self, countries: I)
    where
        I: IntoIterator<Item = CountryCode>,
    {
        let missing: BTreeSet<CountryCode> = countries
            .into_iter()
            .filter(|country| !self.tables.contains_key(country))
            .collect();
        if missing.is_empty() {
            return;
        }

        debug!(countries = missing.len(), "Prefetching tax tables");
        let provider = self.provider;
        let results = join_all(
            missing
                .into_iter()
                .map(|country| async move { (country, provider.get_table(country).await) }),
        )
        .await;

        for (country, result) in results {
            self.store(country, result);
        }
    }

    fn store(&mut self, country: CountryCode, result: Result<TaxRateTable>) -> Arc<TaxRateTable> {
        self.provider_calls += 1;

        let table = match result {
            Ok(table) => {
                debug!(
                    country = %country,
                    provider = %self.provider.name(),
                    rates = table.len(),
                    "Fetched tax table"
                );
                table
            }
            Err(e) => {
                self.lookup_failures += 1;
                warn!(
                    country = %country,
                    provider = %self.provider.name(),
                    error = %e,
                    "Tax table lookup failed, continuing without taxes"
                );
                TaxRateTable::empty(country)
            }
        };

        let table = Arc::new(table);
        self.tables.insert(country, Arc::clone(&table));
        table
    }

    /// Number of lookups that reached the provider
    pub fn provider_calls(&self) -> usize {
        self.provider_calls
    }

    /// Number of lookups that failed and were degraded to an empty table
    pub fn lookup_failures(&self) -> usize {
        self.lookup_failures
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
