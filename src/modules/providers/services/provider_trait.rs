use async_trait::async_trait;

use crate::core::{CountryCode, Result};
use crate::modules::taxes::models::TaxRateTable;

/// Source of per-country tax rate tables.
///
/// Implementations may perform blocking or network I/O; callers go through a
/// per-batch [`TaxCache`](crate::taxes::TaxCache) so each country is looked up
/// at most once per calculation.
#[async_trait]
pub trait TaxRateProvider: Send + Sync {
    /// Fetch the rate table for a country. Unknown countries yield an empty table.
    async fn get_table(&self, country: CountryCode) -> Result<TaxRateTable>;

    /// Names of the reduced-rate categories this provider knows about
    async fn rate_types(&self) -> Result<Vec<String>>;

    /// Get provider name
    fn name(&self) -> &str;
}
