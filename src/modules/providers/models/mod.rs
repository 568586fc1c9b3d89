mod plugin_config;
mod rate_list;

pub use plugin_config::{ConfigurationUpdate, PluginConfiguration, ProviderKind, PLUGIN_NAME};
pub use rate_list::{ApiError, CountryRates, RateListResponse, RateTypesResponse};
