pub mod models;
pub mod services;

pub use models::{ConfigurationUpdate, PluginConfiguration, ProviderKind};
pub use services::{ProviderService, StaticProvider, TaxRateProvider, VatlayerProvider};
