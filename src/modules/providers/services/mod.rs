pub mod provider_service;
pub mod provider_trait;
pub mod static_rates;
pub mod vatlayer;

pub use provider_service::ProviderService;
pub use provider_trait::TaxRateProvider;
pub use static_rates::StaticProvider;
pub use vatlayer::VatlayerProvider;
