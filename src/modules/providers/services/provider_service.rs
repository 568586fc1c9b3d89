use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use tracing::{info, warn};

use super::provider_trait::TaxRateProvider;
use super::static_rates::StaticProvider;
use super::vatlayer::VatlayerProvider;
use crate::config::ProviderConfig;
use crate::core::error::{AppError, AppResult};
use crate::modules::providers::models::{ConfigurationUpdate, PluginConfiguration, ProviderKind};
use crate::modules::taxes::models::DEFAULT_TAX_RATE_NAME;

/// Registry of tax rate providers plus the plugin configuration that selects one
pub struct ProviderService {
    providers: HashMap<String, Arc<dyn TaxRateProvider>>,
    configuration: PluginConfiguration,
}

impl ProviderService {
    pub fn new(configuration: PluginConfiguration) -> Self {
        Self {
            providers: HashMap::new(),
            configuration,
        }
    }

    /// Build the provider named by configuration and register it
    pub async fn from_config(config: &ProviderConfig) -> AppResult<Self> {
        let configuration =
            PluginConfiguration::new(config.kind, config.active, config.access_key.clone());
        configuration.validate()?;

        let mut service = Self::new(configuration);
        match config.kind {
            ProviderKind::Vatlayer => {
                if config.access_key.is_some() {
                    service.register_provider(Arc::new(VatlayerProvider::from_config(config)?));
                } else {
                    warn!("VATLAYER_ACCESS_KEY not set, vatlayer provider not registered");
                }
            }
            ProviderKind::Static => {
                let provider = match &config.static_rates_path {
                    Some(path) => StaticProvider::load(path).await?,
                    None => StaticProvider::new(),
                };
                service.register_provider(Arc::new(provider));
            }
        }

        info!(
            provider = %config.kind,
            active = service.configuration.active,
            "Tax provider configured"
        );
        Ok(service)
    }

    /// Register a provider
    pub fn register_provider(&mut self, provider: Arc<dyn TaxRateProvider>) {
        let name = provider.name().to_string();
        self.providers.insert(name, provider);
    }

    /// Get a provider by name
    pub fn get_provider(&self, name: &str) -> AppResult<Arc<dyn TaxRateProvider>> {
        self.providers
            .get(name)
            .cloned()
            .ok_or_else(|| {
                AppError::Configuration(format!("Tax provider '{}' not registered", name))
            })
    }

    /// Provider selected by the configuration, if the plugin is active
    pub fn active_provider(&self) -> Option<Arc<dyn TaxRateProvider>> {
        if !self.configuration.active {
            return None;
        }
        self.get_provider(&self.configuration.provider.to_string()).ok()
    }

    pub fn configuration(&self) -> &PluginConfiguration {
        &self.configuration
    }

    /// Validate and store a configuration update
    pub fn save_configuration(&mut self, update: ConfigurationUpdate) -> AppResult<()> {
        match self.configuration.apply_update(update) {
            Ok(()) => {
                info!(
                    plugin = %self.configuration.name,
                    active = self.configuration.active,
                    "Plugin configuration saved"
                );
                Ok(())
            }
            Err(e) => {
                warn!(
                    plugin = %self.configuration.name,
                    error = %e,
                    "Rejected plugin configuration"
                );
                Err(e)
            }
        }
    }

    /// Vatlayer prices are shown with taxes on the storefront
    pub fn show_taxes_on_storefront(&self) -> bool {
        true
    }

    /// Category names an admin can assign to products: the provider's
    /// reduced-rate types plus `"standard"`, sorted and deduplicated
    pub async fn tax_rate_type_choices(&self) -> Vec<String> {
        let mut choices: BTreeSet<String> = BTreeSet::new();

        let provider = self.get_provider(&self.configuration.provider.to_string());
        match provider {
            Ok(provider) => match provider.rate_types().await {
                Ok(types) => choices.extend(types),
                Err(e) => warn!(
                    provider = %provider.name(),
                    error = %e,
                    "Failed to fetch tax rate types"
                ),
            },
            Err(e) => warn!(error = %e, "No provider for tax rate types"),
        }

        choices.insert(DEFAULT_TAX_RATE_NAME.to_string());
        choices.into_iter().collect()
    }

    /// Names of registered providers
    pub fn list_providers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.providers.keys().cloned().collect();
        names.sort();
        names
    }
}
