// Integration tests for plugin configuration and provider selection

mod tax_fixtures;

use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tax_fixtures::{de_table, pl_table};
use vatlayer::config::ProviderConfig;
use vatlayer::core::AppError;
use vatlayer::providers::{
    ConfigurationUpdate, PluginConfiguration, ProviderKind, ProviderService, StaticProvider,
    TaxRateProvider, VatlayerProvider,
};

fn static_service() -> ProviderService {
    let mut service =
        ProviderService::new(PluginConfiguration::new(ProviderKind::Static, true, None));
    service.register_provider(Arc::new(
        StaticProvider::new().with_table(pl_table()).with_table(de_table()),
    ));
    service
}

#[test]
fn test_activation_requires_access_key() {
    let mut service = ProviderService::new(PluginConfiguration::default());

    let err = service
        .save_configuration(ConfigurationUpdate {
            active: Some(true),
            access_key: None,
        })
        .unwrap_err();
    match err {
        AppError::ActivationWithoutConfiguration { plugin, fields } => {
            assert_eq!(plugin, "Vatlayer");
            assert_eq!(fields, "access_key");
        }
        other => panic!("expected ActivationWithoutConfiguration, got {:?}", other),
    }
    assert!(!service.configuration().active);

    // A blank key is as good as none
    assert!(service
        .save_configuration(ConfigurationUpdate {
            active: Some(true),
            access_key: Some("   ".to_string()),
        })
        .is_err());

    service
        .save_configuration(ConfigurationUpdate {
            active: Some(true),
            access_key: Some("secret".to_string()),
        })
        .unwrap();
    assert!(service.configuration().active);
}

#[test]
fn test_inactive_plugin_has_no_active_provider() {
    let mut service = static_service();
    assert!(service.active_provider().is_some());

    service
        .save_configuration(ConfigurationUpdate {
            active: Some(false),
            access_key: None,
        })
        .unwrap();
    assert!(service.active_provider().is_none());
    assert_eq!(service.list_providers(), vec!["static"]);
}

#[tokio::test]
async fn test_tax_rate_type_choices_include_standard() {
    let service = static_service();
    assert!(service.show_taxes_on_storefront());
    assert_eq!(
        service.tax_rate_type_choices().await,
        vec!["books", "medical", "standard"]
    );
}

#[tokio::test]
async fn test_tax_rate_type_choices_degrade_on_provider_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/types"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut service = ProviderService::new(PluginConfiguration::new(
        ProviderKind::Vatlayer,
        true,
        Some("test_key".to_string()),
    ));
    service.register_provider(Arc::new(
        VatlayerProvider::new(
            "test_key".to_string(),
            server.uri(),
            Duration::from_secs(5),
            0,
        )
        .unwrap(),
    ));

    assert_eq!(service.tax_rate_type_choices().await, vec!["standard"]);
}

#[tokio::test]
async fn test_static_provider_loaded_from_file() {
    let path = std::env::temp_dir().join(format!("vatlayer-rates-{}.json", std::process::id()));
    tokio::fs::write(
        &path,
        r#"{"success": true, "rates": {"FR": {"country_name": "France", "standard_rate": 20, "reduced_rates": {"books": 5.5}}}}"#,
    )
    .await
    .unwrap();

    let config = ProviderConfig {
        kind: ProviderKind::Static,
        active: true,
        static_rates_path: Some(path.clone()),
        ..ProviderConfig::default()
    };
    let service = ProviderService::from_config(&config).await.unwrap();
    let provider = service.active_provider().unwrap();

    let table = provider.get_table("FR".parse().unwrap()).await.unwrap();
    assert_eq!(table.get("books").unwrap().value, rust_decimal_macros::dec!(5.5));
    assert_eq!(service.tax_rate_type_choices().await, vec!["books", "standard"]);

    tokio::fs::remove_file(&path).await.unwrap();
}

#[tokio::test]
async fn test_missing_static_file_is_an_error() {
    let config = ProviderConfig {
        kind: ProviderKind::Static,
        active: true,
        static_rates_path: Some("/nonexistent/vatlayer-rates.json".into()),
        ..ProviderConfig::default()
    };
    assert!(matches!(
        ProviderService::from_config(&config).await,
        Err(AppError::Io(_))
    ));
}
