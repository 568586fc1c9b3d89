// Integration tests for the vatlayer HTTP client against a mock API

use rust_decimal_macros::dec;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vatlayer::core::{AppError, CountryCode, Currency, Money};
use vatlayer::providers::{TaxRateProvider, VatlayerProvider};
use vatlayer::taxes::{TaxCache, TaxCalculator};

fn provider(server: &MockServer, max_retries: u32) -> VatlayerProvider {
    VatlayerProvider::new(
        "test_key".to_string(),
        server.uri(),
        Duration::from_secs(5),
        max_retries,
    )
    .unwrap()
}

fn rate_list() -> serde_json::Value {
    json!({
        "success": true,
        "rates": {
            "PL": {
                "country_name": "Poland",
                "standard_rate": 23,
                "reduced_rates": {"medical": 8, "books": 5}
            },
            "DK": {
                "country_name": "Denmark",
                "standard_rate": 25,
                "reduced_rates": []
            }
        }
    })
}

#[tokio::test]
async fn test_rate_list_is_parsed_into_table() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rate_list"))
        .and(query_param("access_key", "test_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rate_list()))
        .expect(2)
        .mount(&server)
        .await;

    let provider = provider(&server, 0);

    let table = provider.get_table(CountryCode::PL).await.unwrap();
    assert_eq!(table.country, CountryCode::PL);
    assert_eq!(table.standard().unwrap().value, dec!(23));
    assert_eq!(table.get("medical").unwrap().value, dec!(8));
    assert_eq!(table.len(), 3);

    let table = provider.get_table("DK".parse::<CountryCode>().unwrap()).await.unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.standard().unwrap().value, dec!(25));
}

#[tokio::test]
async fn test_unknown_country_gives_empty_table() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rate_list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rate_list()))
        .mount(&server)
        .await;

    let table = provider(&server, 0).get_table(CountryCode::US).await.unwrap();
    assert!(table.is_empty());
}

#[tokio::test]
async fn test_rate_types() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/types"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "types": ["books", "medical", "wine"]
        })))
        .mount(&server)
        .await;

    let types = provider(&server, 0).rate_types().await.unwrap();
    assert_eq!(types, vec!["books", "medical", "wine"]);
}

#[tokio::test]
async fn test_api_error_payload_is_a_lookup_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rate_list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": {"code": 101, "type": "invalid_access_key", "info": "You have not supplied a valid API Access Key."}
        })))
        .mount(&server)
        .await;

    let err = provider(&server, 0).get_table(CountryCode::PL).await.unwrap_err();
    match err {
        AppError::ProviderLookup(message) => assert!(message.contains("invalid_access_key")),
        other => panic!("expected ProviderLookup, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_without_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rate_list"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let err = provider(&server, 0).get_table(CountryCode::PL).await.unwrap_err();
    assert!(matches!(err, AppError::ProviderLookup(_)));
}

#[tokio::test]
async fn test_transient_error_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rate_list"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rate_list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rate_list()))
        .expect(1)
        .mount(&server)
        .await;

    let table = provider(&server, 1).get_table(CountryCode::PL).await.unwrap();
    assert_eq!(table.standard().unwrap().value, dec!(23));
}

#[tokio::test]
async fn test_malformed_body_is_a_lookup_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/types"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = provider(&server, 0).rate_types().await.unwrap_err();
    assert!(matches!(err, AppError::ProviderLookup(_)));
}

#[tokio::test]
async fn test_out_of_range_rates_degrade_to_untaxed_batch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rate_list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "rates": {
                "PL": {"country_name": "Poland", "standard_rate": -100, "reduced_rates": []}
            }
        })))
        .expect(2)
        .mount(&server)
        .await;

    let provider = provider(&server, 0);
    let err = provider.get_table(CountryCode::PL).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let mut cache = TaxCache::new(&provider);
    let table = cache.get_cached_table(CountryCode::PL).await;
    assert!(table.is_empty());
    assert_eq!(cache.lookup_failures(), 1);

    let taxed = TaxCalculator::new()
        .apply_tax_to_money(Some(&table), "standard", Money::new(dec!(10), Currency::USD), true)
        .unwrap();
    assert_eq!(taxed.net(), taxed.gross());
}
