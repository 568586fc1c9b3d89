use anyhow::{bail, Context};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vatlayer::config::Config;
use vatlayer::core::{CountryCode, Currency, Money};
use vatlayer::providers::ProviderService;
use vatlayer::taxes::{TaxCache, TaxationService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    // Initialize tracing; stdout carries the JSON output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("vatlayer={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;

    tracing::info!("Environment: {}", config.app.env);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let country = match args.first() {
        Some(code) => CountryCode::from_str(code).map_err(anyhow::Error::msg)?,
        None => config.taxes.default_country,
    };

    let providers = ProviderService::from_config(&config.provider).await?;
    let provider = providers
        .get_provider(&config.provider.kind.to_string())
        .context("No tax provider available; set VATLAYER_ACCESS_KEY or TAX_PROVIDER=static")?;

    let mut cache = TaxCache::new(provider.as_ref());
    let table = cache.get_cached_table(country).await;
    println!("{}", serde_json::to_string_pretty(table.as_ref())?);

    match args.get(1..).unwrap_or(&[]) {
        [] => {}
        [category, amount, currency] => {
            let amount = Decimal::from_str(amount).context("Invalid amount")?;
            let currency = Currency::from_str(currency).map_err(anyhow::Error::msg)?;
            let service = TaxationService::new(config.taxes, providers.configuration().active);
            let taxed = service
                .product_price(
                    &mut cache,
                    Some(category.as_str()),
                    Money::new(amount, currency),
                    Some(country),
                )
                .await?;
            println!("{}", serde_json::to_string_pretty(&taxed)?);
        }
        _ => bail!("usage: vatlayer [COUNTRY [CATEGORY AMOUNT CURRENCY]]"),
    }

    Ok(())
}
