use funding_desk::api::ApiServer;
use funding_desk::collateral::CollateralStore;
use funding_desk::config::Config;
use funding_desk::exchanges::kraken::KrakenFutures;
use funding_desk::exchanges::Exchange;
use funding_desk::funding::FundingRateService;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.json_logs {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let exchange = KrakenFutures::new(&config.upstream_base_url, config.upstream_timeout)?;

    tracing::info!(
        "Funding desk starting — upstream [{}] {} (timeout {:?}), cache {} entries, batch concurrency {}",
        exchange.name(),
        config.upstream_base_url,
        config.upstream_timeout,
        config.cache_max_entries,
        config.batch_concurrency
    );

    let rates = FundingRateService::new(Arc::new(exchange))
        .with_cache_capacity(config.cache_max_entries)
        .with_batch_concurrency(config.batch_concurrency);

    ApiServer::new(rates, CollateralStore::seeded())
        .run(config)
        .await
}
