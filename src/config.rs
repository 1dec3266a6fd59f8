use crate::exchanges::kraken::DEFAULT_BASE_URL;
use crate::funding::{DEFAULT_BATCH_CONCURRENCY, MAX_CACHE_ENTRIES};
use anyhow::Context;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_port: u16,
    pub upstream_base_url: String,
    pub upstream_timeout: Duration,
    pub batch_concurrency: usize,
    pub cache_max_entries: usize,
    pub json_logs: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let api_port = parse_var("API_PORT", 3000u16)?;

        let upstream_base_url =
            env::var("UPSTREAM_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        reqwest::Url::parse(upstream_base_url.trim())
            .with_context(|| format!("UPSTREAM_BASE_URL is not a valid URL: {upstream_base_url:?}"))?;

        // applies to every upstream request, expiry surfaces as an upstream error
        let upstream_timeout = Duration::from_secs(parse_var("UPSTREAM_TIMEOUT_SECS", 10u64)?);

        let batch_concurrency = parse_var("BATCH_CONCURRENCY", DEFAULT_BATCH_CONCURRENCY)?;
        anyhow::ensure!(batch_concurrency > 0, "BATCH_CONCURRENCY must be at least 1");

        let cache_max_entries = parse_var("CACHE_MAX_ENTRIES", MAX_CACHE_ENTRIES)?;
        anyhow::ensure!(cache_max_entries > 0, "CACHE_MAX_ENTRIES must be at least 1");

        let json_logs = env::var("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Ok(Self {
            api_port,
            upstream_base_url,
            upstream_timeout,
            batch_concurrency,
            cache_max_entries,
            json_logs,
        })
    }
}

/// Reads `key`, falling back to `default` when unset.
fn parse_var<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        Err(_) => Ok(default),
    }
}
