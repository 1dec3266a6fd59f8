use super::Exchange;
use crate::errors::FundingError;
use crate::models::{FundingRateRecord, FundingRateSeries};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://futures.kraken.com/derivatives/api/v4";

/// The raw JSON shape of /historicalfundingrates. Only `rates` is required.
#[derive(Debug, Deserialize)]
struct HistoricalFundingRatesResponse {
    rates: Vec<FundingRateRecord>,
}

pub struct KrakenFutures {
    client: reqwest::Client,
    base_url: Url,
}

impl KrakenFutures {
    /// Builds a client whose every request is bounded by `timeout`.
    ///
    /// `base_url` must be an absolute http(s) URL; anything else is rejected
    /// here rather than on the first request.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FundingError> {
        let base_url = parse_base_url(base_url)?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();

        // base is validated as hierarchical in parse_base_url
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(path);
        }

        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }

        url
    }

    /// Sends a GET and returns the body bytes of a successful response.
    async fn get(&self, url: Url) -> Result<Vec<u8>, FundingError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FundingError::status(status.as_u16()));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

fn parse_base_url(raw: &str) -> Result<Url, FundingError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| FundingError::Config(format!("upstream base url {raw:?}: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(FundingError::Config(format!(
            "upstream base url {raw:?} must be an absolute http(s) URL"
        )));
    }

    Ok(url)
}

#[async_trait]
impl Exchange for KrakenFutures {
    fn name(&self) -> &'static str {
        "kraken"
    }

    /// Hits /historicalfundingrates with the symbol as a URL-encoded query
    /// parameter and keeps only the `rates` array.
    async fn fetch_funding_rates(&self, symbol: &str) -> Result<FundingRateSeries, FundingError> {
        let url = self.endpoint("historicalfundingrates", &[("symbol", symbol)]);
        let body = self.get(url).await?;

        let response: HistoricalFundingRatesResponse = serde_json::from_slice(&body)?;
        Ok(response.rates)
    }

    async fn fetch_tickers(&self) -> Result<serde_json::Value, FundingError> {
        let url = self.endpoint("tickers", &[]);
        let body = self.get(url).await?;

        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_rates_and_ignores_extra_fields() {
        let body = r#"{
            "result": "success",
            "serverTime": "2024-05-01T10:15:00.000Z",
            "rates": [
                {"timestamp": "2024-05-01T08:00:00.000Z", "fundingRate": -0.51, "relativeFundingRate": -0.0000081},
                {"timestamp": "2024-05-01T09:00:00.000Z", "fundingRate": 0.23, "relativeFundingRate": 0.0000037}
            ]
        }"#;

        let response: HistoricalFundingRatesResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.rates.len(), 2);
        assert_eq!(response.rates[0].relative_funding_rate, -0.0000081);
        assert_eq!(
            response.rates[1].timestamp.to_rfc3339(),
            "2024-05-01T09:00:00+00:00"
        );
    }

    #[test]
    fn missing_rates_is_a_decode_error() {
        let err: FundingError = serde_json::from_str::<HistoricalFundingRatesResponse>(
            r#"{"result": "error", "error": "unknown symbol"}"#,
        )
        .unwrap_err()
        .into();
        assert!(matches!(err, FundingError::Decode(_)));
    }

    #[test]
    fn tickers_url_has_no_query() {
        let kraken = KrakenFutures::new(DEFAULT_BASE_URL, Duration::from_secs(1)).unwrap();
        let url = kraken.endpoint("tickers", &[]);
        assert_eq!(
            url.as_str(),
            "https://futures.kraken.com/derivatives/api/v4/tickers"
        );
    }

    #[test]
    fn symbol_is_url_encoded() {
        let kraken = KrakenFutures::new("https://example.test/api/", Duration::from_secs(1)).unwrap();
        let url = kraken
            .endpoint("historicalfundingrates", &[("symbol", "PF_XBT USD&x=1")]);
        assert_eq!(
            url.as_str(),
            "https://example.test/api/historicalfundingrates?symbol=PF_XBT+USD%26x%3D1"
        );
    }

    #[test]
    fn malformed_base_url_is_rejected_up_front() {
        for bad in [
            "futures.kraken.com/derivatives/api/v4",
            "ftp://futures.kraken.com/v4",
            "mailto:ops@example.test",
            "",
        ] {
            let err = KrakenFutures::new(bad, Duration::from_secs(1)).err();
            assert!(matches!(err, Some(FundingError::Config(_))), "{bad}");
        }
    }

    /// Local stand-in for the upstream, keyed on the requested symbol.
    async fn serve_upstream() -> std::net::SocketAddr {
        use axum::extract::Query;
        use axum::http::StatusCode;
        use axum::response::{IntoResponse, Response};
        use axum::routing::get;
        use axum::{Json, Router};
        use std::collections::HashMap;

        async fn rates(Query(query): Query<HashMap<String, String>>) -> Response {
            let ok = serde_json::json!({
                "result": "success",
                "rates": [
                    {"timestamp": "2024-05-01T08:00:00.000Z", "fundingRate": 1.2, "relativeFundingRate": 0.0000125}
                ]
            });

            match query.get("symbol").map(String::as_str) {
                Some("PF_OK") => Json(ok).into_response(),
                Some("PF_FAIL") => StatusCode::SERVICE_UNAVAILABLE.into_response(),
                Some("PF_SLOW") => {
                    tokio::time::sleep(Duration::from_secs(2)).await;
                    Json(ok).into_response()
                }
                _ => "<html>maintenance</html>".into_response(),
            }
        }

        let app = Router::new()
            .route("/v4/historicalfundingrates", get(rates))
            .route(
                "/v4/tickers",
                get(|| async { Json(serde_json::json!({"tickers": [{"symbol": "PF_OK"}]})) }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn http_outcomes_map_to_error_kinds() {
        let addr = serve_upstream().await;
        let kraken =
            KrakenFutures::new(&format!("http://{addr}/v4/"), Duration::from_millis(300)).unwrap();

        let rates = kraken.fetch_funding_rates("PF_OK").await.unwrap();
        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].relative_funding_rate, 0.0000125);

        let err = kraken.fetch_funding_rates("PF_FAIL").await.unwrap_err();
        assert!(matches!(err, FundingError::Upstream { status: Some(503), .. }));
        assert_eq!(err.to_string(), "HTTP error! status: 503");

        let err = kraken.fetch_funding_rates("PF_SLOW").await.unwrap_err();
        assert!(matches!(err, FundingError::Upstream { status: None, .. }), "{err:?}");

        let err = kraken.fetch_funding_rates("PF_BAD").await.unwrap_err();
        assert!(matches!(err, FundingError::Decode(_)), "{err:?}");

        let tickers = kraken.fetch_tickers().await.unwrap();
        assert_eq!(tickers["tickers"][0]["symbol"], "PF_OK");
    }
}
