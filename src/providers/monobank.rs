//! Monobank exchange rates. The listing keys entries by numeric ISO-4217
//! codes rather than letter codes, and some entries carry only a cross rate,
//! so both cash rates must be present for a quote. Prices are rounded to two
//! decimal places.

use crate::core::quote::{Quote, QuoteProvider};
use crate::providers::USER_AGENT;
use crate::providers::util::with_retry;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

const SOURCE: &str = "Monobank";

/// Numeric ISO-4217 code for the currencies the listing is matched against.
fn numeric_code(currency: &str) -> Option<u32> {
    match currency {
        "USD" => Some(840),
        "EUR" => Some(978),
        "PLN" => Some(985),
        "GBP" => Some(826),
        "CHF" => Some(756),
        "CZK" => Some(203),
        "UAH" => Some(980),
        _ => None,
    }
}

fn round_to_cents(rate: f64) -> f64 {
    (rate * 100.0).round() / 100.0
}

pub struct MonobankProvider {
    base_url: String,
    local_currency: String,
}

impl MonobankProvider {
    pub fn new(base_url: &str, local_currency: &str) -> Self {
        MonobankProvider {
            base_url: base_url.to_string(),
            local_currency: local_currency.to_uppercase(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MonobankRate {
    currency_code_a: u32,
    currency_code_b: u32,
    rate_buy: Option<f64>,
    rate_sell: Option<f64>,
}

#[async_trait]
impl QuoteProvider for MonobankProvider {
    fn name(&self) -> &str {
        SOURCE
    }

    async fn fetch(&self, currency: &str) -> Result<Vec<Quote>> {
        let wanted = currency.to_uppercase();
        let (Some(asset_code), Some(local_code)) =
            (numeric_code(&wanted), numeric_code(&self.local_currency))
        else {
            debug!(currency = %wanted, "No ISO numeric code mapping, skipping");
            return Ok(Vec::new());
        };

        let url = format!("{}/bank/currency", self.base_url);
        debug!("Requesting rates from {}", url);

        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        let response = with_retry(|| async { client.get(&url).send().await }, 3, 500)
            .await
            .with_context(|| format!("Failed to send request to {SOURCE}"))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {} from {}", response.status(), SOURCE));
        }

        let text = response.text().await?;
        let rates: Vec<MonobankRate> = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse {} response: {}", SOURCE, e))?;

        Ok(rates
            .into_iter()
            .filter(|rate| rate.currency_code_a == asset_code && rate.currency_code_b == local_code)
            .filter_map(|rate| {
                let buy = round_to_cents(rate.rate_buy?);
                let sell = round_to_cents(rate.rate_sell?);
                Some(Quote {
                    source: SOURCE.to_string(),
                    currency: wanted.clone(),
                    buy,
                    sell,
                })
            })
            .take(1)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/bank/currency"))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    #[tokio::test]
    async fn test_successful_fetch_matches_numeric_codes() {
        let mock_response = r#"[
            {"currencyCodeA": 840, "currencyCodeB": 980, "rateBuy": 41.05, "rateSell": 41.5504},
            {"currencyCodeA": 978, "currencyCodeB": 980, "rateBuy": 48.123, "rateSell": 48.9876},
            {"currencyCodeA": 978, "currencyCodeB": 840, "rateCross": 1.17}
        ]"#;
        let mock_server = create_mock_server(mock_response).await;

        let provider = MonobankProvider::new(&mock_server.uri(), "UAH");
        let quotes = provider.fetch("EUR").await.unwrap();

        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].source, "Monobank");
        assert_eq!(quotes[0].buy, 48.12);
        assert_eq!(quotes[0].sell, 48.99);
    }

    #[tokio::test]
    async fn test_cross_rate_only_entry_yields_no_quote() {
        let mock_response =
            r#"[{"currencyCodeA": 978, "currencyCodeB": 980, "rateCross": 48.55}]"#;
        let mock_server = create_mock_server(mock_response).await;

        let provider = MonobankProvider::new(&mock_server.uri(), "UAH");
        let quotes = provider.fetch("EUR").await.unwrap();
        assert!(quotes.is_empty());
    }

    #[tokio::test]
    async fn test_unmapped_currency_is_empty_without_request() {
        // No mock mounted: the provider must bail out before any HTTP call.
        let provider = MonobankProvider::new("http://127.0.0.1:9", "UAH");
        let quotes = provider.fetch("XAU").await.unwrap();
        assert!(quotes.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_response_is_an_error() {
        let mock_server = create_mock_server(r#"{"errorDescription": "Too many requests"}"#).await;

        let provider = MonobankProvider::new(&mock_server.uri(), "UAH");
        let result = provider.fetch("EUR").await;

        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse Monobank response")
        );
    }
}
