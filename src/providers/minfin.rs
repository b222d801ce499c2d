//! Minfin currency listing: many competing sources in one response, so a
//! single fetch can yield several quotes. Entries with a missing or "0.00"
//! bid/ask are stale placeholders and are dropped.

use crate::core::quote::{Quote, QuoteProvider};
use crate::providers::USER_AGENT;
use crate::providers::util::{parse_price, with_retry};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

const SOURCE: &str = "Minfin";

pub struct MinfinProvider {
    base_url: String,
    api_key: String,
}

impl MinfinProvider {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        MinfinProvider {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MinfinEntry {
    bank: Option<String>,
    bid: Option<String>,
    ask: Option<String>,
}

#[async_trait]
impl QuoteProvider for MinfinProvider {
    fn name(&self) -> &str {
        SOURCE
    }

    async fn fetch(&self, currency: &str) -> Result<Vec<Quote>> {
        let wanted = currency.to_uppercase();
        let url = format!(
            "{}/fb/currency/list?currency={}&apiKey={}",
            self.base_url, wanted, self.api_key
        );
        debug!("Requesting rates from {}", url);

        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        let response = with_retry(|| async { client.get(&url).send().await }, 3, 500)
            .await
            .with_context(|| format!("Failed to send request to {SOURCE}"))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {} from {}", response.status(), SOURCE));
        }

        let text = response.text().await?;
        let entries: Vec<MinfinEntry> = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse {} response: {}", SOURCE, e))?;

        Ok(entries
            .into_iter()
            .filter_map(|entry| {
                let bank = entry.bank?;
                let buy = parse_price(entry.bid.as_deref()?)?;
                let sell = parse_price(entry.ask.as_deref()?)?;
                Some(Quote {
                    source: bank,
                    currency: wanted.clone(),
                    buy,
                    sell,
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(currency: &str, mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/fb/currency/list"))
            .and(query_param("currency", currency))
            .and(query_param("apiKey", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    #[tokio::test]
    async fn test_successful_fetch_returns_all_sources() {
        let mock_response = r#"[
            {"bank": "oschadbank", "bid": "48.20", "ask": "48.75"},
            {"bank": "raiffeisen", "bid": "48.00", "ask": "48.60"}
        ]"#;
        let mock_server = create_mock_server("EUR", mock_response).await;

        let provider = MinfinProvider::new(&mock_server.uri(), "test-key");
        let quotes = provider.fetch("EUR").await.unwrap();

        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].source, "oschadbank");
        assert_eq!(quotes[0].buy, 48.2);
        assert_eq!(quotes[0].sell, 48.75);
        assert_eq!(quotes[1].source, "raiffeisen");
    }

    #[tokio::test]
    async fn test_zero_and_missing_values_are_filtered() {
        let mock_response = r#"[
            {"bank": "stale", "bid": "0.00", "ask": "48.60"},
            {"bank": "partial", "bid": "48.20"},
            {"bid": "48.20", "ask": "48.60"},
            {"bank": "good", "bid": "48.10", "ask": "48.70"}
        ]"#;
        let mock_server = create_mock_server("EUR", mock_response).await;

        let provider = MinfinProvider::new(&mock_server.uri(), "test-key");
        let quotes = provider.fetch("EUR").await.unwrap();

        let sources: Vec<&str> = quotes.iter().map(|q| q.source.as_str()).collect();
        assert_eq!(sources, vec!["good"]);
    }

    #[tokio::test]
    async fn test_empty_listing_is_empty_not_error() {
        let mock_server = create_mock_server("PLN", "[]").await;

        let provider = MinfinProvider::new(&mock_server.uri(), "test-key");
        let quotes = provider.fetch("PLN").await.unwrap();
        assert!(quotes.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_response_is_an_error() {
        let mock_server = create_mock_server("EUR", r#"{"error": "quota exceeded"}"#).await;

        let provider = MinfinProvider::new(&mock_server.uri(), "test-key");
        let result = provider.fetch("EUR").await;

        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse Minfin response")
        );
    }

    #[tokio::test]
    async fn test_http_error_is_an_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fb/currency/list"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&mock_server)
            .await;

        let provider = MinfinProvider::new(&mock_server.uri(), "test-key");
        assert!(provider.fetch("EUR").await.is_err());
    }
}
