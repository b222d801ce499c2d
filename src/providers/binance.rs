//! Binance spot price for a single trading pair against the local currency.
//! The feed has no bid/ask spread, so buy and sell carry the same value.
//! Unknown symbols are answered with an error object and no `price` key.

use crate::core::quote::{Quote, QuoteProvider};
use crate::providers::USER_AGENT;
use crate::providers::util::parse_price;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

const SOURCE: &str = "Binance";

pub struct BinanceProvider {
    base_url: String,
    local_currency: String,
}

impl BinanceProvider {
    pub fn new(base_url: &str, local_currency: &str) -> Self {
        BinanceProvider {
            base_url: base_url.to_string(),
            local_currency: local_currency.to_uppercase(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TickerResponse {
    price: Option<String>,
}

#[async_trait]
impl QuoteProvider for BinanceProvider {
    fn name(&self) -> &str {
        SOURCE
    }

    async fn fetch(&self, currency: &str) -> Result<Vec<Quote>> {
        let wanted = currency.to_uppercase();
        let symbol = format!("{}{}", wanted, self.local_currency);
        let url = format!("{}/api/v3/ticker/price?symbol={}", self.base_url, symbol);
        debug!("Requesting spot price from {}", url);

        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for symbol: {}", e, symbol))?;

        // Unknown symbols come back as a 4xx with an error body; only the
        // presence of the price field decides whether there is a quote.
        let text = response.text().await?;
        let ticker: TickerResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse {} response for {}: {}", SOURCE, symbol, e))?;

        let Some(price) = ticker.price.as_deref().and_then(parse_price) else {
            debug!(%symbol, "No spot price available");
            return Ok(Vec::new());
        };

        Ok(vec![Quote {
            source: SOURCE.to_string(),
            currency: wanted,
            buy: price,
            sell: price,
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(symbol: &str, status: u16, mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v3/ticker/price"))
            .and(query_param("symbol", symbol))
            .respond_with(ResponseTemplate::new(status).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    #[tokio::test]
    async fn test_successful_fetch_has_identical_buy_and_sell() {
        let mock_server =
            create_mock_server("EURUAH", 200, r#"{"symbol": "EURUAH", "price": "48.53000000"}"#)
                .await;

        let provider = BinanceProvider::new(&mock_server.uri(), "UAH");
        let quotes = provider.fetch("EUR").await.unwrap();

        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].source, "Binance");
        assert_eq!(quotes[0].buy, 48.53);
        assert_eq!(quotes[0].sell, 48.53);
    }

    #[tokio::test]
    async fn test_unknown_symbol_is_empty_not_error() {
        let mock_server =
            create_mock_server("XYZUAH", 400, r#"{"code": -1121, "msg": "Invalid symbol."}"#).await;

        let provider = BinanceProvider::new(&mock_server.uri(), "UAH");
        let quotes = provider.fetch("XYZ").await.unwrap();
        assert!(quotes.is_empty());
    }

    #[tokio::test]
    async fn test_symbol_is_built_from_local_currency() {
        let mock_server =
            create_mock_server("USDPLN", 200, r#"{"symbol": "USDPLN", "price": "3.95"}"#).await;

        let provider = BinanceProvider::new(&mock_server.uri(), "pln");
        let quotes = provider.fetch("usd").await.unwrap();

        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].currency, "USD");
    }

    #[tokio::test]
    async fn test_malformed_response_is_an_error() {
        let mock_server = create_mock_server("EURUAH", 200, "<html>busy</html>").await;

        let provider = BinanceProvider::new(&mock_server.uri(), "UAH");
        let result = provider.fetch("EUR").await;

        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse Binance response")
        );
    }
}
