//! PrivatBank cash exchange rates. A flat list response with one entry per
//! currency; at most one quote per fetch.

use crate::core::quote::{Quote, QuoteProvider};
use crate::providers::USER_AGENT;
use crate::providers::util::parse_price;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

const SOURCE: &str = "PrivatBank";

pub struct PrivatProvider {
    base_url: String,
}

impl PrivatProvider {
    pub fn new(base_url: &str) -> Self {
        PrivatProvider {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PrivatRate {
    ccy: String,
    buy: String,
    sale: String,
}

#[async_trait]
impl QuoteProvider for PrivatProvider {
    fn name(&self) -> &str {
        SOURCE
    }

    async fn fetch(&self, currency: &str) -> Result<Vec<Quote>> {
        let url = format!("{}/p24api/pubinfo?json&exchange&coursid=5", self.base_url);
        debug!("Requesting rates from {}", url);

        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for URL: {}", e, url))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {} from {}", response.status(), SOURCE));
        }

        let text = response.text().await?;
        let rates: Vec<PrivatRate> = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse {} response: {}", SOURCE, e))?;

        let wanted = currency.to_uppercase();
        Ok(rates
            .into_iter()
            .filter(|rate| rate.ccy == wanted)
            .filter_map(|rate| {
                let buy = parse_price(&rate.buy)?;
                let sell = parse_price(&rate.sale)?;
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
