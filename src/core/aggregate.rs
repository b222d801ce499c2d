//! Fans out one currency request to every configured provider and merges the
//! answers into a single list of quotes.

use crate::core::quote::{Quote, QuoteProvider};
use crate::core::ranking;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub struct Aggregator {
    providers: Vec<Arc<dyn QuoteProvider>>,
    timeout: Duration,
}

impl Aggregator {
    pub fn new(providers: Vec<Arc<dyn QuoteProvider>>, timeout: Duration) -> Self {
        Self { providers, timeout }
    }

    /// Queries all providers concurrently and concatenates their quotes in
    /// configured provider order.
    ///
    /// A provider error or timeout contributes an empty group; all providers
    /// returning nothing is a normal outcome, not an error. Quotes with
    /// non-positive or non-finite prices are dropped here and never reach a
    /// caller.
    pub async fn aggregate(&self, currency: &str) -> Vec<Quote> {
        let fetches = self.providers.iter().map(|provider| async move {
            match tokio::time::timeout(self.timeout, provider.fetch(currency)).await {
                Ok(Ok(quotes)) => quotes,
                Ok(Err(e)) => {
                    warn!(provider = provider.name(), error = %e, "Provider fetch failed");
                    Vec::new()
                }
                Err(_) => {
                    warn!(
                        provider = provider.name(),
                        timeout = ?self.timeout,
                        "Provider timed out"
                    );
                    Vec::new()
                }
            }
        });

        let quotes: Vec<Quote> = join_all(fetches)
            .await
            .into_iter()
            .flatten()
            .filter(|quote| {
                if quote.is_valid() {
                    true
                } else {
                    debug!(
                        source = %quote.source,
                        buy = quote.buy,
                        sell = quote.sell,
                        "Dropping quote with invalid prices"
                    );
                    false
                }
            })
            .collect();

        debug!(currency, count = quotes.len(), "Aggregated quotes");
        quotes
    }

    /// Aggregates and returns the `n` quotes with the lowest sell price.
    pub async fn top_cheapest(&self, currency: &str, n: usize) -> Vec<Quote> {
        ranking::top_cheapest(&self.aggregate(currency).await, n)
    }

    /// Aggregates and returns one quote per distinct source, sorted by
    /// source name.
    pub async fn distinct_by_source(&self, currency: &str) -> Vec<Quote> {
        ranking::distinct_by_source(&self.aggregate(currency).await)
    }
}
