//! Quote model and the provider abstraction.

use anyhow::Result;
use async_trait::async_trait;

/// One source's buy/sell price pair for a currency, captured at fetch time.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub source: String,
    pub currency: String,
    pub buy: f64,
    pub sell: f64,
}

impl Quote {
    /// Both prices must be finite and strictly positive. Quotes failing this
    /// never enter an aggregated result.
    pub fn is_valid(&self) -> bool {
        self.buy.is_finite() && self.buy > 0.0 && self.sell.is_finite() && self.sell > 0.0
    }
}

/// A single external source of currency quotes.
///
/// Transport and payload errors are returned as `Err`; "the source answered
/// but had nothing for this currency" is `Ok` with an empty vector. The
/// aggregator collapses errors to empty groups, so a failing source degrades
/// the merged view instead of breaking it.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Source identifier used in logs.
    fn name(&self) -> &str;

    async fn fetch(&self, currency: &str) -> Result<Vec<Quote>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(buy: f64, sell: f64) -> Quote {
        Quote {
            source: "TestBank".to_string(),
            currency: "EUR".to_string(),
            buy,
            sell,
        }
    }

    #[test]
    fn test_valid_quote() {
        assert!(quote(48.10, 48.90).is_valid());
    }

    #[test]
    fn test_zero_price_is_invalid() {
        assert!(!quote(0.0, 48.90).is_valid());
        assert!(!quote(48.10, 0.0).is_valid());
    }

    #[test]
    fn test_negative_price_is_invalid() {
        assert!(!quote(-1.0, 48.90).is_valid());
    }

    #[test]
    fn test_non_finite_price_is_invalid() {
        assert!(!quote(f64::NAN, 48.90).is_valid());
        assert!(!quote(48.10, f64::INFINITY).is_valid());
    }
}
