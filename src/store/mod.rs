//! Baseline persistence: the last recorded canonical rate per currency.

pub mod disk;
pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

/// Durable key-value record set mapping a currency code to its last
/// recorded rate.
///
/// `load` must be safe to call for a currency that was never saved, and an
/// unreadable store degrades to "no baseline" rather than failing the check.
#[async_trait]
pub trait BaselineStore: Send + Sync {
    async fn load(&self, currency: &str) -> Option<f64>;

    /// Replaces the record for `currency`. Keys are case-insensitive.
    async fn save(&self, currency: &str, rate: f64) -> Result<()>;
}
