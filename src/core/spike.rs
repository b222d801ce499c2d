//! Compares the canonical rate against a persisted baseline and classifies
//! significant moves.

use crate::core::aggregate::Aggregator;
use crate::core::ranking;
use crate::store::BaselineStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// A rate move that exceeded the configured threshold. Handed to the caller
/// for delivery; never persisted.
#[derive(Debug, Clone)]
pub struct SpikeEvent {
    pub currency: String,
    pub previous_rate: f64,
    pub current_rate: f64,
    pub percent_change: f64,
    pub direction: Direction,
    pub observed_at: DateTime<Utc>,
}

/// Outcome of one spike check.
#[derive(Debug)]
pub enum SpikeCheck {
    /// Every provider came back empty; the baseline was left untouched.
    NoData,
    Checked {
        current_rate: f64,
        /// Present only when the move exceeded the threshold.
        event: Option<SpikeEvent>,
        /// False when the new baseline could not be written. The spike
        /// decision is still valid and should still be delivered.
        baseline_persisted: bool,
    },
}

pub struct SpikeDetector {
    aggregator: Aggregator,
    baselines: Arc<dyn BaselineStore>,
    threshold_pct: f64,
    // Serializes load-compare-save so overlapping checks cannot lose an
    // update.
    guard: Mutex<()>,
}

impl SpikeDetector {
    pub fn new(aggregator: Aggregator, baselines: Arc<dyn BaselineStore>, threshold_pct: f64) -> Self {
        Self {
            aggregator,
            baselines,
            threshold_pct,
            guard: Mutex::new(()),
        }
    }

    /// Fetches the canonical rate, compares it to the stored baseline, and
    /// unconditionally records the new rate as the baseline.
    ///
    /// The first observation for a currency establishes the baseline without
    /// producing an event. No data means no baseline mutation at all.
    pub async fn check(&self, currency: &str) -> SpikeCheck {
        let quotes = self.aggregator.aggregate(currency).await;
        let Some(current) = ranking::canonical(&quotes) else {
            debug!(currency, "No quotes available, baseline left untouched");
            return SpikeCheck::NoData;
        };
        let current_rate = current.sell;

        let _lock = self.guard.lock().await;

        let event = match self.baselines.load(currency).await {
            Some(previous_rate) => {
                let percent_change = (current_rate - previous_rate).abs() / previous_rate * 100.0;
                if percent_change > self.threshold_pct {
                    let direction = if current_rate > previous_rate {
                        Direction::Up
                    } else {
                        Direction::Down
                    };
                    info!(
                        currency,
                        previous_rate, current_rate, percent_change, "Rate spike detected"
                    );
                    Some(SpikeEvent {
                        currency: currency.to_string(),
                        previous_rate,
                        current_rate,
                        percent_change,
                        direction,
                        observed_at: Utc::now(),
                    })
                } else {
                    debug!(
                        currency,
                        previous_rate, current_rate, percent_change, "Rate change below threshold"
                    );
                    None
                }
            }
            None => {
                debug!(currency, current_rate, "First observation, establishing baseline");
                None
            }
        };

        let baseline_persisted = match self.baselines.save(currency, current_rate).await {
            Ok(()) => true,
            Err(e) => {
                warn!(currency, error = %e, "Failed to persist baseline");
                false
            }
        };

        SpikeCheck::Checked {
            current_rate,
            event,
            baseline_persisted,
        }
    }
}
