use crate::store::BaselineStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Serialize, Deserialize)]
struct BaselineRecord {
    rate: f64,
    recorded_at: DateTime<Utc>,
}

/// Baseline store backed by a fjall keyspace partition.
///
/// One record per upper-cased currency code, JSON-encoded. Unreadable or
/// corrupt records degrade to `None` so a damaged store costs one historical
/// comparison point, not the whole check.
pub struct DiskBaselines {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskBaselines {
    pub fn open(dir: &Path) -> Result<Self> {
        let keyspace = fjall::Config::new(dir)
            .open()
            .with_context(|| format!("Failed to open baseline store at {}", dir.display()))?;
        let partition = keyspace
            .open_partition("baselines", PartitionCreateOptions::default())
            .context("Failed to open baselines partition")?;
        Ok(Self {
            keyspace,
            partition,
        })
    }
}

#[async_trait]
impl BaselineStore for DiskBaselines {
    async fn load(&self, currency: &str) -> Option<f64> {
        let key = currency.to_uppercase();
        match self.partition.get(key.as_bytes()) {
            Ok(Some(raw)) => match serde_json::from_slice::<BaselineRecord>(&raw) {
                Ok(record) => {
                    debug!(currency = %key, rate = record.rate, "Loaded baseline");
                    Some(record.rate)
                }
                Err(e) => {
                    warn!(currency = %key, error = %e, "Discarding unreadable baseline record");
                    None
                }
            },
            Ok(None) => {
                debug!(currency = %key, "No baseline recorded");
                None
            }
            Err(e) => {
                warn!(currency = %key, error = %e, "Baseline store read failed");
                None
            }
        }
    }

    async fn save(&self, currency: &str, rate: f64) -> Result<()> {
        let key = currency.to_uppercase();
        let record = BaselineRecord {
            rate,
            recorded_at: Utc::now(),
        };
        self.partition
            .insert(key.as_bytes(), serde_json::to_vec(&record)?)
            .with_context(|| format!("Failed to write baseline for {key}"))?;
        self.keyspace
            .persist(PersistMode::SyncAll)
            .context("Failed to sync baseline store")?;
        debug!(currency = %key, rate, "Saved baseline");
        Ok(())
    }
}
