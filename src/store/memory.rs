use crate::store::BaselineStore;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory baseline store using HashMap and Mutex.
///
/// Used by tests, and as the degraded fallback when the disk store cannot be
/// opened (baselines then last only for the process lifetime).
pub struct MemoryBaselines {
    inner: Arc<Mutex<HashMap<String, f64>>>,
}

impl MemoryBaselines {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for MemoryBaselines {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaselineStore for MemoryBaselines {
    async fn load(&self, currency: &str) -> Option<f64> {
        let baselines = self.inner.lock().await;
        let value = baselines.get(&currency.to_uppercase()).copied();
        debug!(currency, found = value.is_some(), "Baseline lookup");
        value
    }

    async fn save(&self, currency: &str, rate: f64) -> Result<()> {
        let mut baselines = self.inner.lock().await;
        baselines.insert(currency.to_uppercase(), rate);
        debug!(currency, rate, "Baseline stored");
        Ok(())
    }
}
