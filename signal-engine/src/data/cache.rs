//! TTL cache in front of a [`DataProvider`]

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Duration;
use shared::{Clock, Timeframe};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::data::{DataProvider, MarketDataset};

/// Default lifetime of a cached dataset, in seconds.
pub const DEFAULT_CACHE_TTL_SECS: i64 = 300;

type CacheKey = (String, Timeframe);

/// One key's entry. Its mutex is held across check, fetch and store, so
/// concurrent misses on the same key share a single provider call.
type Slot = Arc<Mutex<Option<Arc<MarketDataset>>>>;

/// One dataset per (symbol, timeframe). Entries are replaced wholesale on
/// miss or expiry; a provider failure leaves the entry untouched.
pub struct MarketDataCache {
    provider: Arc<dyn DataProvider>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    entries: RwLock<HashMap<CacheKey, Slot>>,
}

impl MarketDataCache {
    pub fn new(provider: Arc<dyn DataProvider>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            provider,
            clock,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    async fn slot(&self, key: &CacheKey) -> Slot {
        if let Some(slot) = self.entries.read().await.get(key) {
            return slot.clone();
        }
        self.entries.write().await.entry(key.clone()).or_default().clone()
    }

    /// Return the cached dataset while fresh, otherwise fetch and store a new one.
    /// `None` means no data could be produced.
    pub async fn get(&self, symbol: &str, timeframe: Timeframe) -> Option<Arc<MarketDataset>> {
        let key = (symbol.to_string(), timeframe);
        let slot = self.slot(&key).await;
        let mut entry = slot.lock().await;

        if let Some(cached) = entry.as_ref() {
            if self.clock.now() - cached.generated_at() < self.ttl {
                debug!("Cache hit for {} ({})", symbol, timeframe);
                return Some(cached.clone());
            }
        }

        let series = match self.provider.fetch(symbol, timeframe).await {
            Ok(series) => series,
            Err(e) => {
                warn!("Market data unavailable for {} ({}): {}", symbol, timeframe, e);
                return None;
            }
        };

        let dataset = match MarketDataset::new(symbol, timeframe, series, self.clock.now()) {
            Ok(dataset) => Arc::new(dataset),
            Err(e) => {
                warn!("Discarding malformed dataset for {} ({}): {}", symbol, timeframe, e);
                return None;
            }
        };

        *entry = Some(dataset.clone());
        debug!("Cached fresh dataset for {} ({})", symbol, timeframe);
        Some(dataset)
    }

    /// Peek at the stored entry without refreshing it.
    pub async fn cached(&self, symbol: &str, timeframe: Timeframe) -> Option<Arc<MarketDataset>> {
        let slot = self
            .entries
            .read()
            .await
            .get(&(symbol.to_string(), timeframe))
            .cloned()?;
        let dataset = slot.lock().await.clone();
        dataset
    }

    /// Number of keys holding a dataset.
    pub async fn len(&self) -> usize {
        let slots: Vec<Slot> = self.entries.read().await.values().cloned().collect();
        let mut filled = 0;
        for slot in slots {
            if slot.lock().await.is_some() {
                filled += 1;
            }
        }
        filled
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
