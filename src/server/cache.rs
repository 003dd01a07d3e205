use std::future::Future;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock};

use super::error::ChannelError;
use super::types::ChannelRecord;

// ── Single-entry TTL cache with stale fallback ────────────────────────────────

struct Entry {
    record: ChannelRecord,
    fetched: Instant,
}

/// Time-windowed holder for the one aggregated record. Constructed once at
/// process start; holds zero or one entries. The entry is replaced wholesale
/// on a successful refresh and left untouched on a failed one, so the cache
/// stays logically expired until a refresh succeeds.
pub struct ChannelCache {
    ttl: Duration,
    entry: RwLock<Option<Entry>>,
    refresh_gate: Mutex<()>,
}

impl ChannelCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: RwLock::new(None),
            refresh_gate: Mutex::new(()),
        }
    }

    /// Serves the cached record while fresh; otherwise runs `refresh`. A
    /// failed refresh re-serves the previous record flagged stale; with
    /// nothing cached the failure surfaces. Returns the record and whether
    /// it came from the cache.
    pub async fn get_with<F, Fut>(&self, refresh: F) -> Result<(ChannelRecord, bool), ChannelError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<ChannelRecord, ChannelError>>,
    {
        if let Some(record) = self.fresh().await {
            return Ok((record, true));
        }

        // Expired readers queue here so a burst triggers one upstream refresh.
        let _gate = self.refresh_gate.lock().await;
        if let Some(record) = self.fresh().await {
            return Ok((record, true));
        }

        match refresh().await {
            Ok(record) => {
                let mut entry = self.entry.write().await;
                *entry = Some(Entry {
                    record: record.clone(),
                    fetched: Instant::now(),
                });
                Ok((record, false))
            }
            Err(e) => {
                let entry = self.entry.read().await;
                match entry.as_ref() {
                    Some(prev) => {
                        tracing::warn!(error = %e, "refresh failed, serving last good record");
                        let mut record = prev.record.clone();
                        record.stale = Some(true);
                        Ok((record, true))
                    }
                    None => Err(e),
                }
            }
        }
    }

    async fn fresh(&self) -> Option<ChannelRecord> {
        let entry = self.entry.read().await;
        entry
            .as_ref()
            .filter(|e| e.fetched.elapsed() < self.ttl)
            .map(|e| e.record.clone())
    }
}
