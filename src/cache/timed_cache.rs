use crate::cache::clock::Clock;
use chrono::{DateTime, TimeDelta, Utc};
use log::debug;
use std::sync::Arc;
use tokio::sync::RwLock;

struct CacheEntry<T> {
    value: Arc<T>,
    fetched_at: DateTime<Utc>,
}

/// A single-slot cache whose value expires a fixed time after it was stored.
///
/// The value and its timestamp are replaced together under one write lock, so
/// a reader sees either the old or the new value, never a mix. Nothing is held
/// locked while the caller fetches a replacement.
pub(crate) struct TimedCache<T> {
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
    entry: RwLock<Option<CacheEntry<T>>>,
}

impl<T> TimedCache<T> {
    pub fn new(ttl: TimeDelta, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entry: RwLock::new(None),
        }
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Returns the cached value if one exists and is younger than the TTL.
    pub async fn get_fresh(&self) -> Option<Arc<T>> {
        let entry = self.entry.read().await;
        let entry = entry.as_ref()?;
        let age = self.clock.now() - entry.fetched_at;
        if age < self.ttl {
            Some(Arc::clone(&entry.value))
        } else {
            debug!(
                "Cached value is stale (age {}s, ttl {}s)",
                age.num_seconds(),
                self.ttl.num_seconds()
            );
            None
        }
    }

    /// Replaces the cached value, stamping it with the current time.
    pub async fn store(&self, value: T) -> Arc<T> {
        let value = Arc::new(value);
        let fetched_at = self.clock.now();
        *self.entry.write().await = Some(CacheEntry {
            value: Arc::clone(&value),
            fetched_at,
        });
        value
    }

    /// Time the current value was stored, if any.
    pub async fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.entry.read().await.as_ref().map(|e| e.fetched_at)
    }
}
