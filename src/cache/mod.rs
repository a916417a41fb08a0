//! Single-slot in-memory cache with a fixed time-to-live
//!
//! Concurrent refreshes are last-writer-wins: two requests that both miss
//! will both fetch, and whichever stores second is kept.

use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct Entry<T> {
    value: T,
    stored_at: Instant,
}

/// A cached value that expires `ttl` after it was stored
#[derive(Debug)]
pub struct TtlCache<T> {
    ttl: Duration,
    slot: RwLock<Option<Entry<T>>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
        }
    }

    /// The cached value, if it is younger than the TTL
    pub async fn get(&self) -> Option<T> {
        self.get_at(Instant::now()).await
    }

    pub async fn get_at(&self, now: Instant) -> Option<T> {
        let slot = self.slot.read().await;
        slot.as_ref()
            .filter(|entry| now.saturating_duration_since(entry.stored_at) < self.ttl)
            .map(|entry| entry.value.clone())
    }

    /// Replace the cached value
    pub async fn insert(&self, value: T) {
        self.insert_at(value, Instant::now()).await
    }

    pub async fn insert_at(&self, value: T, now: Instant) {
        *self.slot.write().await = Some(Entry {
            value,
            stored_at: now,
        });
    }

    /// Drop the cached value
    pub async fn clear(&self) {
        *self.slot.write().await = None;
    }
}
