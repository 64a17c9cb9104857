//! In-memory response cache with TTL-based expiration.

use serde_json::Value;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// A cached API response with its expiry
#[derive(Debug, Clone)]
struct CachedResponse {
    value: Value,
    expires_at: Instant,
}

impl CachedResponse {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Raw JSON responses keyed by endpoint and parameters.
#[derive(Debug)]
pub struct ResponseCache {
    storage: HashMap<String, CachedResponse>,
    ttl: Duration,
}

impl ResponseCache {
    /// Creates an empty cache whose entries live for `ttl`. A zero TTL disables caching.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            storage: HashMap::new(),
            ttl,
        }
    }

    /// Builds the cache key for an endpoint; parameter order does not matter.
    #[must_use]
    pub fn key(endpoint: &str, params: &[(&str, String)]) -> String {
        let mut sorted: Vec<String> = params
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        sorted.sort();
        format!("{}?{}", endpoint.trim_start_matches('/'), sorted.join("&"))
    }

    /// Gets a cached response if it exists and hasn't expired
    pub fn get(&mut self, key: &str) -> Option<Value> {
        if let Some(cached) = self.storage.get(key) {
            if !cached.is_expired() {
                return Some(cached.value.clone());
            }
            self.storage.remove(key);
        }
        None
    }

    /// Stores a response, dropping every entry that has already expired
    pub fn put(&mut self, key: String, value: Value) {
        if self.ttl.is_zero() {
            return;
        }
        self.clear_expired();
        let expires_at = Instant::now() + self.ttl;
        self.storage.insert(key, CachedResponse { value, expires_at });
    }

    /// Clears all expired entries from the cache
    pub fn clear_expired(&mut self) {
        self.storage.retain(|_, cached| !cached.is_expired());
    }

    /// Clears all entries from the cache
    pub fn clear(&mut self) {
        self.storage.clear();
    }

    /// Returns the number of entries in the cache
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns whether the cache is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}
