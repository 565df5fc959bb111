//! Time-boxed response cache over a session key-value store.
//!
//! Entries carry their own expiry. An expired or unparsable entry is deleted
//! the next time it is read and reported as a miss. Writes are best-effort.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};

use crate::error::CacheError;
use crate::store::KeyValueStore;

/// TTL for per-ingredient search results.
pub const INGREDIENT_TTL: Duration = Duration::from_secs(60 * 60);

/// TTL for per-recipe detail lookups.
pub const DETAIL_TTL: Duration = Duration::from_secs(2 * 60 * 60);

const INGREDIENT_PREFIX: &str = "ingredient_";
const DETAIL_PREFIX: &str = "meal_detail_";

/// Cache key for the search results of one ingredient.
pub fn ingredient_key(ingredient: &str) -> String {
    format!("{INGREDIENT_PREFIX}{ingredient}")
}

/// Cache key for the detail record of one recipe.
pub fn detail_key(recipe_id: &str) -> String {
    format!("{DETAIL_PREFIX}{recipe_id}")
}

/// A stored payload with its lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub payload: T,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    pub fn new(payload: T, now: DateTime<Utc>, ttl: Duration) -> Self {
        let expires_at = TimeDelta::from_std(ttl)
            .ok()
            .and_then(|d| now.checked_add_signed(d))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            payload,
            created_at: now,
            expires_at,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Response cache shared by every lookup in a search.
#[derive(Clone)]
pub struct ResponseCache {
    store: Arc<dyn KeyValueStore>,
}

impl ResponseCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Get a live entry's payload, or `None` on a miss.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get_at(key, Utc::now())
    }

    pub fn get_at<T: DeserializeOwned>(&self, key: &str, now: DateTime<Utc>) -> Option<T> {
        match self.lookup::<T>(key, now) {
            Ok(Some(payload)) => {
                tracing::debug!(key, "cache hit");
                Some(payload)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding corrupt cache entry");
                self.evict(key);
                None
            }
        }
    }

    fn lookup<T: DeserializeOwned>(
        &self,
        key: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<T>, CacheError> {
        let Some(raw) = self.store.get(key) else {
            return Ok(None);
        };

        let entry: CacheEntry<T> =
            serde_json::from_str(&raw).map_err(|e| CacheError::Corrupt {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        if entry.is_expired_at(now) {
            tracing::debug!(key, expires_at = %entry.expires_at, "cache entry expired");
            self.evict(key);
            return Ok(None);
        }

        Ok(Some(entry.payload))
    }

    /// Store a payload for `ttl`. Failures are logged and swallowed.
    pub fn put<T: Serialize>(&self, key: &str, payload: &T, ttl: Duration) {
        self.put_at(key, payload, ttl, Utc::now());
    }

    pub fn put_at<T: Serialize>(&self, key: &str, payload: &T, ttl: Duration, now: DateTime<Utc>) {
        let entry = CacheEntry::new(payload, now, ttl);
        let result = serde_json::to_string(&entry)
            .map_err(|e| CacheError::Store(e.into()))
            .and_then(|json| self.store.set(key, &json).map_err(CacheError::from));

        if let Err(e) = result {
            tracing::warn!(key, error = %e, "cache write failed");
        }
    }

    /// Remove expired or corrupt entries written by this cache.
    ///
    /// Returns the number of entries removed.
    pub fn clean_expired(&self) -> usize {
        self.clean_expired_at(Utc::now())
    }

    pub fn clean_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut removed = 0;
        for key in self.store.keys() {
            if !(key.starts_with(INGREDIENT_PREFIX) || key.starts_with(DETAIL_PREFIX)) {
                continue;
            }

            let stale = match self.store.get(&key) {
                Some(raw) => serde_json::from_str::<CacheEntry<IgnoredAny>>(&raw)
                    .map(|entry| entry.is_expired_at(now))
                    .unwrap_or(true),
                None => false,
            };

            if stale && self.evict(&key) {
                removed += 1;
            }
        }

        if removed > 0 {
            tracing::debug!(removed, "cleaned up expired cache entries");
        }
        removed
    }

    fn evict(&self, key: &str) -> bool {
        match self.store.delete(key) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(key, error = %e, "cache eviction failed");
                false
            }
        }
    }
}
