// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Time-bounded key/value cache with a deliberate stale-read escape hatch.
//!
//! Every fetching component in this service shares the same pattern: a
//! result set is fetched as a whole, cached under a single well-known key,
//! and re-served for a short freshness window. When an upstream goes down,
//! callers can still [`peek`](TimedCache::peek) the last known value and
//! degrade gracefully instead of returning nothing.
//!
//! Entries are never physically removed; expiry only makes them invisible
//! to [`get`](TimedCache::get). The key set in this service is a small
//! fixed collection (one key per logical resource), so memory stays bounded.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

/// Default freshness window shared by the gas and price caches.
pub const DEFAULT_TTL: Duration = Duration::from_secs(10);

/// A cached value together with the wall-clock time it was written.
///
/// `updated_at` is what callers surface to clients; the monotonic instant
/// used for the freshness check is private to the cache.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The cached value.
    pub value: T,
    /// Wall-clock write time, surfaced in API responses.
    pub updated_at: DateTime<Utc>,
    /// Monotonic write time used for expiry checks.
    inserted_at: Instant,
}

/// In-process cache whose entries expire after a fixed TTL.
///
/// Writes from overlapping fetches may race; last-write-wins is acceptable
/// because concurrent writers fetch the same external truth.
pub struct TimedCache<T> {
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
    ttl: Duration,
}

impl<T: Clone> TimedCache<T> {
    /// Create a new cache with the given freshness window.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// The freshness window entries are served within.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Store `value` under `key`, stamping it with the current time.
    ///
    /// Overwrites any prior entry for the key and returns a copy of the
    /// stored entry so callers can echo its timestamp.
    pub fn set(&self, key: &str, value: T) -> CacheEntry<T> {
        let entry = CacheEntry {
            value,
            updated_at: Utc::now(),
            inserted_at: Instant::now(),
        };
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), entry.clone());
        }
        entry
    }

    /// Get the entry for `key` only if it is still within the TTL.
    pub fn get(&self, key: &str) -> Option<CacheEntry<T>> {
        let entries = self.entries.lock().ok()?;
        let entry = entries.get(key)?;
        if entry.inserted_at.elapsed() > self.ttl {
            return None;
        }
        Some(entry.clone())
    }

    /// Get the entry for `key` regardless of freshness.
    ///
    /// Returns `None` only if the key was never set. Used for stale
    /// fallbacks when a fresh fetch fails.
    pub fn peek(&self, key: &str) -> Option<CacheEntry<T>> {
        let entries = self.entries.lock().ok()?;
        entries.get(key).cloned()
    }
}
