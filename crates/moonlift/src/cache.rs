// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Content-addressed caching of translated modules.
//!
//! The directory driver routes every input through a
//! [`TranslationCache`]: inputs with identical content (vendored copies
//! of the same library are common in Lua trees) are translated once. Keys
//! are SHA-256 digests of the source text, so the cache is safe across
//! unrelated files and never serves stale output.
//!
//! The cache is an in-memory LRU behind `Arc<Mutex<...>>`; clones share
//! the same store, which is what a per-file worker fan-out wants.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use lru::LruCache;
use sha2::{Digest, Sha256};

use crate::error::Warning;

/// One finished translation.
#[derive(Debug, Clone)]
pub struct Translated {
    /// The emitted target source.
    pub source: String,
    /// Recoverable warnings collected while translating.
    pub warnings: Vec<Warning>,
}

/// Computes the cache key for a source text.
pub fn content_key(source: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// A bounded, shared cache of translation results.
#[derive(Debug, Clone)]
pub struct TranslationCache {
    inner: Arc<Mutex<LruCache<String, Arc<Translated>>>>,
}

impl TranslationCache {
    /// Creates a cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).expect("capacity >= 1");
        TranslationCache {
            inner: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    /// Looks up a previously cached translation.
    pub fn get(&self, key: &str) -> Option<Arc<Translated>> {
        self.inner.lock().ok()?.get(key).cloned()
    }

    /// Stores a translation under its content key.
    pub fn insert(&self, key: String, translated: Translated) -> Arc<Translated> {
        let shared = Arc::new(translated);
        if let Ok(mut cache) = self.inner.lock() {
            cache.put(key, Arc::clone(&shared));
        }
        shared
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.inner.lock().map(|c| c.len()).unwrap_or(0)
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached entry.
    pub fn clear(&self) {
        if let Ok(mut cache) = self.inner.lock() {
            cache.clear();
        }
    }
}
