//! Address cache mapping normalized URL paths to pages.
//!
//! The cache is rebuilt from scratch for every site build: [`populate`]
//! clears it and registers every page in the order supplied. It is never
//! updated incrementally, and after population it is only read.
//!
//! Two pages whose URLs normalize to the same [`PathKey`] (e.g. `/blog` and
//! `/blog/`) collide. The later registration wins; each overwrite is recorded
//! as a [`PathCollision`] so the caller can surface it.
//!
//! [`populate`]: AddressCache::populate

use std::collections::HashMap;
use std::sync::Arc;

use crate::page::PageRecord;
use crate::path_key::{PathKey, normalize};

/// A page registered at a cache key.
#[derive(Clone, Debug, PartialEq)]
pub struct CacheEntry {
    /// The registered page.
    pub page: Arc<PageRecord>,
}

/// Two registrations that normalized to the same key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathCollision {
    /// Shared normalized key.
    pub key: PathKey,
    /// URL of the page that was replaced.
    pub replaced_url: String,
    /// URL of the page that now occupies the key.
    pub url: String,
}

/// Mapping from normalized URL path to page.
#[derive(Debug, Default)]
pub struct AddressCache {
    entries: HashMap<PathKey, CacheEntry>,
    collisions: Vec<PathCollision>,
}

impl AddressCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cache from records in one step.
    #[must_use]
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Arc<PageRecord>>,
    {
        let mut cache = Self::new();
        cache.populate(records);
        cache
    }

    /// Remove every entry and forget recorded collisions.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.collisions.clear();
    }

    /// Register `page` at the normalized form of `url`.
    ///
    /// Overwrites any page already registered at that key.
    pub fn add(&mut self, url: &str, page: Arc<PageRecord>) {
        let key = normalize(url);
        let incoming_url = page.url.clone();
        if let Some(previous) = self.entries.insert(key.clone(), CacheEntry { page }) {
            tracing::debug!(
                key = %key,
                replaced = %previous.page.url,
                url = %incoming_url,
                "Address cache key overwritten"
            );
            self.collisions.push(PathCollision {
                key,
                replaced_url: previous.page.url.clone(),
                url: incoming_url,
            });
        }
    }

    /// Look up the page registered at the normalized form of `path`.
    ///
    /// Returns `None` when no page lives at that path, which is the common
    /// case for intermediate path prefixes.
    #[must_use]
    pub fn find(&self, path: &str) -> Option<&CacheEntry> {
        self.entries.get(&normalize(path))
    }

    /// Clear the cache, then register every record under its own URL.
    ///
    /// Records are added in iteration order, which decides the survivor of a
    /// key collision.
    pub fn populate<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = Arc<PageRecord>>,
    {
        self.clear();
        for page in records {
            let url = page.url.clone();
            self.add(&url, page);
        }

        if !self.collisions.is_empty() {
            tracing::warn!(
                collisions = self.collisions.len(),
                "Multiple pages share a normalized URL; the last one registered wins"
            );
        }
        tracing::debug!(entries = self.entries.len(), "Address cache populated");
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no page is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overwrites observed since the last [`clear`](Self::clear).
    #[must_use]
    pub fn collisions(&self) -> &[PathCollision] {
        &self.collisions
    }
}
