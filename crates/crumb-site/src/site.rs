//! Build session tying configuration and the address cache together.
//!
//! # Thread Safety
//!
//! `Site` is designed for concurrent access:
//! - `snapshot()` returns `Arc<AddressCache>` with minimal locking (just Arc clone)
//! - `rebuild()` populates a fresh cache without blocking readers, then swaps
//!   it in; every resolve that starts after `rebuild()` returns sees the new
//!   cache
//! - `resolve_all()` resolves pages in parallel on the rayon thread pool
//!
//! # Example
//!
//! ```
//! use crumb_site::{PageRecord, ResolverConfig, Site, SiteManifest};
//!
//! let site = Site::new(ResolverConfig::default());
//! let manifest = SiteManifest {
//!     pages: vec![PageRecord::new("/"), PageRecord::new("/blog/")],
//!     ..SiteManifest::default()
//! };
//! site.rebuild(manifest.into_records());
//!
//! let trail = site.resolve("/blog/hello.html");
//! assert_eq!(trail.len(), 2);
//! assert_eq!(trail[1].page.url, "/blog/");
//! ```

use std::sync::{Arc, Mutex, RwLock};
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;

use crate::address_cache::AddressCache;
use crate::page::PageRecord;
use crate::resolver::{BreadcrumbEntry, BreadcrumbResolver, ResolverConfig};

/// Breadcrumb trail for one page URL.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PageTrail {
    /// The URL that was resolved.
    pub url: String,
    /// Ordered trail entries.
    pub breadcrumbs: Vec<BreadcrumbEntry>,
}

/// Breadcrumb state for a site across builds.
///
/// Holds the resolver settings for the build and the current address cache
/// snapshot.
pub struct Site {
    config: ResolverConfig,
    /// Mutex for serializing rebuilds.
    rebuild_lock: Mutex<()>,
    /// Current cache snapshot (atomically swappable).
    current_cache: RwLock<Arc<AddressCache>>,
}

impl Site {
    /// Create a site with an empty address cache.
    #[must_use]
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            rebuild_lock: Mutex::new(()),
            current_cache: RwLock::new(Arc::new(AddressCache::new())),
        }
    }

    /// Resolver settings.
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Current address cache snapshot.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn snapshot(&self) -> Arc<AddressCache> {
        Arc::clone(&self.current_cache.read().unwrap())
    }

    /// Start a new build: replace the address cache with one populated from
    /// `records`.
    ///
    /// Returns the new snapshot so the caller can inspect collisions.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    pub fn rebuild<I>(&self, records: I) -> Arc<AddressCache>
    where
        I: IntoIterator<Item = Arc<PageRecord>>,
    {
        let _guard = self.rebuild_lock.lock().unwrap();
        let start = Instant::now();

        let cache = Arc::new(AddressCache::from_records(records));
        *self.current_cache.write().unwrap() = Arc::clone(&cache);

        tracing::info!(
            pages = cache.len(),
            collisions = cache.collisions().len(),
            elapsed_ms = start.elapsed().as_millis(),
            "Address cache rebuilt"
        );
        cache
    }

    /// Drop every registered page.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    pub fn clear(&self) {
        let _guard = self.rebuild_lock.lock().unwrap();
        *self.current_cache.write().unwrap() = Arc::new(AddressCache::new());
    }

    /// Resolve the breadcrumb trail for one page URL.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn resolve(&self, page_url: &str) -> Vec<BreadcrumbEntry> {
        let cache = self.snapshot();
        BreadcrumbResolver::new(&self.config, &cache).resolve(page_url)
    }

    /// Resolve trails for many pages in parallel.
    ///
    /// All pages are resolved against the same cache snapshot. Output order
    /// matches input order.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn resolve_all<S>(&self, urls: &[S]) -> Vec<PageTrail>
    where
        S: AsRef<str> + Sync,
    {
        let cache = self.snapshot();
        let resolver = BreadcrumbResolver::new(&self.config, &cache);

        let trails: Vec<PageTrail> = urls
            .par_iter()
            .map(|url| PageTrail {
                url: url.as_ref().to_owned(),
                breadcrumbs: resolver.resolve(url.as_ref()),
            })
            .collect();

        tracing::debug!(pages = trails.len(), "Resolved breadcrumb trails");
        trails
    }
}
