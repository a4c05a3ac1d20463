//! Breadcrumb trail resolution.
//!
//! A trail is built purely from the page URL. The site root is looked up
//! first, then every path prefix of the URL from shallowest to deepest; each
//! prefix with a registered page contributes one entry. Prefixes without a
//! page are skipped, and positions are assigned from the entries actually
//! emitted, so there are never numbering gaps.
//!
//! ```text
//! cache: /  /a  /a/b          url: /a/b/c
//!
//! root    "/"      -> 1
//! prefix  "/a"     -> 2
//! prefix  "/a/b"   -> 3
//! prefix  "/a/b/c" -> (not registered, skipped)
//! ```
//!
//! When the first segment of the URL is a configured locale root (e.g. `/ru`),
//! the site root entry is omitted: the locale root acts as the root of that
//! part of the site.

use std::collections::HashSet;
use std::sync::Arc;

use crumb_config::Config;
use serde::Serialize;

use crate::address_cache::AddressCache;
use crate::page::PageRecord;
use crate::path_key::{ROOT, normalize};

/// Resolved breadcrumb settings for one build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Produce an empty trail for the base address page itself.
    pub root_hide: bool,
    /// Presentation hint copied onto every entry.
    pub root_image: bool,
    /// Site base address (`"/"` by default).
    pub base_address: String,
    /// First path segments that denote a localized site root.
    pub locale_root_prefixes: HashSet<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            root_hide: false,
            root_image: false,
            base_address: ROOT.to_owned(),
            locale_root_prefixes: HashSet::new(),
        }
    }
}

impl ResolverConfig {
    /// Read breadcrumb settings from the loaded site configuration.
    ///
    /// Absent fields were already defaulted by [`Config`]; an empty base
    /// address still falls back to `"/"` here.
    #[must_use]
    pub fn load(config: &Config) -> Self {
        let breadcrumbs = &config.breadcrumbs_resolved;
        let base_address = if config.site_resolved.base_url.is_empty() {
            ROOT.to_owned()
        } else {
            config.site_resolved.base_url.clone()
        };

        Self {
            root_hide: breadcrumbs.root_hide,
            root_image: breadcrumbs.root_image,
            base_address,
            locale_root_prefixes: breadcrumbs.locale_roots.iter().cloned().collect(),
        }
    }

    /// Add a locale root prefix. Trailing slashes are dropped, so `/ru/`
    /// and `/ru` denote the same root.
    #[must_use]
    pub fn with_locale_root(mut self, prefix: impl AsRef<str>) -> Self {
        self.locale_root_prefixes
            .insert(normalize(prefix.as_ref()).as_str().to_owned());
        self
    }

    /// Prefixes may also be set directly on the public field, so they are
    /// normalized again before comparison.
    fn is_locale_root(&self, segment: &str) -> bool {
        self.locale_root_prefixes
            .iter()
            .any(|prefix| normalize(prefix).as_str() == segment)
    }
}

/// One step of a breadcrumb trail.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BreadcrumbEntry {
    /// 1-based rank within the trail.
    pub position: usize,
    /// The ancestor page (shared with the address cache).
    pub page: Arc<PageRecord>,
    /// Presentation hint from `breadcrumbs.root.image`.
    pub root_image: bool,
}

/// Builds breadcrumb trails from an address cache.
///
/// The resolver only reads the cache, so many resolvers may share one cache
/// across threads.
pub struct BreadcrumbResolver<'a> {
    config: &'a ResolverConfig,
    cache: &'a AddressCache,
}

impl<'a> BreadcrumbResolver<'a> {
    /// Create a resolver over a populated cache.
    #[must_use]
    pub fn new(config: &'a ResolverConfig, cache: &'a AddressCache) -> Self {
        Self { config, cache }
    }

    /// Resolve the breadcrumb trail for a page URL.
    ///
    /// Returns an empty trail when `root_hide` is set and the URL is the base
    /// address, or when no prefix of the URL is registered. The page itself
    /// is part of its trail if it is registered.
    #[must_use]
    pub fn resolve(&self, page_url: &str) -> Vec<BreadcrumbEntry> {
        let key = normalize(page_url);

        if self.config.root_hide && key == normalize(&self.config.base_address) {
            return Vec::new();
        }

        let mut trail = Vec::new();

        let under_locale_root = key
            .first_segment()
            .is_some_and(|segment| self.config.is_locale_root(segment));
        if !under_locale_root {
            self.push_if_registered(&mut trail, ROOT);
        }

        for prefix in key.prefixes() {
            self.push_if_registered(&mut trail, prefix);
        }

        trail
    }

    fn push_if_registered(&self, trail: &mut Vec<BreadcrumbEntry>, path: &str) {
        if let Some(entry) = self.cache.find(path) {
            trail.push(BreadcrumbEntry {
                position: trail.len() + 1,
                page: Arc::clone(&entry.page),
                root_image: self.config.root_image,
            });
        }
    }
}
