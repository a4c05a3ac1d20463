//! Breadcrumb resolution for generated sites.
//!
//! This crate provides:
//! - [`AddressCache`]: normalized URL path to page lookup, rebuilt per build
//! - [`BreadcrumbResolver`]: ancestor trail for a page URL
//! - [`Site`]: build session holding the current cache snapshot
//! - [`SiteManifest`]: the page enumeration a build starts from
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use crumb_site::{AddressCache, BreadcrumbResolver, PageRecord, ResolverConfig};
//!
//! let cache = AddressCache::from_records(
//!     ["/", "/ru/", "/ru/post/"].map(|url| Arc::new(PageRecord::new(url))),
//! );
//! let config = ResolverConfig::default().with_locale_root("/ru");
//!
//! let trail = BreadcrumbResolver::new(&config, &cache).resolve("/ru/post/");
//! let urls: Vec<_> = trail.iter().map(|entry| entry.page.url.as_str()).collect();
//! assert_eq!(urls, ["/ru/", "/ru/post/"]);
//! ```

mod address_cache;
mod manifest;
mod page;
pub mod path_key;
mod resolver;
mod site;

pub use address_cache::{AddressCache, CacheEntry, PathCollision};
pub use manifest::{ManifestError, ManifestFormat, SiteManifest};
pub use page::PageRecord;
pub use path_key::{PathKey, normalize};
pub use resolver::{BreadcrumbEntry, BreadcrumbResolver, ResolverConfig};
pub use site::{PageTrail, Site};
