//! Site manifest: the materialized list of pages a build knows about.
//!
//! A manifest groups records the way static site generators do: structured
//! documents (collections), standalone pages, and blog posts.
//!
//! ```json
//! {
//!   "documents": [{"url": "/projects/crumb/"}],
//!   "pages": [{"url": "/", "title": "Home"}, {"url": "/ru/", "title": "Главная"}],
//!   "posts": [{"url": "/ru/2024/hello.html"}]
//! }
//! ```

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::page::PageRecord;

/// Error returned when a manifest cannot be read.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// A record is unusable.
    #[error("Invalid manifest: {0}")]
    Validation(String),
}

/// Manifest file syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    /// JSON.
    Json,
    /// YAML.
    Yaml,
}

impl ManifestFormat {
    /// Pick the format from a file extension (`.yml`/`.yaml` is YAML, anything else JSON).
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yml" | "yaml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

/// Every page-like record of a site.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteManifest {
    /// Collection documents.
    pub documents: Vec<PageRecord>,
    /// Standalone pages.
    pub pages: Vec<PageRecord>,
    /// Blog posts.
    pub posts: Vec<PageRecord>,
}

impl SiteManifest {
    /// Parse and validate a manifest.
    ///
    /// # Errors
    ///
    /// Returns a parse error, or `ManifestError::Validation` when a record has
    /// an empty URL or one that does not start with `/`.
    pub fn from_str_with_format(
        content: &str,
        format: ManifestFormat,
    ) -> Result<Self, ManifestError> {
        let manifest: Self = match format {
            ManifestFormat::Json => serde_json::from_str(content)?,
            ManifestFormat::Yaml if content.trim().is_empty() => Self::default(),
            ManifestFormat::Yaml => serde_yaml::from_str(content)?,
        };
        manifest.validate()?;
        Ok(manifest)
    }

    /// Total number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len() + self.pages.len() + self.posts.len()
    }

    /// True if the manifest has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All records in registration order: documents, then pages, then posts.
    ///
    /// The order decides which record wins when two URLs normalize to the
    /// same address.
    #[must_use]
    pub fn into_records(self) -> Vec<Arc<PageRecord>> {
        self.documents
            .into_iter()
            .chain(self.pages)
            .chain(self.posts)
            .map(Arc::new)
            .collect()
    }

    fn validate(&self) -> Result<(), ManifestError> {
        let groups = [
            ("documents", &self.documents),
            ("pages", &self.pages),
            ("posts", &self.posts),
        ];
        for (group, records) in groups {
            for (index, record) in records.iter().enumerate() {
                if !record.url.starts_with('/') {
                    return Err(ManifestError::Validation(format!(
                        "{group}[{index}] url must start with '/' (got {:?})",
                        record.url
                    )));
                }
            }
        }
        Ok(())
    }
}
