//! Page records supplied by the site generator.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A page, document or post known to the site.
///
/// Only [`url`](Self::url) is interpreted by the breadcrumb engine; the title
/// and the open `data` payload are carried through untouched for the
/// renderer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Page URL (e.g. `/`, `/blog/`, `/ru/post.html`).
    pub url: String,
    /// Display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Arbitrary front matter or generator metadata.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub data: Map<String, Value>,
}

impl PageRecord {
    /// Create a record with only a URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            data: Map::new(),
        }
    }

    /// Set the display title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Attach a metadata value.
    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_url_only() {
        let page: PageRecord = serde_json::from_str(r#"{"url": "/about/"}"#).unwrap();
        assert_eq!(page, PageRecord::new("/about/"));
    }

    #[test]
    fn test_deserialize_with_data() {
        let page: PageRecord = serde_json::from_str(
            r#"{"url": "/ru/", "title": "Главная", "data": {"lang": "ru", "nav_order": 1}}"#,
        )
        .unwrap();
        assert_eq!(page.title.as_deref(), Some("Главная"));
        assert_eq!(page.data["lang"], "ru");
        assert_eq!(page.data["nav_order"], 1);
    }

    #[test]
    fn test_serialize_skips_empty_fields() {
        let json = serde_json::to_string(&PageRecord::new("/")).unwrap();
        assert_eq!(json, r#"{"url":"/"}"#);
    }

    #[test]
    fn test_builder() {
        let page = PageRecord::new("/blog/")
            .with_title("Blog")
            .with_data("layout", "list");
        assert_eq!(page.title.as_deref(), Some("Blog"));
        assert_eq!(page.data["layout"], "list");
    }
}
