//! URL path normalization.
//!
//! [`PathKey`] is the canonical form of a URL path used as the address cache
//! key. Trailing slashes are stripped and the empty path becomes the site
//! root `"/"`, so `/guide/` and `/guide` address the same page.

use std::borrow::Borrow;
use std::fmt;

/// Site root key.
pub const ROOT: &str = "/";

/// Normalized URL path.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathKey(String);

/// Normalize a URL path into a [`PathKey`].
///
/// Total over all inputs: `""` and `"/"` both become `"/"`, `"/a/b/"` becomes
/// `"/a/b"`. Normalizing a key again returns it unchanged.
#[must_use]
pub fn normalize(path: &str) -> PathKey {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        PathKey(ROOT.to_owned())
    } else {
        PathKey(trimmed.to_owned())
    }
}

impl PathKey {
    /// Key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for the site root key.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == ROOT
    }

    /// Successive path prefixes, shallowest first.
    ///
    /// Segments are split in front of every `/` except a leading one, so each
    /// segment keeps its leading slash: `/a/b/c` yields `/a`, `/a/b`, `/a/b/c`.
    /// The root key has no segments and yields nothing.
    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        let key = self.segmentable();
        key.char_indices()
            .filter(|&(i, c)| i > 0 && c == '/')
            .map(|(i, _)| i)
            .chain((!key.is_empty()).then_some(key.len()))
            .map(move |end| &key[..end])
    }

    /// First path segment (e.g. `/ru` for `/ru/post`), `None` for the root.
    #[must_use]
    pub fn first_segment(&self) -> Option<&str> {
        self.prefixes().next()
    }

    /// The key with the root collapsed to an empty string, so the root
    /// contributes no segments.
    fn segmentable(&self) -> &str {
        if self.is_root() { "" } else { &self.0 }
    }
}

impl Borrow<str> for PathKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PathKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
