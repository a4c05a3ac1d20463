//! Configuration management for crumb.
//!
//! Parses `crumb.toml` configuration files with serde, and also accepts a
//! Jekyll-style `_config.yml` so an existing site configuration can be read
//! as-is. Config files are auto-discovered in the current directory and its
//! parents.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Recognized settings
//!
//! ```toml
//! [site]
//! baseurl = "/blog"
//!
//! [breadcrumbs]
//! locale_roots = ["/ru", "/tt"]
//!
//! [breadcrumbs.root]
//! hide = false
//! image = true
//! ```
//!
//! Jekyll configs keep `baseurl` at the top level; that spelling is accepted
//! too, with `site.baseurl` taking precedence when both are present.
//!
//! ## Environment Variable Expansion
//!
//! `site.baseurl` supports `${VAR}` and `${VAR:-default}` expansion.

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override site base address.
    pub base_url: Option<String>,
    /// Override root hide flag.
    pub root_hide: Option<bool>,
    /// Override root image flag.
    pub root_image: Option<bool>,
    /// Replace the locale root list.
    pub locale_roots: Option<Vec<String>>,
}

/// Configuration filenames to search for, in priority order.
const CONFIG_FILENAMES: &[&str] = &["crumb.toml", "_config.yml", "_config.yaml"];

/// Base address used when none is configured.
const DEFAULT_BASE_URL: &str = "/";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site section as parsed (`[site]`).
    site: SiteConfigRaw,
    /// Top-level `baseurl` as written in Jekyll configs.
    baseurl: Option<String>,
    /// Breadcrumbs section as parsed (`[breadcrumbs]`).
    breadcrumbs: Option<BreadcrumbsConfigRaw>,

    /// Resolved site configuration (set after loading).
    #[serde(skip)]
    pub site_resolved: SiteConfig,
    /// Resolved breadcrumbs configuration (set after loading).
    #[serde(skip)]
    pub breadcrumbs_resolved: BreadcrumbsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Raw site configuration as parsed from the config file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SiteConfigRaw {
    baseurl: Option<String>,
}

/// Resolved site configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    /// Site base address (`"/"` when unset or empty).
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }
}

/// Raw breadcrumbs configuration as parsed from the config file.
///
/// Every field is optional so that explicit nulls in YAML fall back to
/// defaults instead of failing the parse.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct BreadcrumbsConfigRaw {
    root: Option<RootConfigRaw>,
    locale_roots: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RootConfigRaw {
    hide: Option<bool>,
    image: Option<bool>,
}

/// Resolved breadcrumbs configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreadcrumbsConfig {
    /// Produce an empty trail for the site root page itself.
    pub root_hide: bool,
    /// Presentation hint copied onto every breadcrumb entry.
    pub root_image: bool,
    /// First path segments that denote a localized site root (e.g. `/ru`).
    pub locale_roots: Vec<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.baseurl`").
        field: String,
        /// Error message (e.g., "${`BASEURL`} not set").
        message: String,
    },
}

/// Strip a single trailing slash from a locale root (`/ru/` -> `/ru`).
fn normalize_locale_root(root: &str) -> String {
    root.strip_suffix('/')
        .filter(|stripped| !stripped.is_empty())
        .unwrap_or(root)
        .to_owned()
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `crumb.toml`, `_config.yml` or `_config.yaml`
    /// in the current directory and its parents.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values. The final result is validated.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or a value fails validation.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_config(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a string in the given format.
    ///
    /// Resolves defaults but does not validate.
    ///
    /// # Errors
    ///
    /// Returns a parse error or an environment variable error.
    pub fn from_str_with_format(content: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        let mut config: Self = match format {
            ConfigFormat::Toml => toml::from_str(content)?,
            ConfigFormat::Yaml => {
                // An empty YAML document parses as null rather than an empty map
                if content.trim().is_empty() {
                    Self::default()
                } else {
                    serde_yaml::from_str(content)?
                }
            }
        };
        config.resolve()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(base_url) = &settings.base_url {
            self.site_resolved.base_url = if base_url.is_empty() {
                DEFAULT_BASE_URL.to_owned()
            } else {
                base_url.clone()
            };
        }
        if let Some(root_hide) = settings.root_hide {
            self.breadcrumbs_resolved.root_hide = root_hide;
        }
        if let Some(root_image) = settings.root_image {
            self.breadcrumbs_resolved.root_image = root_image;
        }
        if let Some(locale_roots) = &settings.locale_roots {
            self.breadcrumbs_resolved.locale_roots = locale_roots
                .iter()
                .map(|root| normalize_locale_root(root))
                .collect();
        }
    }

    /// Search for a config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            for name in CONFIG_FILENAMES {
                let candidate = current.join(name);
                if candidate.exists() {
                    return Some(candidate);
                }
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_str_with_format(&content, ConfigFormat::from_path(path))?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate resolved configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_site()?;
        self.validate_breadcrumbs()?;
        Ok(())
    }

    fn validate_site(&self) -> Result<(), ConfigError> {
        if !self.site_resolved.base_url.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "site.baseurl must start with '/' (got {:?})",
                self.site_resolved.base_url
            )));
        }
        Ok(())
    }

    fn validate_breadcrumbs(&self) -> Result<(), ConfigError> {
        for root in &self.breadcrumbs_resolved.locale_roots {
            let is_single_segment = root.len() > 1
                && root.starts_with('/')
                && !root[1..].contains('/');
            if !is_single_segment {
                return Err(ConfigError::Validation(format!(
                    "breadcrumbs.locale_roots entries must be a single path segment like \"/ru\" (got {root:?})"
                )));
            }
        }
        Ok(())
    }

    /// Expand environment variables and fill in resolved sections.
    fn resolve(&mut self) -> Result<(), ConfigError> {
        let base_url = match (self.site.baseurl.as_deref(), self.baseurl.as_deref()) {
            (Some(url), _) => expand::expand_env(url, "site.baseurl")?,
            (None, Some(url)) => expand::expand_env(url, "baseurl")?,
            (None, None) => String::new(),
        };
        self.site_resolved = SiteConfig {
            base_url: if base_url.is_empty() {
                DEFAULT_BASE_URL.to_owned()
            } else {
                base_url
            },
        };

        let raw = self.breadcrumbs.take().unwrap_or_default();
        let root = raw.root.unwrap_or_default();
        self.breadcrumbs_resolved = BreadcrumbsConfig {
            root_hide: root.hide.unwrap_or(false),
            root_image: root.image.unwrap_or(false),
            locale_roots: raw
                .locale_roots
                .iter()
                .flatten()
                .map(|root| normalize_locale_root(root))
                .collect(),
        };

        Ok(())
    }
}

/// Config file syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `crumb.toml`.
    Toml,
    /// Jekyll-style `_config.yml`.
    Yaml,
}

impl ConfigFormat {
    /// Pick the format from a file extension (`.yml`/`.yaml` is YAML, anything else TOML).
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yml" | "yaml") => Self::Yaml,
            _ => Self::Toml,
        }
    }
}
