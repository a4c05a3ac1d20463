//! `crumb resolve` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use crumb_config::{CliSettings, Config};
use crumb_site::{ManifestFormat, PageTrail, PathCollision, ResolverConfig, Site, SiteManifest};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the resolve command.
#[derive(Args)]
pub(crate) struct ResolveArgs {
    /// Path to configuration file (default: auto-discover crumb.toml or _config.yml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Site manifest listing documents, pages and posts (JSON or YAML).
    #[arg(short, long)]
    manifest: PathBuf,

    /// Page URL to resolve (repeatable; default: every page in the manifest).
    #[arg(short, long = "url")]
    urls: Vec<String>,

    /// Site base address (overrides config).
    #[arg(long)]
    base_url: Option<String>,

    /// Hide the site root page's own trail (overrides config; `false` turns it off).
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    root_hide: Option<bool>,

    /// Mark entries with the root image hint (overrides config; `false` turns it off).
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    root_image: Option<bool>,

    /// Locale root prefix such as /ru (repeatable; replaces config list).
    #[arg(long = "locale-root")]
    locale_roots: Vec<String>,

    /// Print a single indented JSON array instead of one object per line.
    #[arg(long)]
    pretty: bool,

    /// Enable verbose output (show build timing logs).
    #[arg(short, long)]
    pub verbose: bool,
}

/// Trails plus the collisions found while building the address cache.
struct Resolution {
    trails: Vec<PageTrail>,
    collisions: Vec<PathCollision>,
}

impl ResolveArgs {
    /// Execute the resolve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or the manifest cannot be loaded.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let resolution = self.run()?;

        for collision in &resolution.collisions {
            output.warning(&format!(
                "Warning: {} and {} both map to {}; using {}",
                collision.replaced_url, collision.url, collision.key, collision.url
            ));
        }

        output.data(&render_trails(&resolution.trails, self.pretty)?);
        output.info(&format!(
            "Resolved {} page(s) from {}",
            resolution.trails.len(),
            self.manifest.display()
        ));
        Ok(())
    }

    /// Load config and manifest, rebuild the address cache, resolve trails.
    fn run(&self) -> Result<Resolution, CliError> {
        let config = Config::load(self.config.as_deref(), Some(&self.cli_settings()))?;
        let manifest = load_manifest(&self.manifest)?;

        let records = manifest.into_records();
        let urls: Vec<String> = if self.urls.is_empty() {
            records.iter().map(|record| record.url.clone()).collect()
        } else {
            self.urls.clone()
        };

        let site = Site::new(ResolverConfig::load(&config));
        let collisions = site.rebuild(records).collisions().to_vec();
        let trails = site.resolve_all(&urls);

        tracing::info!(
            manifest = %self.manifest.display(),
            trails = trails.len(),
            collisions = collisions.len(),
            "Resolved breadcrumb trails"
        );
        Ok(Resolution { trails, collisions })
    }

    /// Build CLI settings from flags; unset flags leave config values alone.
    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            base_url: self.base_url.clone(),
            root_hide: self.root_hide,
            root_image: self.root_image,
            locale_roots: (!self.locale_roots.is_empty()).then(|| self.locale_roots.clone()),
        }
    }
}

/// Read and parse a manifest file, picking the format from its extension.
fn load_manifest(path: &Path) -> Result<SiteManifest, CliError> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::ReadManifest {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(SiteManifest::from_str_with_format(
        &content,
        ManifestFormat::from_path(path),
    )?)
}

/// Serialize trails as JSON lines, or as one pretty-printed array.
fn render_trails(trails: &[PageTrail], pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        return serde_json::to_string_pretty(trails);
    }
    let lines = trails
        .iter()
        .map(serde_json::to_string)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crumb_site::PageRecord;
    use pretty_assertions::assert_eq;

    use super::*;

    fn args(config: Option<PathBuf>, manifest: PathBuf) -> ResolveArgs {
        ResolveArgs {
            config,
            manifest,
            urls: Vec::new(),
            base_url: None,
            root_hide: None,
            root_image: None,
            locale_roots: Vec::new(),
            pretty: false,
            verbose: false,
        }
    }

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn trail_urls(trail: &PageTrail) -> Vec<&str> {
        trail
            .breadcrumbs
            .iter()
            .map(|entry| entry.page.url.as_str())
            .collect()
    }

    #[test]
    fn test_run_resolves_every_manifest_page() {
        let dir = tempfile::tempdir().unwrap();
        let config = write(
            dir.path(),
            "_config.yml",
            "baseurl: \"\"\nbreadcrumbs:\n  root:\n    hide: true\n  locale_roots: [/ru]\n",
        );
        let manifest = write(
            dir.path(),
            "site.json",
            r#"{
                "documents": [{"url": "/projects/crumb/"}],
                "pages": [{"url": "/"}, {"url": "/projects/"}, {"url": "/ru/"}],
                "posts": [{"url": "/ru/2024/hello.html"}]
            }"#,
        );

        let resolution = args(Some(config), manifest).run().unwrap();

        let urls: Vec<_> = resolution.trails.iter().map(|t| t.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "/projects/crumb/",
                "/",
                "/projects/",
                "/ru/",
                "/ru/2024/hello.html"
            ]
        );
        assert_eq!(
            trail_urls(&resolution.trails[0]),
            vec!["/", "/projects/", "/projects/crumb/"]
        );
        assert!(resolution.trails[1].breadcrumbs.is_empty());
        assert_eq!(
            trail_urls(&resolution.trails[4]),
            vec!["/ru/", "/ru/2024/hello.html"]
        );
        assert!(resolution.collisions.is_empty());
    }

    #[test]
    fn test_run_with_explicit_urls_and_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let config = write(dir.path(), "crumb.toml", "");
        let manifest = write(
            dir.path(),
            "site.yml",
            "pages:\n  - url: /\n  - url: /tt/\n  - url: /tt/about/\n",
        );
        let mut resolve_args = args(Some(config), manifest);
        resolve_args.urls = vec!["/tt/about/".to_owned()];
        resolve_args.locale_roots = vec!["/tt".to_owned()];
        resolve_args.root_image = Some(true);

        let resolution = resolve_args.run().unwrap();

        assert_eq!(resolution.trails.len(), 1);
        let trail = &resolution.trails[0];
        assert_eq!(trail_urls(trail), vec!["/tt/", "/tt/about/"]);
        assert!(trail.breadcrumbs.iter().all(|entry| entry.root_image));
    }

    #[test]
    fn test_run_root_hide_false_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = write(
            dir.path(),
            "_config.yml",
            "breadcrumbs:\n  root:\n    hide: true\n    image: true\n",
        );
        let manifest = write(dir.path(), "site.json", r#"{"pages": [{"url": "/"}]}"#);
        let mut resolve_args = args(Some(config), manifest);
        resolve_args.root_hide = Some(false);
        resolve_args.root_image = Some(false);

        let resolution = resolve_args.run().unwrap();

        let trail = &resolution.trails[0];
        assert_eq!(trail_urls(trail), vec!["/"]);
        assert!(!trail.breadcrumbs[0].root_image);
    }

    #[derive(clap::Parser)]
    struct ResolveCli {
        #[command(flatten)]
        args: ResolveArgs,
    }

    #[test]
    fn test_parse_root_flags_with_and_without_value() {
        use clap::Parser;

        let cli = ResolveCli::try_parse_from([
            "crumb",
            "--manifest",
            "site.json",
            "--root-hide",
            "false",
            "--root-image",
        ])
        .unwrap();
        let settings = cli.args.cli_settings();

        assert_eq!(settings.root_hide, Some(false));
        assert_eq!(settings.root_image, Some(true));
    }

    #[test]
    fn test_cli_settings_leave_unset_flags_alone() {
        let settings = args(None, PathBuf::from("site.json")).cli_settings();

        assert_eq!(settings.root_hide, None);
        assert_eq!(settings.root_image, None);
        assert_eq!(settings.locale_roots, None);
    }

    #[test]
    fn test_run_reports_collisions() {
        let dir = tempfile::tempdir().unwrap();
        let config = write(dir.path(), "crumb.toml", "");
        let manifest = write(
            dir.path(),
            "site.json",
            r#"{"documents": [{"url": "/blog"}], "pages": [{"url": "/blog/"}]}"#,
        );

        let resolution = args(Some(config), manifest).run().unwrap();

        assert_eq!(resolution.collisions.len(), 1);
        assert_eq!(resolution.collisions[0].replaced_url, "/blog");
        assert_eq!(resolution.collisions[0].url, "/blog/");
    }

    #[test]
    fn test_run_missing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let config = write(dir.path(), "crumb.toml", "");

        let result = args(Some(config), dir.path().join("missing.json")).run();

        assert!(matches!(result, Err(CliError::ReadManifest { .. })));
    }

    #[test]
    fn test_run_invalid_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let config = write(dir.path(), "crumb.toml", "");
        let manifest = write(dir.path(), "site.json", r#"{"pages": [{"url": "about"}]}"#);

        let result = args(Some(config), manifest).run();

        assert!(matches!(result, Err(CliError::Manifest(_))));
    }

    #[test]
    fn test_render_trails_json_lines() {
        let site = Site::new(ResolverConfig::default());
        site.rebuild([Arc::new(PageRecord::new("/"))]);
        let trails = site.resolve_all(&["/", "/missing"]);

        let rendered = render_trails(&trails, false).unwrap();

        assert_eq!(
            rendered,
            concat!(
                r#"{"url":"/","breadcrumbs":[{"position":1,"page":{"url":"/"},"root_image":false}]}"#,
                "\n",
                r#"{"url":"/missing","breadcrumbs":[{"position":1,"page":{"url":"/"},"root_image":false}]}"#
            )
        );
    }

    #[test]
    fn test_render_trails_pretty_is_array() {
        let site = Site::new(ResolverConfig::default());
        let trails = site.resolve_all(&["/a"]);

        let rendered = render_trails(&trails, true).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(
            parsed,
            serde_json::json!([{"url": "/a", "breadcrumbs": []}])
        );
    }
}
