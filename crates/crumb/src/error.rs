//! CLI error types.

use std::path::PathBuf;

use crumb_config::ConfigError;
use crumb_site::ManifestError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read manifest {}: {source}", path.display())]
    ReadManifest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Manifest(#[from] ManifestError),

    #[error("Failed to serialize breadcrumbs: {0}")]
    Json(#[from] serde_json::Error),
}
