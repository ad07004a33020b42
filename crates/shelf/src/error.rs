//! Error types for scanning, manifests, and tagging.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from directory discovery.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The configured library root does not exist or is not a directory.
    #[error("library root '{}' is not a directory", path.display())]
    NotFound { path: PathBuf },
}

/// Errors from reading a per-directory manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// No manifest file: the directory holds nothing to process.
    #[error("no manifest in '{}'", dir.display())]
    Missing { dir: PathBuf },

    /// The manifest exists but could not be read or parsed.
    #[error("invalid manifest '{}': {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },
}

/// Errors from the per-directory tagging pass.
#[derive(Debug, Error)]
pub enum TagError {
    #[error("failed to list '{}': {source}", dir.display())]
    List {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
