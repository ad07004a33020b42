//! Run settings loaded from `settings.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use shelf::TrackOrder;
use thiserror::Error;

/// Default settings filename, looked up in the working directory.
pub const SETTINGS_FILE: &str = "settings.toml";

/// Default size of the download worker pool.
pub const DEFAULT_MAX_WORKERS: usize = 12;

/// Everything a run needs from the settings file. Only `output_dir` is
/// required; the rest have defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Root of the library tree to scan. May start with `~`.
    pub output_dir: PathBuf,
    /// Download worker pool size.
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
    /// Track-number ordering for the tagging pass.
    #[serde(default)]
    pub track_order: TrackOrder,
}

fn default_max_workers() -> usize {
    DEFAULT_MAX_WORKERS
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read settings '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Fold command-line overrides into the loaded settings.
    pub fn apply_overrides(mut self, jobs: Option<usize>, order: Option<TrackOrder>) -> Self {
        if let Some(jobs) = jobs {
            self.max_workers = jobs;
        }
        if let Some(order) = order {
            self.track_order = order;
        }
        self
    }
}
