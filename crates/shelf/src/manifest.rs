//! Per-directory manifest: which artist/album a directory represents and
//! which source URLs feed it.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ManifestError;

/// Manifest filename looked up in every scanned directory.
pub const MANIFEST_FILE: &str = "info.toml";

/// Placeholder written into name fields the manifest leaves empty.
const UNKNOWN: &str = "unknown";

/// A directory's manifest after defaulting.
///
/// `artist` and `album` are never empty (`"unknown"` stands in), and an
/// absent or empty `url_list` is an empty vec rather than an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryManifest {
    pub artist: String,
    pub album: String,
    pub url_list: Vec<String>,
}

#[derive(Deserialize)]
struct RawManifest {
    #[serde(default)]
    artist: String,
    #[serde(default)]
    album: String,
    #[serde(default, deserialize_with = "deserialize_url_list")]
    url_list: Vec<String>,
}

/// `url_list` is either a TOML list of strings or, in older manifests, a
/// single comma-separated string.
#[derive(Deserialize)]
#[serde(untagged)]
enum UrlListField {
    One(String),
    Many(Vec<String>),
}

fn deserialize_url_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let field = UrlListField::deserialize(deserializer)?;
    Ok(match field {
        UrlListField::One(joined) => joined
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(String::from)
            .collect(),
        UrlListField::Many(list) => list,
    })
}

impl From<RawManifest> for DirectoryManifest {
    fn from(raw: RawManifest) -> Self {
        Self {
            artist: default_if_empty(raw.artist),
            album: default_if_empty(raw.album),
            url_list: raw.url_list,
        }
    }
}

fn default_if_empty(value: String) -> String {
    if value.is_empty() {
        UNKNOWN.to_string()
    } else {
        value
    }
}

fn parse(text: &str) -> Result<DirectoryManifest, toml::de::Error> {
    let raw: RawManifest = toml::from_str(text)?;
    Ok(raw.into())
}

impl DirectoryManifest {
    /// Read `dir/info.toml`.
    ///
    /// A missing file is `ManifestError::Missing` (the directory holds
    /// nothing to process); an unreadable or unparseable file is
    /// `ManifestError::Malformed`. The caller decides how to degrade.
    pub fn load(dir: &Path) -> Result<Self, ManifestError> {
        let path = dir.join(MANIFEST_FILE);
        if !path.is_file() {
            return Err(ManifestError::Missing {
                dir: dir.to_path_buf(),
            });
        }

        let text = fs::read_to_string(&path).map_err(|e| ManifestError::Malformed {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        parse(&text).map_err(|e| ManifestError::Malformed {
            path,
            reason: e.to_string(),
        })
    }

    /// The fallback for a manifest that exists but cannot be parsed:
    /// unknown names, no URLs.
    pub fn degraded() -> Self {
        Self {
            artist: UNKNOWN.to_string(),
            album: UNKNOWN.to_string(),
            url_list: Vec::new(),
        }
    }
}
