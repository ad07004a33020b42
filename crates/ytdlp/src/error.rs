//! Error type for the external-tool boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum YtdlpError {
    /// A required executable is not on the PATH.
    #[error("required executable `{name}` was not found on PATH")]
    ToolMissing { name: String },

    #[error("failed to spawn `{name}`: {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("resolving `{url}` failed: {detail}")]
    Resolve { url: String, detail: String },

    #[error("unexpected resolver output for `{url}`: {reason}")]
    InvalidOutput { url: String, reason: String },

    #[error("downloading `{id}` failed: {detail}")]
    Download { id: String, detail: String },
}

impl YtdlpError {
    pub fn tool_missing(name: impl Into<String>) -> Self {
        Self::ToolMissing { name: name.into() }
    }

    pub fn spawn(name: impl Into<String>, source: std::io::Error) -> Self {
        Self::Spawn {
            name: name.into(),
            source,
        }
    }

    pub fn resolve(url: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Resolve {
            url: url.into(),
            detail: detail.into(),
        }
    }

    pub fn invalid_output(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOutput {
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn download(id: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Download {
            id: id.into(),
            detail: detail.into(),
        }
    }
}
