//! Boundary to the external `yt-dlp` tool and its companions.
//!
//! Everything the run needs from the outside world funnels through this
//! crate: startup probes for the required executables, flat
//! (non-downloading) playlist resolution, and per-entry audio downloads
//! with their fixed post-processing order.

pub mod client;
pub mod entry;
pub mod error;
pub mod process;
pub mod tools;

use std::path::Path;

use async_trait::async_trait;

pub use client::YtdlpClient;
pub use entry::ResolvedEntry;
pub use error::YtdlpError;
pub use tools::{ToolVersions, check_executables};

/// Resolves a source URL to its flat list of entries without downloading
/// anything.
#[async_trait]
pub trait MediaResolver: Send + Sync {
    async fn resolve_flat(&self, url: &str) -> Result<Vec<ResolvedEntry>, YtdlpError>;
}

/// Downloads one resolved entry into its owning directory.
#[async_trait]
pub trait MediaDownloader: Send + Sync {
    async fn download(&self, id: &str, dir: &Path) -> Result<(), YtdlpError>;
}
