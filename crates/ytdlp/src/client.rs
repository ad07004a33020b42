//! The `yt-dlp` subprocess client.

use std::path::Path;
use std::process::ExitStatus;

use async_trait::async_trait;
use tracing::debug;

use crate::entry::{ResolvedEntry, parse_flat_entries};
use crate::error::YtdlpError;
use crate::process;
use crate::{MediaDownloader, MediaResolver};

/// Default executable name, resolved on the PATH.
pub const YTDLP_BIN: &str = "yt-dlp";

/// Selector for the best stream that is already `.m4a`; nothing is
/// transcoded.
const AUDIO_FORMAT: &str = "bestaudio[ext=m4a]";

/// Output template, joined onto the owning directory.
const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

/// Per-directory ledger of already-downloaded ids, maintained by yt-dlp
/// itself.
pub const ARCHIVE_FILE: &str = "downloaded.txt";

/// Spawns one `yt-dlp` process per resolution or download.
///
/// The client holds no state beyond the binary name, so a single instance
/// serves any number of concurrent calls.
pub struct YtdlpClient {
    binary: String,
}

impl YtdlpClient {
    pub fn new() -> Self {
        Self::with_binary(YTDLP_BIN)
    }

    /// Use a non-default binary name or path.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn resolve_args(url: &str) -> Vec<String> {
        vec![
            "--flat-playlist".to_string(),
            "--dump-single-json".to_string(),
            "--ignore-errors".to_string(),
            "--no-warnings".to_string(),
            "--quiet".to_string(),
            url.to_string(),
        ]
    }

    fn download_args(id: &str, dir: &Path) -> Vec<String> {
        vec![
            "--format".to_string(),
            AUDIO_FORMAT.to_string(),
            "--output".to_string(),
            dir.join(OUTPUT_TEMPLATE).to_string_lossy().into_owned(),
            "--download-archive".to_string(),
            dir.join(ARCHIVE_FILE).to_string_lossy().into_owned(),
            "--write-thumbnail".to_string(),
            // metadata must embed before the thumbnail (yt-dlp#30101)
            "--embed-metadata".to_string(),
            "--embed-thumbnail".to_string(),
            "--ignore-errors".to_string(),
            "--no-warnings".to_string(),
            "--quiet".to_string(),
            "--".to_string(),
            id.to_string(),
        ]
    }

    async fn run(&self, args: &[String]) -> Result<std::process::Output, YtdlpError> {
        process::tokio_command(&self.binary)
            .args(args)
            .output()
            .await
            .map_err(|source| YtdlpError::spawn(&self.binary, source))
    }
}

impl Default for YtdlpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaResolver for YtdlpClient {
    async fn resolve_flat(&self, url: &str) -> Result<Vec<ResolvedEntry>, YtdlpError> {
        debug!("resolving '{url}'");
        let output = self.run(&Self::resolve_args(url)).await?;
        if !output.status.success() {
            return Err(YtdlpError::resolve(
                url,
                exit_detail(output.status, &output.stderr),
            ));
        }
        parse_flat_entries(url, &String::from_utf8_lossy(&output.stdout))
    }
}

#[async_trait]
impl MediaDownloader for YtdlpClient {
    async fn download(&self, id: &str, dir: &Path) -> Result<(), YtdlpError> {
        debug!("downloading '{id}' into '{}'", dir.display());
        let output = self.run(&Self::download_args(id, dir)).await?;
        if !output.status.success() {
            return Err(YtdlpError::download(
                id,
                exit_detail(output.status, &output.stderr),
            ));
        }
        Ok(())
    }
}

/// Exit code plus the last non-empty stderr line, for diagnostics.
fn exit_detail(status: ExitStatus, stderr: &[u8]) -> String {
    let code = status.code().unwrap_or(-1);
    let stderr = String::from_utf8_lossy(stderr);
    match stderr.lines().rev().find(|line| !line.trim().is_empty()) {
        Some(line) => format!("exit code {code}: {}", line.trim()),
        None => format!("exit code {code}"),
    }
}
