//! Startup probes for the required external executables.
//!
//! Downloads lean on `ffmpeg` (metadata embedding) and `AtomicParsley`
//! (thumbnail embedding into mp4), so all three tools must be present
//! before any directory work begins.

use tracing::debug;

use crate::error::YtdlpError;
use crate::process;

/// First version line reported by each required executable.
#[derive(Debug, Clone)]
pub struct ToolVersions {
    pub ytdlp: String,
    pub ffmpeg: String,
    pub atomicparsley: String,
}

/// Probe every required executable on the PATH. Any missing tool is fatal.
pub fn check_executables() -> Result<ToolVersions, YtdlpError> {
    Ok(ToolVersions {
        ytdlp: probe("yt-dlp", "--version")?,
        // ffmpeg takes a single dash
        ffmpeg: probe("ffmpeg", "-version")?,
        atomicparsley: probe("AtomicParsley", "--version")?,
    })
}

/// First stdout line of `name flag`, or `ToolMissing` when the executable
/// cannot be run at all. A nonzero exit still counts as present.
fn probe(name: &str, flag: &str) -> Result<String, YtdlpError> {
    let output = process::std_command(name)
        .arg(flag)
        .output()
        .map_err(|_| YtdlpError::tool_missing(name))?;
    let version = String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();
    debug!("found {name} ({version})");
    Ok(version)
}
