//! Application-level error type.
//!
//! Only failures that abort the whole run surface here; everything that
//! can be isolated to one directory, URL, or file is handled (and logged)
//! inside the pipeline instead.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("settings error: {0}")]
    Settings(#[from] crate::config::SettingsError),

    #[error("scan error: {0}")]
    Scan(#[from] shelf::ScanError),

    #[error("external tool error: {0}")]
    Tool(#[from] ytdlp_client::YtdlpError),
}
