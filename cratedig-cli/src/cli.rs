//! Command-line definition.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use shelf::TrackOrder;

use crate::config;

/// Scan a music library, resolve each directory's source URLs, download
/// the audio, and rewrite its tags.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Settings file to load
    #[arg(short, long, default_value = config::SETTINGS_FILE)]
    pub settings: PathBuf,

    /// Override the worker-pool size from the settings
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Override the track-number order from the settings
    #[arg(long, value_enum)]
    pub order: Option<OrderArg>,

    /// Resolve and list the download jobs without downloading or tagging
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Track-number ordering flag.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OrderArg {
    /// Track 1 is the most recent recording
    Descending,
    /// Track 1 is the oldest recording
    Ascending,
}

impl From<OrderArg> for TrackOrder {
    fn from(value: OrderArg) -> Self {
        match value {
            OrderArg::Descending => TrackOrder::Descending,
            OrderArg::Ascending => TrackOrder::Ascending,
        }
    }
}
