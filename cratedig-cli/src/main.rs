mod cli;
mod config;
mod error;
mod pipeline;

use std::process;
use std::sync::Arc;

use clap::Parser;
use shelf::TrackOrder;
use tracing::{Level, debug, error};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};
use ytdlp_client::{YtdlpClient, check_executables};

use crate::cli::Args;
use crate::config::Settings;
use crate::error::Result;
use crate::pipeline::{Pipeline, ShelfTagger};

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    if let Err(e) = run(args).await {
        error!("Application error: {}", e);
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    // A missing external tool is fatal before any directory work begins.
    let tools = check_executables()?;
    debug!(
        "using yt-dlp {}, ffmpeg '{}', AtomicParsley '{}'",
        tools.ytdlp, tools.ffmpeg, tools.atomicparsley
    );

    let settings =
        Settings::load(&args.settings)?.apply_overrides(args.jobs, args.order.map(TrackOrder::from));

    let client = Arc::new(YtdlpClient::new());
    let pipeline = Pipeline::new(
        client.clone(),
        client,
        Arc::new(ShelfTagger),
        settings.max_workers,
        settings.track_order,
    );
    let summary = pipeline.run(&settings.output_dir, args.dry_run).await?;
    summary.print();
    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_level(verbose))
        .init();
}
