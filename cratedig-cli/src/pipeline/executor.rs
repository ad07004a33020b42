//! Bounded-concurrency execution of the download queue.

use std::sync::Arc;

use indicatif::ProgressBar;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::warn;
use ytdlp_client::MediaDownloader;

use super::job::DownloadJob;

/// Download counts for the run summary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DownloadTotals {
    pub completed: usize,
    pub failed: usize,
}

/// Drain `jobs` through a pool of at most `max_workers` concurrent
/// downloads.
///
/// One job's failure never cancels its siblings; the pool returns only
/// once every job has settled. The bar ticks once per settled job either
/// way.
pub async fn run_downloads(
    jobs: Vec<DownloadJob>,
    downloader: Arc<dyn MediaDownloader>,
    max_workers: usize,
    bar: &ProgressBar,
) -> DownloadTotals {
    // Semaphore::new panics above MAX_PERMITS
    let semaphore = Arc::new(Semaphore::new(max_workers.clamp(1, Semaphore::MAX_PERMITS)));
    let mut pool = JoinSet::new();

    for job in jobs {
        let semaphore = semaphore.clone();
        let downloader = downloader.clone();
        let bar = bar.clone();
        pool.spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                // the pool never closes its own semaphore
                Err(_) => return false,
            };
            let ok = match downloader.download(&job.entry.id, &job.directory).await {
                Ok(()) => true,
                Err(e) => {
                    warn!("download of '{}' failed: {e}", job.entry.display_name());
                    false
                }
            };
            bar.inc(1);
            ok
        });
    }

    let mut totals = DownloadTotals::default();
    while let Some(settled) = pool.join_next().await {
        match settled {
            Ok(true) => totals.completed += 1,
            Ok(false) => totals.failed += 1,
            Err(e) => {
                warn!("download task failed to settle: {e}");
                totals.failed += 1;
            }
        }
    }
    totals
}
