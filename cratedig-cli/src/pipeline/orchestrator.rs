//! Phase sequencing for a full run.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use shelf::TrackOrder;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use ytdlp_client::{MediaDownloader, MediaResolver};

use crate::error::Result;

use super::aggregator::WorkAggregator;
use super::executor::{DownloadTotals, run_downloads};
use super::job::DownloadJob;
use super::resolver::{ManifestStatus, resolve_directory};
use super::tagger::{DirectoryTagger, TagTotals, tag_directories};

/// Drives one run end to end.
///
/// Phases are strictly ordered: every directory resolves before the queue
/// is taken, the queue drains before any tagging starts, and every
/// tagging task settles before the summary is built.
pub struct Pipeline {
    resolver: Arc<dyn MediaResolver>,
    downloader: Arc<dyn MediaDownloader>,
    tagger: Arc<dyn DirectoryTagger>,
    max_workers: usize,
    order: TrackOrder,
}

impl Pipeline {
    pub fn new(
        resolver: Arc<dyn MediaResolver>,
        downloader: Arc<dyn MediaDownloader>,
        tagger: Arc<dyn DirectoryTagger>,
        max_workers: usize,
        order: TrackOrder,
    ) -> Self {
        Self {
            resolver,
            downloader,
            tagger,
            max_workers,
            order,
        }
    }

    pub async fn run(&self, root: &Path, dry_run: bool) -> Result<RunSummary> {
        let started = Instant::now();

        let dirs = shelf::scan_directories(root)?;
        info!("found {} directories under '{}'", dirs.len(), root.display());

        let aggregator = Arc::new(WorkAggregator::new());
        let mut resolution = JoinSet::new();
        for dir in &dirs {
            let resolver = self.resolver.clone();
            let aggregator = aggregator.clone();
            let dir = dir.clone();
            resolution
                .spawn(async move { resolve_directory(dir, resolver.as_ref(), &aggregator).await });
        }

        let mut reports = Vec::with_capacity(dirs.len());
        while let Some(settled) = resolution.join_next().await {
            match settled {
                Ok(report) => reports.push(report),
                Err(e) => warn!("resolution task failed to settle: {e}"),
            }
        }
        // every resolution task has settled, so the queue is complete
        let jobs = aggregator.drain();

        for report in &reports {
            if report.entries > 0 {
                debug!(
                    "'{}' contributed {} jobs",
                    report.dir.display(),
                    report.entries
                );
            }
        }
        info!("queued {} download jobs", jobs.len());
        let queued = jobs.len();

        let downloads = if dry_run {
            print_job_list(&jobs);
            DownloadTotals::default()
        } else if jobs.is_empty() {
            DownloadTotals::default()
        } else {
            let bar = download_bar(queued as u64);
            let totals =
                run_downloads(jobs, self.downloader.clone(), self.max_workers, &bar).await;
            bar.finish_and_clear();
            info!(
                "downloads finished: {} ok, {} failed",
                totals.completed, totals.failed
            );
            totals
        };

        // downloads have fully settled by here; the tag pass sees the
        // final on-disk file set
        let tags = if dry_run {
            TagTotals::default()
        } else {
            tag_directories(&reports, self.tagger.clone(), self.order).await
        };

        Ok(RunSummary {
            directories: dirs.len(),
            with_manifest: reports.iter().filter(|r| r.manifest().is_some()).count(),
            degraded: reports
                .iter()
                .filter(|r| matches!(r.status, ManifestStatus::Degraded(_)))
                .count(),
            without_manifest: reports
                .iter()
                .filter(|r| matches!(r.status, ManifestStatus::Missing))
                .count(),
            urls_failed: reports.iter().map(|r| r.failed_urls).sum(),
            jobs: queued,
            downloads,
            tags,
            elapsed_secs: started.elapsed().as_secs_f64(),
        })
    }
}

fn download_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::with_template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .expect("progress template is valid")
            .progress_chars("━━╌"),
    );
    bar
}

fn print_job_list(jobs: &[DownloadJob]) {
    if jobs.is_empty() {
        println!("Nothing to download.");
        return;
    }
    let line = "─".repeat(60);
    println!("\n{line}");
    println!("Jobs that would be downloaded:");
    println!("{line}");
    for job in jobs {
        println!(
            "  {}  ({})",
            job.entry.display_name(),
            job.directory.display()
        );
    }
    println!("{line}");
    println!("  {} job(s)", jobs.len());
}

/// End-of-run accounting, printed even when parts of the run failed.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub directories: usize,
    pub with_manifest: usize,
    pub degraded: usize,
    pub without_manifest: usize,
    pub urls_failed: usize,
    pub jobs: usize,
    pub downloads: DownloadTotals,
    pub tags: TagTotals,
    pub elapsed_secs: f64,
}

impl RunSummary {
    pub fn print(&self) {
        let line = "─".repeat(60);
        println!("\n{line}");
        println!("Run summary");
        println!("{line}");
        println!("  Directories scanned:  {}", self.directories);
        println!(
            "  With manifest:        {} ({} degraded)",
            self.with_manifest, self.degraded
        );
        println!("  Without manifest:     {}", self.without_manifest);
        if self.urls_failed > 0 {
            println!("  URLs failed:          {}", self.urls_failed);
        }
        println!("  Jobs queued:          {}", self.jobs);
        println!(
            "  Downloads:            {} ok, {} failed",
            self.downloads.completed, self.downloads.failed
        );
        println!("  Files tagged:         {}", self.tags.files);
        if self.tags.failures > 0 {
            println!("  Tagging failures:     {}", self.tags.failures);
        }
        println!("  Elapsed time:         {:.3} seconds", self.elapsed_secs);
        println!("{line}");
    }
}
