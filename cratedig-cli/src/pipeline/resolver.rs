//! Per-directory resolution for the fan-out phase.

use std::path::PathBuf;

use shelf::{DirectoryManifest, ManifestError};
use tracing::{debug, warn};
use ytdlp_client::MediaResolver;

use super::aggregator::WorkAggregator;
use super::job::DownloadJob;

/// How a directory's manifest was obtained, if at all.
#[derive(Debug, Clone)]
pub enum ManifestStatus {
    /// Parsed as written.
    Loaded(DirectoryManifest),
    /// Present but unparseable; replaced with the empty defaults so the
    /// directory still gets tagged.
    Degraded(DirectoryManifest),
    /// No manifest file: the directory holds nothing to process.
    Missing,
}

/// Outcome of one directory's resolution task.
#[derive(Debug, Clone)]
pub struct DirectoryReport {
    pub dir: PathBuf,
    pub status: ManifestStatus,
    /// Jobs this directory contributed to the queue.
    pub entries: usize,
    /// URLs whose resolution failed and was skipped.
    pub failed_urls: usize,
}

impl DirectoryReport {
    /// The manifest to tag this directory with, when it has one.
    pub fn manifest(&self) -> Option<&DirectoryManifest> {
        match &self.status {
            ManifestStatus::Loaded(m) | ManifestStatus::Degraded(m) => Some(m),
            ManifestStatus::Missing => None,
        }
    }
}

/// Load a directory's manifest and resolve its URLs into download jobs.
///
/// Failures stay inside the directory: a missing manifest skips it, a
/// malformed one degrades to the empty defaults, and a URL that fails to
/// resolve contributes zero entries. Resolved jobs are appended to
/// `aggregator` as one batch.
pub async fn resolve_directory(
    dir: PathBuf,
    resolver: &dyn MediaResolver,
    aggregator: &WorkAggregator,
) -> DirectoryReport {
    let (manifest, degraded) = match DirectoryManifest::load(&dir) {
        Ok(manifest) => (manifest, false),
        Err(ManifestError::Missing { .. }) => {
            debug!("no manifest in '{}', skipping", dir.display());
            return DirectoryReport {
                dir,
                status: ManifestStatus::Missing,
                entries: 0,
                failed_urls: 0,
            };
        }
        Err(e @ ManifestError::Malformed { .. }) => {
            warn!("{e}; using the empty defaults");
            (DirectoryManifest::degraded(), true)
        }
    };

    let mut jobs = Vec::new();
    let mut failed_urls = 0;
    for url in &manifest.url_list {
        match resolver.resolve_flat(url).await {
            Ok(entries) => {
                debug!("'{url}' resolved to {} entries", entries.len());
                jobs.extend(entries.into_iter().map(|entry| DownloadJob {
                    entry,
                    directory: dir.clone(),
                }));
            }
            Err(e) => {
                warn!("skipping '{url}': {e}");
                failed_urls += 1;
            }
        }
    }

    let entries = jobs.len();
    aggregator.append(jobs);

    let status = if degraded {
        ManifestStatus::Degraded(manifest)
    } else {
        ManifestStatus::Loaded(manifest)
    };
    DirectoryReport {
        dir,
        status,
        entries,
        failed_urls,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mockall::mock;
    use shelf::manifest::MANIFEST_FILE;
    use std::fs;
    use tempfile::TempDir;
    use ytdlp_client::{ResolvedEntry, YtdlpError};

    mock! {
        Resolver {}

        #[async_trait]
        impl MediaResolver for Resolver {
            async fn resolve_flat(&self, url: &str) -> Result<Vec<ResolvedEntry>, YtdlpError>;
        }
    }

    fn entry(id: &str) -> ResolvedEntry {
        ResolvedEntry {
            id: id.to_string(),
            title: None,
            raw: serde_json::Map::new(),
        }
    }

    #[tokio::test]
    async fn resolves_each_url_and_appends_in_order() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(MANIFEST_FILE),
            "artist = \"Can\"\nalbum = \"Ege Bamyasi\"\nurl_list = [\"u1\", \"u2\"]\n",
        )
        .unwrap();

        let mut resolver = MockResolver::new();
        resolver
            .expect_resolve_flat()
            .withf(|url| url == "u1")
            .times(1)
            .returning(|_| Ok(vec![entry("a"), entry("b")]));
        resolver
            .expect_resolve_flat()
            .withf(|url| url == "u2")
            .times(1)
            .returning(|_| Ok(vec![entry("c")]));

        let aggregator = WorkAggregator::new();
        let report = resolve_directory(tmp.path().to_path_buf(), &resolver, &aggregator).await;

        assert_eq!(report.entries, 3);
        assert_eq!(report.failed_urls, 0);
        assert_eq!(report.manifest().unwrap().artist, "Can");
        assert!(matches!(report.status, ManifestStatus::Loaded(_)));

        let ids: Vec<_> = aggregator
            .drain()
            .into_iter()
            .map(|j| j.entry.id)
            .collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn missing_manifest_skips_the_directory() {
        let tmp = TempDir::new().unwrap();
        // no expectations: any resolver call would panic
        let resolver = MockResolver::new();

        let aggregator = WorkAggregator::new();
        let report = resolve_directory(tmp.path().to_path_buf(), &resolver, &aggregator).await;

        assert!(matches!(report.status, ManifestStatus::Missing));
        assert_eq!(report.entries, 0);
        assert!(aggregator.drain().is_empty());
    }

    #[tokio::test]
    async fn malformed_manifest_degrades_to_the_empty_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(MANIFEST_FILE), "not toml [[[").unwrap();
        let resolver = MockResolver::new();

        let aggregator = WorkAggregator::new();
        let report = resolve_directory(tmp.path().to_path_buf(), &resolver, &aggregator).await;

        assert!(matches!(report.status, ManifestStatus::Degraded(_)));
        let manifest = report.manifest().unwrap();
        assert_eq!(manifest.artist, "unknown");
        assert_eq!(manifest.album, "unknown");
        assert!(manifest.url_list.is_empty());
        assert!(aggregator.drain().is_empty());
    }

    #[tokio::test]
    async fn a_failed_url_spoils_nothing_else() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(MANIFEST_FILE),
            "url_list = [\"bad\", \"good\"]\n",
        )
        .unwrap();

        let mut resolver = MockResolver::new();
        resolver
            .expect_resolve_flat()
            .withf(|url| url == "bad")
            .times(1)
            .returning(|url| Err(YtdlpError::resolve(url, "exit code 1")));
        resolver
            .expect_resolve_flat()
            .withf(|url| url == "good")
            .times(1)
            .returning(|_| Ok(vec![entry("c")]));

        let aggregator = WorkAggregator::new();
        let report = resolve_directory(tmp.path().to_path_buf(), &resolver, &aggregator).await;

        assert_eq!(report.failed_urls, 1);
        assert_eq!(report.entries, 1);
        let ids: Vec<_> = aggregator
            .drain()
            .into_iter()
            .map(|j| j.entry.id)
            .collect();
        assert_eq!(ids, ["c"]);
    }
}
