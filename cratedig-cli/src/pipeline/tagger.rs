//! The tagging pass that closes a run.

use std::path::Path;
use std::sync::Arc;

use futures::future::join_all;
use shelf::{TagError, TrackOrder};
use tracing::{debug, warn};

use super::resolver::DirectoryReport;

/// Rewrites one directory's audio tags.
///
/// The pipeline only calls this after the download pool has drained, so
/// an implementation sees the directory's final file set.
pub trait DirectoryTagger: Send + Sync {
    fn tag(
        &self,
        dir: &Path,
        artist: &str,
        album: &str,
        order: TrackOrder,
    ) -> Result<usize, TagError>;
}

/// Production tagger backed by the files' embedded metadata.
pub struct ShelfTagger;

impl DirectoryTagger for ShelfTagger {
    fn tag(
        &self,
        dir: &Path,
        artist: &str,
        album: &str,
        order: TrackOrder,
    ) -> Result<usize, TagError> {
        shelf::tag_directory(dir, artist, album, order)
    }
}

/// Tagging counts for the run summary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TagTotals {
    pub files: usize,
    pub failures: usize,
}

/// Tag every directory that had a manifest, in parallel.
///
/// One directory's failure never blocks the others; returns only once
/// every tagging task has settled.
pub async fn tag_directories(
    reports: &[DirectoryReport],
    tagger: Arc<dyn DirectoryTagger>,
    order: TrackOrder,
) -> TagTotals {
    let mut handles = Vec::new();
    for report in reports {
        let Some(manifest) = report.manifest() else {
            continue;
        };
        let dir = report.dir.clone();
        let artist = manifest.artist.clone();
        let album = manifest.album.clone();
        let tagger = tagger.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            tagger
                .tag(&dir, &artist, &album, order)
                .map(|count| (dir, count))
        }));
    }

    let mut totals = TagTotals::default();
    for settled in join_all(handles).await {
        match settled {
            Ok(Ok((dir, count))) => {
                if count > 0 {
                    debug!("tagged {count} files in '{}'", dir.display());
                }
                totals.files += count;
            }
            Ok(Err(e)) => {
                warn!("tagging failed: {e}");
                totals.failures += 1;
            }
            Err(e) => {
                warn!("tagging task failed to settle: {e}");
                totals.failures += 1;
            }
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::super::resolver::ManifestStatus;
    use super::*;
    use parking_lot::Mutex;
    use shelf::DirectoryManifest;
    use std::io;
    use std::path::PathBuf;

    fn manifest(artist: &str, album: &str) -> DirectoryManifest {
        DirectoryManifest {
            artist: artist.to_string(),
            album: album.to_string(),
            url_list: Vec::new(),
        }
    }

    fn report(dir: &str, status: ManifestStatus) -> DirectoryReport {
        DirectoryReport {
            dir: PathBuf::from(dir),
            status,
            entries: 0,
            failed_urls: 0,
        }
    }

    #[derive(Default)]
    struct RecordingTagger {
        calls: Mutex<Vec<(PathBuf, String, String)>>,
    }

    impl DirectoryTagger for RecordingTagger {
        fn tag(
            &self,
            dir: &Path,
            artist: &str,
            album: &str,
            _order: TrackOrder,
        ) -> Result<usize, TagError> {
            self.calls
                .lock()
                .push((dir.to_path_buf(), artist.to_string(), album.to_string()));
            Ok(2)
        }
    }

    /// Fails for any directory named `bad`, succeeds elsewhere.
    struct SelectiveTagger;

    impl DirectoryTagger for SelectiveTagger {
        fn tag(
            &self,
            dir: &Path,
            _artist: &str,
            _album: &str,
            _order: TrackOrder,
        ) -> Result<usize, TagError> {
            if dir.ends_with("bad") {
                Err(TagError::List {
                    dir: dir.to_path_buf(),
                    source: io::Error::other("boom"),
                })
            } else {
                Ok(1)
            }
        }
    }

    #[tokio::test]
    async fn only_directories_with_a_manifest_are_tagged() {
        let reports = vec![
            report("/lib/a", ManifestStatus::Loaded(manifest("X", "Y"))),
            report("/lib", ManifestStatus::Missing),
            report(
                "/lib/c",
                ManifestStatus::Degraded(DirectoryManifest::degraded()),
            ),
        ];
        let tagger = Arc::new(RecordingTagger::default());

        let totals = tag_directories(&reports, tagger.clone(), TrackOrder::Descending).await;

        assert_eq!(
            totals,
            TagTotals {
                files: 4,
                failures: 0
            }
        );
        let mut calls = tagger.calls.lock().clone();
        calls.sort();
        assert_eq!(
            calls,
            [
                (PathBuf::from("/lib/a"), "X".to_string(), "Y".to_string()),
                (
                    PathBuf::from("/lib/c"),
                    "unknown".to_string(),
                    "unknown".to_string()
                ),
            ]
        );
    }

    #[tokio::test]
    async fn one_directorys_failure_never_blocks_the_rest() {
        let reports = vec![
            report("/lib/a", ManifestStatus::Loaded(manifest("X", "Y"))),
            report("/lib/bad", ManifestStatus::Loaded(manifest("X", "Y"))),
            report("/lib/c", ManifestStatus::Loaded(manifest("X", "Y"))),
        ];

        let totals =
            tag_directories(&reports, Arc::new(SelectiveTagger), TrackOrder::Descending).await;

        assert_eq!(
            totals,
            TagTotals {
                files: 2,
                failures: 1
            }
        );
    }
}
