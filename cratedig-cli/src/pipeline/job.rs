//! The unit of work flowing from resolution into the download pool.

use std::path::PathBuf;

use ytdlp_client::ResolvedEntry;

/// One resolved, not-yet-downloaded item, stamped with the directory that
/// claimed it. The download lands in `directory` no matter which playlist
/// or single URL produced the entry.
#[derive(Debug, Clone)]
pub struct DownloadJob {
    pub entry: ResolvedEntry,
    pub directory: PathBuf,
}
