//! Local music-library domain.
//!
//! A library is a directory tree in which any directory may carry an
//! `info.toml` manifest naming the artist, the album, and the source URLs
//! whose items belong there. This crate owns the filesystem side of a run:
//! discovering the directories, reading the manifests, and the
//! post-download tagging pass that rewrites artist/album/track-number on
//! the audio files.

pub mod error;
pub mod manifest;
pub mod scan;
pub mod tag;

pub use error::{ManifestError, ScanError, TagError};
pub use manifest::DirectoryManifest;
pub use scan::scan_directories;
pub use tag::{TrackOrder, tag_directory};
