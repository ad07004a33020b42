//! Tag rewriting for a directory's downloaded audio files.

use std::fs;
use std::path::{Path, PathBuf};

use lofty::config::WriteOptions;
use lofty::error::LoftyError;
use lofty::file::{AudioFile as _, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::{Accessor, ItemKey, Tag};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::TagError;

/// The only extension the tagging pass touches.
const AUDIO_EXT: &str = "m4a";

/// Direction of track numbering relative to each file's recording date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackOrder {
    /// Track 1 is the most recent recording.
    #[default]
    Descending,
    /// Track 1 is the oldest recording.
    Ascending,
}

struct TrackFile {
    path: PathBuf,
    date_key: u64,
}

/// Rewrite tags on every `.m4a` directly inside `dir`.
///
/// Files are ordered by their embedded recording date per `order` and
/// numbered from 1. Artist and album are set to the given names and any
/// existing title is removed. A file that cannot be read or written is
/// skipped with a warning rather than failing the directory. Returns the
/// number of files rewritten.
pub fn tag_directory(
    dir: &Path,
    artist: &str,
    album: &str,
    order: TrackOrder,
) -> Result<usize, TagError> {
    let mut files = list_audio_files(dir)?;
    if files.is_empty() {
        return Ok(0);
    }
    sort_by_date(&mut files, order);
    Ok(tag_files(&files, artist, album))
}

/// Number `files` from 1 in slice order and rewrite each one's tags. A
/// file that cannot be written is skipped with a warning and its slot in
/// the numbering is not reused. Returns the number of files rewritten.
fn tag_files(files: &[TrackFile], artist: &str, album: &str) -> usize {
    let mut tagged = 0;
    for (index, file) in files.iter().enumerate() {
        let number = (index + 1) as u32;
        match write_tags(&file.path, artist, album, number) {
            Ok(()) => {
                debug!("tagged '{}' as track {number}", file.path.display());
                tagged += 1;
            }
            Err(e) => warn!("skipping '{}': {e}", file.path.display()),
        }
    }
    tagged
}

fn list_audio_files(dir: &Path) -> Result<Vec<TrackFile>, TagError> {
    let entries = fs::read_dir(dir).map_err(|source| TagError::List {
        dir: dir.to_path_buf(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("unreadable entry under '{}': {e}", dir.display());
                continue;
            }
        };
        let path = entry.path();
        if path.is_file() && has_audio_ext(&path) {
            paths.push(path);
        }
    }
    // stable base order so equal dates tie-break deterministically
    paths.sort();

    Ok(paths
        .into_iter()
        .map(|path| {
            let date_key = read_date_key(&path);
            TrackFile { path, date_key }
        })
        .collect())
}

fn has_audio_ext(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(AUDIO_EXT))
}

/// The file's embedded recording date as a sortable number, or 0 when the
/// file carries no readable date.
fn read_date_key(path: &Path) -> u64 {
    let tagged = match Probe::open(path).and_then(|probe| probe.read()) {
        Ok(tagged) => tagged,
        Err(e) => {
            debug!("no readable tags in '{}': {e}", path.display());
            return 0;
        }
    };
    let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) else {
        return 0;
    };
    tag.get_string(&ItemKey::RecordingDate)
        .map(date_key)
        .unwrap_or(0)
}

/// Collapse a date string (`20240131`, `2024-01-31`, or a full timestamp)
/// to its digits so dates compare numerically. Values with no digits sort
/// as 0.
fn date_key(date: &str) -> u64 {
    let digits: String = date.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

fn sort_by_date(files: &mut [TrackFile], order: TrackOrder) {
    match order {
        TrackOrder::Descending => files.sort_by(|a, b| b.date_key.cmp(&a.date_key)),
        TrackOrder::Ascending => files.sort_by(|a, b| a.date_key.cmp(&b.date_key)),
    }
}

fn write_tags(path: &Path, artist: &str, album: &str, number: u32) -> Result<(), LoftyError> {
    let mut tagged = Probe::open(path)?.read()?;

    if tagged.primary_tag().is_none() {
        let tag_type = tagged.primary_tag_type();
        tagged.insert_tag(Tag::new(tag_type));
    }
    if let Some(tag) = tagged.primary_tag_mut() {
        tag.set_artist(artist.to_string());
        tag.set_album(album.to_string());
        tag.set_track(number);
        tag.remove_title();
    }

    tagged.save_to_path(path, WriteOptions::default())
}
