//! Flat-resolution records parsed from the resolver's JSON output.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::YtdlpError;

/// One entry of a flat (non-downloading) resolution.
#[derive(Debug, Clone)]
pub struct ResolvedEntry {
    /// Stable source identifier, later handed to the downloader.
    pub id: String,
    /// Human-readable title when the source provides one.
    pub title: Option<String>,
    /// The full record as returned, kept for display and diagnostics.
    pub raw: Map<String, Value>,
}

impl ResolvedEntry {
    fn from_map(map: Map<String, Value>) -> Option<Self> {
        let id = map.get("id")?.as_str()?.to_string();
        let title = map.get("title").and_then(Value::as_str).map(str::to_string);
        Some(Self { id, title, raw: map })
    }

    /// Title when present, id otherwise.
    pub fn display_name(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }
}

/// Parse the stdout of a flat resolution into entries.
///
/// A playlist contributes its `entries` array in order; a single item
/// contributes itself; an empty or `null` result contributes nothing.
/// Unavailable playlist slots (`null`, or records without an id) are
/// dropped rather than failing the whole URL.
pub(crate) fn parse_flat_entries(url: &str, stdout: &str) -> Result<Vec<ResolvedEntry>, YtdlpError> {
    let text = stdout.trim();
    if text.is_empty() || text == "null" {
        return Ok(Vec::new());
    }

    let root: Value =
        serde_json::from_str(text).map_err(|e| YtdlpError::invalid_output(url, e.to_string()))?;
    let Value::Object(root) = root else {
        return Err(YtdlpError::invalid_output(url, "expected a JSON object"));
    };

    match root.get("entries") {
        Some(Value::Array(items)) => {
            let mut entries = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::Object(map) => match ResolvedEntry::from_map(map.clone()) {
                        Some(entry) => entries.push(entry),
                        None => debug!("dropping id-less entry from '{url}'"),
                    },
                    // flat playlists mark unavailable slots with null
                    Value::Null => {}
                    other => debug!("dropping non-object entry from '{url}': {other}"),
                }
            }
            Ok(entries)
        }
        Some(Value::Null) => Ok(Vec::new()),
        Some(_) => Err(YtdlpError::invalid_output(url, "`entries` is not a list")),
        None => Ok(ResolvedEntry::from_map(root).into_iter().collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(stdout: &str) -> Result<Vec<ResolvedEntry>, YtdlpError> {
        parse_flat_entries("https://example.test/playlist", stdout)
    }

    #[test]
    fn playlist_entries_come_back_in_order() {
        let entries = parse(
            r#"{"id": "pl", "entries": [
                {"id": "a", "title": "First"},
                {"id": "b", "title": "Second"},
                {"id": "c"}
            ]}"#,
        )
        .unwrap();
        let ids: Vec<_> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(entries[0].title.as_deref(), Some("First"));
        assert_eq!(entries[2].title, None);
    }

    #[test]
    fn single_item_without_entries_is_one_entry() {
        let entries = parse(r#"{"id": "solo", "title": "One-off"}"#).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "solo");
    }

    #[test]
    fn null_slots_and_idless_records_are_dropped() {
        let entries = parse(
            r#"{"entries": [null, {"id": "a"}, {"title": "no id"}, null]}"#,
        )
        .unwrap();
        let ids: Vec<_> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["a"]);
    }

    #[test]
    fn empty_or_null_output_yields_nothing() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("  \n").unwrap().is_empty());
        assert!(parse("null").unwrap().is_empty());
        assert!(parse(r#"{"id": "pl", "entries": null}"#).unwrap().is_empty());
    }

    #[test]
    fn root_without_an_id_yields_nothing() {
        assert!(parse(r#"{"title": "who knows"}"#).unwrap().is_empty());
    }

    #[test]
    fn malformed_json_is_invalid_output() {
        let err = parse("{not json").unwrap_err();
        assert!(matches!(err, YtdlpError::InvalidOutput { .. }));
    }

    #[test]
    fn non_object_root_is_invalid_output() {
        let err = parse("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, YtdlpError::InvalidOutput { .. }));
    }

    #[test]
    fn non_list_entries_is_invalid_output() {
        let err = parse(r#"{"entries": "nope"}"#).unwrap_err();
        assert!(matches!(err, YtdlpError::InvalidOutput { .. }));
    }

    #[test]
    fn display_name_falls_back_to_id() {
        let entries = parse(r#"{"entries": [{"id": "a", "title": "A!"}, {"id": "b"}]}"#).unwrap();
        assert_eq!(entries[0].display_name(), "A!");
        assert_eq!(entries[1].display_name(), "b");
    }
}
