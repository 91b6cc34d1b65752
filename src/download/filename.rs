//! Local file names for downloaded assets

use crate::api::ImageRecord;

/// Used when neither the record name nor the URL yields anything usable
const FALLBACK_NAME: &str = "download.bin";

/// Picks the file name an asset is written under
///
/// The record name is used when it survives sanitization; otherwise the
/// last path segment of the asset URL, then a fixed fallback.
pub fn file_name_for(record: &ImageRecord) -> String {
    let from_name = sanitize_file_name(&record.name);
    if is_usable(&from_name) {
        return from_name;
    }

    let from_url = record
        .asset_url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .map(sanitize_file_name)
        .unwrap_or_default();
    if is_usable(&from_url) {
        return from_url;
    }

    FALLBACK_NAME.to_string()
}

/// Replaces path separators and characters rejected by common filesystems
pub fn sanitize_file_name(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|ch| match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

fn is_usable(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.chars().all(|c| c == '_')
}
