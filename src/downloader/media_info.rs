//! Media info extraction from yt-dlp JSON output.
//!
//! The engine's `-J` output is deserialized once at this boundary into
//! strict structs with explicit optional fields; nothing downstream
//! touches raw JSON records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// One raw format record as the engine reports it. Every field the
/// quality menu needs is optional here; selection filters out incomplete
/// records.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFormat {
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub filesize: Option<u64>,
    #[serde(default)]
    pub format_id: Option<String>,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub format_note: Option<String>,
}

/// Validated view of one metadata probe. Derived fresh on each fetch;
/// never cached here.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaMetadata {
    /// The canonical 11-character identifier.
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Seconds; absent for livestreams.
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub webpage_url: Option<String>,
    /// Container extension of the format the probe selected.
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub formats: Vec<RawFormat>,
}

impl MediaMetadata {
    /// Validate a parsed engine document into the strict schema.
    pub fn from_value(value: &Value) -> Result<Self> {
        Ok(serde_json::from_value(value.clone())?)
    }

    /// Duration in whole seconds; 0 for livestreams and unknowns.
    pub fn duration_seconds(&self) -> u64 {
        self.duration.map(|d| d as u64).unwrap_or(0)
    }

    /// Display-formatted duration; absent when the duration is unknown.
    pub fn duration_formatted(&self) -> Option<String> {
        format_duration(self.duration_seconds())
    }

    /// Thumbnail URL, possibly empty.
    pub fn thumbnail_url(&self) -> String {
        self.thumbnail.clone().unwrap_or_default()
    }
}

/// The display bundle the surrounding bot shows for one track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackDetails {
    pub title: Option<String>,
    /// Watch-page URL: the engine's `webpage_url` when reported, the
    /// canonical URL we probed otherwise.
    pub link: String,
    pub video_id: String,
    pub duration: Option<String>,
    pub thumbnail: String,
}

impl TrackDetails {
    pub fn from_metadata(meta: &MediaMetadata, canonical_url: &str) -> Self {
        Self {
            title: meta.title.clone(),
            link: meta.webpage_url.clone().unwrap_or_else(|| canonical_url.to_string()),
            video_id: meta.id.clone(),
            duration: meta.duration_formatted(),
            thumbnail: meta.thumbnail_url(),
        }
    }
}

/// Format seconds as `H:MM:SS` when hours are present, `M:SS` otherwise.
/// Zero seconds yields `None`: livestreams have no fixed duration.
pub fn format_duration(total_secs: u64) -> Option<String> {
    if total_secs == 0 {
        return None;
    }

    let (minutes, seconds) = (total_secs / 60, total_secs % 60);
    let (hours, minutes) = (minutes / 60, minutes % 60);

    Some(if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(45).as_deref(), Some("0:45"));
        assert_eq!(format_duration(125).as_deref(), Some("2:05"));
        assert_eq!(format_duration(3725).as_deref(), Some("1:02:05"));
        assert_eq!(format_duration(3600).as_deref(), Some("1:00:00"));
        assert_eq!(format_duration(0), None);
    }

    #[test]
    fn test_metadata_from_full_probe() {
        let json = serde_json::json!({
            "id": "dQw4w9WgXcQ",
            "title": "Some Song",
            "duration": 212.4,
            "thumbnail": "https://i.ytimg.com/vi/dQw4w9WgXcQ/hq720.jpg",
            "webpage_url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "ext": "webm",
            "formats": [{"format_id": "251", "ext": "webm"}]
        });

        let meta = MediaMetadata::from_value(&json).expect("valid probe json");
        assert_eq!(meta.id, "dQw4w9WgXcQ");
        assert_eq!(meta.title.as_deref(), Some("Some Song"));
        assert_eq!(meta.duration_seconds(), 212);
        assert_eq!(meta.duration_formatted().as_deref(), Some("3:32"));
        assert_eq!(meta.ext.as_deref(), Some("webm"));
        assert_eq!(meta.formats.len(), 1);
    }

    #[test]
    fn test_metadata_livestream_has_no_duration() {
        let json = serde_json::json!({
            "id": "jfKfPfyJRdk",
            "title": "24/7 stream",
            "duration": null
        });

        let meta = MediaMetadata::from_value(&json).expect("valid livestream json");
        assert_eq!(meta.duration_seconds(), 0);
        assert_eq!(meta.duration_formatted(), None);
        assert_eq!(meta.thumbnail_url(), "");
    }

    #[test]
    fn test_metadata_requires_id() {
        let json = serde_json::json!({ "title": "no id here" });
        assert!(MediaMetadata::from_value(&json).is_err());
    }

    #[test]
    fn test_track_details_prefers_webpage_url() {
        let json = serde_json::json!({
            "id": "dQw4w9WgXcQ",
            "title": "Some Song",
            "duration": 125,
            "webpage_url": "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        });
        let meta = MediaMetadata::from_value(&json).unwrap();

        let track = TrackDetails::from_metadata(&meta, "https://fallback.example");
        assert_eq!(track.link, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        assert_eq!(track.duration.as_deref(), Some("2:05"));
        assert_eq!(track.video_id, "dQw4w9WgXcQ");
    }

    #[test]
    fn test_track_details_falls_back_to_canonical_url() {
        let json = serde_json::json!({ "id": "dQw4w9WgXcQ" });
        let meta = MediaMetadata::from_value(&json).unwrap();

        let track = TrackDetails::from_metadata(&meta, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        assert_eq!(track.link, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        assert_eq!(track.title, None);
        assert_eq!(track.duration, None);
    }
}
