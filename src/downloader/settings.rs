//! Pipeline configuration and input validation.

use std::path::PathBuf;

/// Capped stream quality used when resolving a direct playback URL.
pub const STREAM_FORMAT: &str = "best[height<=?720][width<=?1280]";

/// Best available audio, falling back to best overall.
pub const AUDIO_FORMAT: &str = "bestaudio/best";

/// Capped mp4 video paired with m4a audio for the generic video path.
pub const VIDEO_FORMAT: &str = "(bestvideo[height<=?720][width<=?1280][ext=mp4])+(bestaudio[ext=m4a])";

/// The m4a audio stream merged alongside an explicitly chosen video
/// format.
pub const COMPANION_AUDIO_ID: &str = "140";

/// Target codec for explicit audio downloads.
pub const AUDIO_CODEC: &str = "mp3";

/// Target bitrate (kbit/s) for explicit audio downloads.
pub const AUDIO_QUALITY: &str = "192";

/// References longer than this are rejected before any parsing.
pub const MAX_REFERENCE_LENGTH: usize = 4096;

/// Where downloads land and where cookie files live.
#[derive(Debug, Clone)]
pub struct Settings {
    pub download_dir: PathBuf,
    pub cookie_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self { download_dir: PathBuf::from("downloads"), cookie_dir: PathBuf::from("cookies") }
    }
}

/// Reject references that are empty, oversized, or carry characters with
/// no place in a video reference. The reference is later passed to a
/// subprocess as a single argv entry, so shell metacharacters are not
/// exploitable, but they are never legitimate either.
pub fn validate_reference(reference: &str) -> Result<(), String> {
    if reference.is_empty() {
        return Err("reference is empty".to_string());
    }
    if reference.len() > MAX_REFERENCE_LENGTH {
        return Err(format!("reference exceeds {MAX_REFERENCE_LENGTH} characters"));
    }

    // '&' stays legal: every watch URL with extra query params carries it.
    const DANGEROUS: [char; 5] = ['|', ';', '$', '`', '\0'];
    if let Some(ch) = reference.chars().find(|c| DANGEROUS.contains(c) || *c == '\n' || *c == '\r') {
        return Err(format!("reference contains forbidden character {ch:?}"));
    }

    Ok(())
}

/// Make a media title safe to use as a file name on common filesystems.
pub fn sanitize_file_name(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    cleaned.trim().trim_matches('.').trim().to_string()
}
