//! Reference resolution: canonical video ids and watch URLs.
//!
//! Accepts anything a user might paste (raw 11-character id, full watch
//! URL, short link, embed/shorts/live URL, fragment-encoded `v=`), and
//! resolves it to the canonical identifier or canonical watch URL. No
//! network access happens here; everything is pure string work.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// Base of the canonical watch URL.
pub const WATCH_BASE: &str = "https://www.youtube.com/watch?v=";

/// Base of the canonical playlist URL.
pub const PLAYLIST_BASE: &str = "https://youtube.com/playlist?list=";

/// Matches every known URL shape that embeds an 11-character video id.
static VIDEO_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        (?:youtu\.be/|
           youtube(?:-nocookie)?\.com/
           (?:watch\?.*?v=|embed/|shorts/|live/|v/|.+?\#(?:.*?&)?v=)
        )
        ([A-Za-z0-9_-]{11})",
    )
    .expect("video id pattern is valid")
});

/// Cheap host check: does this look like a YouTube link at all?
static HOST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:youtube\.com|youtu\.be)").expect("host pattern is valid"));

/// An 11-character id from the `[A-Za-z0-9_-]` alphabet.
pub fn is_canonical_id(candidate: &str) -> bool {
    candidate.len() == 11 && candidate.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Strip whitespace and the angle brackets chat clients wrap links in.
fn clean_reference(reference: &str) -> &str {
    reference.trim().trim_matches(|c| c == '<' || c == '>')
}

/// Extract the canonical 11-character video id from any accepted URL shape.
///
/// Falls back to the `v` query parameter for URLs the pattern does not
/// recognize. Returns `None` when nothing yields a valid id.
pub fn extract_video_id(reference: &str) -> Option<String> {
    let cleaned = clean_reference(reference);
    if cleaned.is_empty() {
        return None;
    }

    if let Some(caps) = VIDEO_ID_RE.captures(cleaned) {
        return Some(caps[1].to_string());
    }

    // Fallback: any URL carrying a valid `v` query parameter.
    let parsed = Url::parse(cleaned)
        .or_else(|_| Url::parse(&format!("https://{cleaned}")))
        .ok()?;
    let vid = parsed
        .query_pairs()
        .find(|(key, _)| key == "v")
        .map(|(_, value)| value.into_owned())?;
    is_canonical_id(&vid).then_some(vid)
}

/// Normalize any reference (raw id or URL) to the canonical watch URL.
///
/// Two-tier policy: canonicalize whenever an id can be extracted; pass
/// through references that already look like a watch or short link even
/// when no id was recognized (trusted but not re-validated). Returns
/// `None` for everything else.
pub fn normalize_watch_url(reference: &str) -> Option<String> {
    let candidate = clean_reference(reference);
    if candidate.is_empty() {
        return None;
    }

    if is_canonical_id(candidate) {
        return Some(format!("{WATCH_BASE}{candidate}"));
    }

    if let Some(id) = extract_video_id(candidate) {
        return Some(format!("{WATCH_BASE}{id}"));
    }

    if candidate.contains("youtube.com/watch") || candidate.contains("youtu.be/") {
        return Some(candidate.to_string());
    }

    None
}

/// A URL is a playlist reference iff its `list` query parameter is
/// present and non-empty. Never fails; malformed input degrades to a raw
/// substring check and, failing that, `false`.
pub fn is_playlist_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => parsed.query_pairs().any(|(key, value)| key == "list" && !value.is_empty()),
        Err(_) => url.contains("playlist?list="),
    }
}

/// Whether the reference mentions a recognized YouTube host at all.
pub fn is_youtube_host(reference: &str) -> bool {
    HOST_RE.is_match(reference)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "dQw4w9WgXcQ";

    #[test]
    fn test_extract_id_from_every_supported_shape() {
        let shapes = [
            format!("https://www.youtube.com/watch?v={ID}"),
            format!("https://youtube.com/watch?v={ID}&t=42"),
            format!("https://youtu.be/{ID}"),
            format!("https://youtu.be/{ID}?si=share"),
            format!("https://www.youtube.com/embed/{ID}"),
            format!("https://www.youtube.com/shorts/{ID}"),
            format!("https://www.youtube.com/live/{ID}"),
            format!("https://www.youtube.com/v/{ID}"),
            format!("https://www.youtube-nocookie.com/embed/{ID}"),
            format!("https://www.youtube.com/user/someone#p/a/u/1&v={ID}"),
            format!("HTTPS://WWW.YOUTUBE.COM/WATCH?V={ID}"),
        ];

        for shape in shapes {
            assert_eq!(extract_video_id(&shape).as_deref(), Some(ID), "failed for shape {shape}");
        }
    }

    #[test]
    fn test_extract_id_via_query_fallback() {
        // Host shape the pattern doesn't know, but a valid `v` parameter.
        let url = format!("https://music.example.com/player?feature=share&v={ID}");
        assert_eq!(extract_video_id(&url).as_deref(), Some(ID));
    }

    #[test]
    fn test_extract_id_trims_whitespace_and_brackets() {
        let wrapped = format!("  <https://youtu.be/{ID}>  ");
        assert_eq!(extract_video_id(&wrapped).as_deref(), Some(ID));
    }

    #[test]
    fn test_extract_id_rejects_invalid_input() {
        assert_eq!(extract_video_id(""), None);
        assert_eq!(extract_video_id("not a url at all"), None);
        assert_eq!(extract_video_id("https://example.com/watch?v=short"), None);
        // Pattern extraction takes the first 11 valid characters, like the
        // watch page itself does with overlong ids.
        assert_eq!(extract_video_id("https://www.youtube.com/watch?v=abcdefghijkl&x=1"), Some("abcdefghijk".into()));
        // The query fallback is strict: 12 characters is not an id.
        assert_eq!(extract_video_id("https://music.example.com/player?v=abcdefghijkl"), None);
    }

    #[test]
    fn test_normalize_raw_id() {
        assert_eq!(normalize_watch_url(ID).as_deref(), Some(format!("{WATCH_BASE}{ID}").as_str()));
        assert_eq!(normalize_watch_url(&format!("<{ID}>")).as_deref(), Some(format!("{WATCH_BASE}{ID}").as_str()));
    }

    #[test]
    fn test_normalize_round_trip_through_shapes() {
        let canonical = format!("{WATCH_BASE}{ID}");
        for shape in [
            format!("https://youtu.be/{ID}"),
            format!("https://www.youtube.com/shorts/{ID}"),
            format!("https://www.youtube.com/embed/{ID}"),
            ID.to_string(),
        ] {
            assert_eq!(normalize_watch_url(&shape).as_deref(), Some(canonical.as_str()));
        }
    }

    #[test]
    fn test_normalize_passes_through_plausible_watch_urls() {
        // No extractable id, but recognizably a watch link: trusted as-is.
        let odd = "https://www.youtube.com/watch?app=desktop&v=tooshort";
        assert_eq!(normalize_watch_url(odd).as_deref(), Some(odd));
    }

    #[test]
    fn test_normalize_rejects_unrelated_input() {
        assert_eq!(normalize_watch_url(""), None);
        assert_eq!(normalize_watch_url("https://example.com/video/123"), None);
        assert_eq!(normalize_watch_url("just some words"), None);
    }

    #[test]
    fn test_is_playlist_url() {
        assert!(is_playlist_url("https://youtube.com/playlist?list=PLx0sYbCqOb8TBPRdmBHs5Iftvv9TPboYG"));
        assert!(is_playlist_url(&format!("https://www.youtube.com/watch?v={ID}&list=PLx0sYbCqOb8T")));
        assert!(!is_playlist_url(&format!("https://www.youtube.com/watch?v={ID}")));
        assert!(!is_playlist_url("https://www.youtube.com/watch?v=abcdefghijk"));
        assert!(!is_playlist_url("https://youtube.com/playlist?list="));
        // Malformed input degrades to a substring check, never an error.
        assert!(is_playlist_url("::not a url::playlist?list=PL123"));
        assert!(!is_playlist_url("::not a url::"));
    }

    #[test]
    fn test_is_youtube_host() {
        assert!(is_youtube_host("https://youtu.be/x"));
        assert!(is_youtube_host("check https://www.youtube.com/watch?v=abc out"));
        assert!(!is_youtube_host("https://vimeo.com/12345"));
    }
}
