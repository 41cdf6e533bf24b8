//! Media resolution and acquisition pipeline.
//!
//! Submodules:
//! - `engine`: the [`MediaEngine`] trait and the `yt-dlp` implementation
//! - `ytdlp`: subprocess capture utilities
//! - `media_info`: probe-output schema and duration formatting
//! - `formats`: quality-menu selection
//! - `playlist`: flat-playlist output parsing
//! - `settings`: configuration, format specifications, input validation

pub mod engine;
pub mod formats;
pub mod media_info;
pub mod playlist;
pub mod settings;
pub mod ytdlp;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::cookies::CookiePool;
use crate::error::{Error, Result};
use crate::resolver;

pub use engine::{AudioTranscode, DownloadRequest, MediaEngine, YtDlp};
pub use formats::{select_formats, FormatOption};
pub use media_info::{format_duration, MediaMetadata, RawFormat, TrackDetails};
pub use settings::Settings;

/// What to acquire and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquireMode {
    /// Best audio, cached by video id.
    Audio,
    /// Capped-quality video, cached by video id. When `direct_download`
    /// is set the remote tier is skipped and the file is fetched locally.
    Video { direct_download: bool },
    /// A user-chosen format transcoded to a fixed audio codec, named by
    /// title.
    SongAudio { format_id: String, title: String },
    /// A user-chosen video format merged with its companion audio stream,
    /// named by title.
    SongVideo { format_id: String, title: String },
}

/// The outcome of an acquisition: either a remote URL the player can
/// stream directly, or a local file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acquisition {
    Remote { url: String },
    Local { path: PathBuf },
}

/// The resolution and acquisition client. Cheap to clone; the engine is
/// shared.
#[derive(Clone)]
pub struct YouTube {
    settings: Settings,
    cookies: CookiePool,
    engine: Arc<dyn MediaEngine>,
}

impl YouTube {
    /// Client backed by the `yt-dlp` binary.
    pub fn new(settings: Settings) -> Self {
        let engine = Arc::new(YtDlp);
        Self::with_engine(settings, engine)
    }

    /// Client backed by an arbitrary engine. Tests use this to script
    /// engine behavior.
    pub fn with_engine(settings: Settings, engine: Arc<dyn MediaEngine>) -> Self {
        let cookies = CookiePool::new(settings.cookie_dir.clone());
        Self { settings, cookies, engine }
    }

    /// Validate a reference and normalize it to the canonical watch URL.
    fn normalize(&self, reference: &str) -> Result<String> {
        settings::validate_reference(reference).map_err(|_| Error::invalid_reference(reference))?;
        resolver::normalize_watch_url(reference).ok_or_else(|| Error::invalid_reference(reference))
    }

    /// Probe metadata for a reference. Always a fresh engine call; results
    /// are never cached.
    pub async fn details(&self, reference: &str) -> Result<MediaMetadata> {
        let url = self.normalize(reference)?;
        let cookie = self.cookies.select()?;
        let value = self.engine.probe(&url, None, &cookie).await?;
        MediaMetadata::from_value(&value)
    }

    pub async fn title(&self, reference: &str) -> Result<Option<String>> {
        Ok(self.details(reference).await?.title)
    }

    /// Duration in whole seconds; 0 for livestreams.
    pub async fn duration(&self, reference: &str) -> Result<u64> {
        Ok(self.details(reference).await?.duration_seconds())
    }

    pub async fn thumbnail(&self, reference: &str) -> Result<String> {
        Ok(self.details(reference).await?.thumbnail_url())
    }

    /// The display bundle for one track.
    pub async fn track(&self, reference: &str) -> Result<TrackDetails> {
        let url = self.normalize(reference)?;
        let cookie = self.cookies.select()?;
        let value = self.engine.probe(&url, None, &cookie).await?;
        let meta = MediaMetadata::from_value(&value)?;
        Ok(TrackDetails::from_metadata(&meta, &url))
    }

    /// The quality menu for a reference, paired with the canonical URL the
    /// formats belong to.
    pub async fn formats(&self, reference: &str) -> Result<(Vec<FormatOption>, String)> {
        let url = self.normalize(reference)?;
        let cookie = self.cookies.select()?;
        let value = self.engine.probe(&url, None, &cookie).await?;
        let meta = MediaMetadata::from_value(&value)?;
        Ok((select_formats(&meta.formats, &url), url))
    }

    /// Total byte size across every raw format that reports one, dash and
    /// incomplete records included. `None` when the probe lists no formats
    /// at all.
    pub async fn probe_size(&self, reference: &str) -> Result<Option<u64>> {
        let url = self.normalize(reference)?;
        let cookie = self.cookies.select()?;
        let value = self.engine.probe(&url, None, &cookie).await?;
        let meta = MediaMetadata::from_value(&value)?;

        if meta.formats.is_empty() {
            return Ok(None);
        }
        Ok(Some(meta.formats.iter().filter_map(|f| f.filesize).sum()))
    }

    /// Video ids of a playlist, at most `limit` of them.
    ///
    /// A reference that is not a playlist URL yields an empty list, as
    /// does an engine failure; an empty cookie pool is still fatal.
    pub async fn playlist(&self, reference: &str, limit: usize) -> Result<Vec<String>> {
        if !resolver::is_playlist_url(reference) {
            return Ok(Vec::new());
        }

        let cookie = self.cookies.select()?;
        match self.engine.list_playlist(reference, limit, &cookie).await {
            Ok(output) => Ok(playlist::parse_playlist_ids(&output, limit)),
            Err(e) => {
                warn!(reference, error = %e, "playlist listing failed, returning empty list");
                Ok(Vec::new())
            }
        }
    }

    /// Resolve a direct, capped-quality streaming URL. Unlike the
    /// acquisition paths this has no local fallback; an unusable result is
    /// an error.
    pub async fn stream_url(&self, reference: &str) -> Result<String> {
        let url = self.normalize(reference)?;
        let cookie = self.cookies.select()?;
        let output = self.engine.resolve_stream(&url, settings::STREAM_FORMAT, &cookie).await?;
        first_stream_line(&output).ok_or_else(|| Error::extraction(&url, "no stream URL in output"))
    }

    /// Acquire media for a reference per the requested mode.
    pub async fn acquire(&self, reference: &str, mode: AcquireMode) -> Result<Acquisition> {
        let url = self.normalize(reference)?;

        match mode {
            AcquireMode::Audio => {
                let path = self.download_cached(&url, settings::AUDIO_FORMAT, None).await?;
                Ok(Acquisition::Local { path })
            }
            AcquireMode::Video { direct_download } => self.generic_video(&url, direct_download).await,
            AcquireMode::SongAudio { format_id, title } => {
                let path = self.song_audio(&url, &format_id, &title).await?;
                Ok(Acquisition::Local { path })
            }
            AcquireMode::SongVideo { format_id, title } => {
                let path = self.song_video(&url, &format_id, &title).await?;
                Ok(Acquisition::Local { path })
            }
        }
    }

    /// Generic video tiering: try the remote stream URL first unless the
    /// caller forces a local download, and fall back to a cached local
    /// download whenever the remote tier yields nothing usable.
    async fn generic_video(&self, url: &str, direct_download: bool) -> Result<Acquisition> {
        if !direct_download {
            if let Some(remote) = self.try_stream(url).await {
                return Ok(Acquisition::Remote { url: remote });
            }
            debug!(url, "remote stream unavailable, falling back to local download");
        }

        let path = self.download_cached(url, settings::VIDEO_FORMAT, Some("mp4".to_string())).await?;
        Ok(Acquisition::Local { path })
    }

    /// Best-effort remote resolution. Any failure (no credentials, spawn
    /// error, empty or non-URL output) is `None`; the caller falls back.
    async fn try_stream(&self, url: &str) -> Option<String> {
        let cookie = self.cookies.select().ok()?;
        let output = self.engine.resolve_stream(url, settings::STREAM_FORMAT, &cookie).await.ok()?;
        first_stream_line(&output)
    }

    /// Download to `<download_dir>/<id>.<ext>`, reusing an existing file
    /// with that name. Reuse checks existence only; partial files are
    /// trusted.
    async fn download_cached(&self, url: &str, format: &str, merge_format: Option<String>) -> Result<PathBuf> {
        let cookie = self.cookies.select()?;

        // Probe with the same format specification so the reported
        // container extension matches what the download would produce.
        let value = self.engine.probe(url, Some(format), &cookie).await?;
        let meta = MediaMetadata::from_value(&value)?;
        let ext = meta.ext.as_deref().ok_or_else(|| Error::extraction(url, "probe reported no container extension"))?;

        let path = self.settings.download_dir.join(format!("{}.{ext}", meta.id));
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            debug!(path = %path.display(), "reusing existing download");
            return Ok(path);
        }

        let request = DownloadRequest {
            url: url.to_string(),
            format: format.to_string(),
            output: self.settings.download_dir.join("%(id)s.%(ext)s").to_string_lossy().into_owned(),
            merge_format,
            transcode_audio: None,
        };
        self.engine.download(&request, &cookie).await?;
        Ok(path)
    }

    /// Explicit-format audio: download the chosen format and transcode to
    /// the fixed codec, named by sanitized title.
    async fn song_audio(&self, url: &str, format_id: &str, title: &str) -> Result<PathBuf> {
        let title = settings::sanitize_file_name(title);
        let cookie = self.cookies.select()?;

        let request = DownloadRequest {
            url: url.to_string(),
            format: format_id.to_string(),
            output: self.settings.download_dir.join(format!("{title}.%(ext)s")).to_string_lossy().into_owned(),
            merge_format: None,
            transcode_audio: Some(AudioTranscode::default()),
        };
        self.engine.download(&request, &cookie).await?;

        Ok(self.settings.download_dir.join(format!("{title}.{}", settings::AUDIO_CODEC)))
    }

    /// Explicit-format video: merge the chosen video format with the
    /// companion audio stream into an mp4, named by sanitized title.
    async fn song_video(&self, url: &str, format_id: &str, title: &str) -> Result<PathBuf> {
        let title = settings::sanitize_file_name(title);
        let cookie = self.cookies.select()?;

        let request = DownloadRequest {
            url: url.to_string(),
            format: format!("{format_id}+{}", settings::COMPANION_AUDIO_ID),
            output: self.settings.download_dir.join(&title).to_string_lossy().into_owned(),
            merge_format: Some("mp4".to_string()),
            transcode_audio: None,
        };
        self.engine.download(&request, &cookie).await?;

        Ok(self.settings.download_dir.join(format!("{title}.mp4")))
    }
}

/// First non-empty line of stream-resolution output, accepted only when
/// it parses as an http(s) URL. Engines can print warnings or nothing at
/// all on this channel.
fn first_stream_line(output: &str) -> Option<String> {
    let line = output.lines().map(str::trim).find(|line| !line.is_empty())?;
    let parsed = url::Url::parse(line).ok()?;
    matches!(parsed.scheme(), "http" | "https").then(|| line.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_stream_line_takes_first_url() {
        let output = "\nhttps://cdn.example/video.mp4?expire=1\nhttps://cdn.example/audio.m4a\n";
        assert_eq!(first_stream_line(output).as_deref(), Some("https://cdn.example/video.mp4?expire=1"));
    }

    #[test]
    fn test_first_stream_line_rejects_non_urls() {
        assert_eq!(first_stream_line(""), None);
        assert_eq!(first_stream_line("\n   \n"), None);
        assert_eq!(first_stream_line("ERROR: requested format not available"), None);
        assert_eq!(first_stream_line("ftp://cdn.example/video.mp4"), None);
    }
}
