//! Extraction-engine boundary.
//!
//! Everything the crate needs from the media-extraction engine goes
//! through the [`MediaEngine`] trait: metadata probes, direct stream-URL
//! resolution, downloads, and flat-playlist listings. The production
//! implementation shells out to the `yt-dlp` binary; tests substitute a
//! scripted engine.
//!
//! Every call is credential-scoped (a cookie file path chosen by the
//! caller), runs with certificate checks disabled and geo-bypass enabled,
//! and is awaited as an async subprocess.

use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;
use tokio::process::Command;
use tracing::debug;

use crate::error::{Error, Result};

use super::ytdlp::run_yt_dlp;

/// Post-download re-encode to a fixed audio codec and quality tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioTranscode {
    pub codec: String,
    pub quality: String,
}

impl Default for AudioTranscode {
    fn default() -> Self {
        Self {
            codec: super::settings::AUDIO_CODEC.to_string(),
            quality: super::settings::AUDIO_QUALITY.to_string(),
        }
    }
}

/// One download invocation: what to fetch and where to put it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    /// yt-dlp format specification (`-f`).
    pub format: String,
    /// Output template (`-o`), possibly containing `%(id)s` / `%(ext)s`.
    pub output: String,
    /// Container to merge split audio/video streams into.
    pub merge_format: Option<String>,
    /// Re-encode the result to a fixed audio codec after download.
    pub transcode_audio: Option<AudioTranscode>,
}

/// The capabilities this crate needs from the extraction engine.
#[async_trait]
pub trait MediaEngine: Send + Sync {
    /// Metadata-only probe (`-J`, no download). `format` narrows the
    /// probe so the reported container extension matches what a download
    /// with the same specification would produce.
    async fn probe(&self, url: &str, format: Option<&str>, cookies: &Path) -> Result<Value>;

    /// Resolve a direct streaming URL (`-g -f <format>`).
    ///
    /// Returns raw stdout even when the process exits non-zero; the
    /// output may be empty when no format matched. Only spawn-level
    /// failures are errors.
    async fn resolve_stream(&self, url: &str, format: &str, cookies: &Path) -> Result<String>;

    /// Download media to disk per the request; resolves once the engine
    /// has exited. Hard error on any engine failure.
    async fn download(&self, request: &DownloadRequest, cookies: &Path) -> Result<()>;

    /// Flat-playlist id listing, newline-delimited, truncated server-side
    /// to `limit` entries.
    async fn list_playlist(&self, url: &str, limit: usize, cookies: &Path) -> Result<String>;
}

/// Production engine: the `yt-dlp` command-line tool.
#[derive(Debug, Clone, Copy, Default)]
pub struct YtDlp;

impl YtDlp {
    /// Options common to every credential-scoped call.
    fn base_command(cookies: &Path) -> Command {
        let mut cmd = Command::new("yt-dlp");
        cmd.arg("--cookies")
            .arg(cookies)
            .arg("--no-check-certificates")
            .arg("--geo-bypass")
            .arg("--no-warnings");
        cmd
    }
}

#[async_trait]
impl MediaEngine for YtDlp {
    async fn probe(&self, url: &str, format: Option<&str>, cookies: &Path) -> Result<Value> {
        let mut cmd = Self::base_command(cookies);
        cmd.arg("-J").arg("--no-playlist");
        if let Some(format) = format {
            cmd.arg("-f").arg(format);
        }
        cmd.arg(url);

        debug!(url, ?format, "probing metadata");
        let out = run_yt_dlp(&mut cmd).await.map_err(|e| Error::io("spawning yt-dlp probe", e))?;
        if !out.success {
            return Err(Error::extraction(url, out.stderr.trim().to_string()));
        }

        Ok(serde_json::from_str(out.stdout.trim())?)
    }

    async fn resolve_stream(&self, url: &str, format: &str, cookies: &Path) -> Result<String> {
        let mut cmd = Self::base_command(cookies);
        cmd.arg("-g").arg("-f").arg(format).arg(url);

        debug!(url, format, "resolving direct stream URL");
        let out = run_yt_dlp(&mut cmd).await.map_err(|e| Error::io("spawning yt-dlp stream resolution", e))?;
        // Non-zero exit with empty stdout is how "no matching format"
        // presents; the caller decides whether that is fatal.
        Ok(out.stdout)
    }

    async fn download(&self, request: &DownloadRequest, cookies: &Path) -> Result<()> {
        let mut cmd = Self::base_command(cookies);
        cmd.arg("--quiet").arg("-f").arg(&request.format).arg("-o").arg(&request.output);

        if let Some(container) = &request.merge_format {
            cmd.arg("--merge-output-format").arg(container);
        }
        if let Some(transcode) = &request.transcode_audio {
            cmd.arg("-x").arg("--audio-format").arg(&transcode.codec).arg("--audio-quality").arg(&transcode.quality);
        }
        cmd.arg(&request.url);

        debug!(url = %request.url, format = %request.format, output = %request.output, "starting download");
        let out = run_yt_dlp(&mut cmd).await.map_err(|e| Error::io("spawning yt-dlp download", e))?;
        if !out.success {
            return Err(Error::extraction(&request.url, out.stderr.trim().to_string()));
        }

        Ok(())
    }

    async fn list_playlist(&self, url: &str, limit: usize, cookies: &Path) -> Result<String> {
        let mut cmd = Self::base_command(cookies);
        cmd.arg("-i")
            .arg("--get-id")
            .arg("--flat-playlist")
            .arg("--playlist-end")
            .arg(limit.to_string())
            .arg("--skip-download")
            .arg(url);

        debug!(url, limit, "listing playlist ids");
        let out = run_yt_dlp(&mut cmd).await.map_err(|e| Error::io("spawning yt-dlp playlist listing", e))?;
        if !out.success && !out.stderr_is_benign() {
            return Err(Error::extraction(url, out.stderr.trim().to_string()));
        }

        Ok(out.stdout)
    }
}
