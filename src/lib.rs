//! Resolution and acquisition pipeline for YouTube media references.
//!
//! Takes anything a chat user might hand over (a raw video id, any URL
//! shape that embeds one, or a whole message with link entities),
//! resolves it to a canonical watch URL, and acquires the media either as
//! a direct remote streaming URL or as a local file downloaded through
//! `yt-dlp`, with credential rotation from a cookie pool.
//!
//! Entry point is [`YouTube`]; construct it from [`Settings`] and call
//! [`YouTube::acquire`] or the metadata fetchers.

pub mod cookies;
pub mod downloader;
pub mod error;
pub mod message;
pub mod resolver;

pub use cookies::CookiePool;
pub use downloader::{
    AcquireMode, Acquisition, AudioTranscode, DownloadRequest, FormatOption, MediaEngine,
    MediaMetadata, RawFormat, Settings, TrackDetails, YouTube, YtDlp,
};
pub use error::{Error, Result};
pub use message::{first_url, EntityKind, Message, MessageEntity};
