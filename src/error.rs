//! Typed error types for the resolution and acquisition pipeline.
//!
//! The taxonomy mirrors how failures surface to callers:
//! - `InvalidReference`: the resolver/normalizer could not produce a
//!   canonical watch URL. Always a failure value, never a panic.
//! - `NoCredentials`: the cookie pool is empty. Fatal, no retry.
//! - `Extraction`: the yt-dlp call itself failed (spawn error, non-zero
//!   exit, unusable output). Propagated unmodified on mandatory-download
//!   paths; treated as a soft condition only at the single designated
//!   remote-to-local fallback point.
//!
//! Empty playlists and empty format lists are not errors; those
//! operations return empty collections instead.

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid reference: {0:?}")]
    InvalidReference(String),

    #[error("no cookie files found in {}", dir.display())]
    NoCredentials { dir: PathBuf },

    #[error("extraction failed for {url}: {message}")]
    Extraction { url: String, message: String },

    #[error("io error in {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse yt-dlp output: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

// Convenience constructors
impl Error {
    /// Create an invalid-reference error from the offending input.
    pub fn invalid_reference(reference: impl Into<String>) -> Self {
        Self::InvalidReference(reference.into())
    }

    /// Create an extraction error for a given URL.
    pub fn extraction(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Extraction {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Whether this error means the caller handed us something that can
    /// never resolve (as opposed to a transient engine failure).
    pub fn is_invalid_reference(&self) -> bool {
        matches!(self, Self::InvalidReference(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_reference("not-a-url");
        assert_eq!(err.to_string(), "invalid reference: \"not-a-url\"");

        let err = Error::extraction("https://www.youtube.com/watch?v=abcdefghijk", "exit status 1");
        assert!(err.to_string().contains("extraction failed"));
        assert!(err.to_string().contains("exit status 1"));
    }

    #[test]
    fn test_no_credentials_display_includes_dir() {
        let err = Error::NoCredentials { dir: PathBuf::from("cookies") };
        assert_eq!(err.to_string(), "no cookie files found in cookies");
    }

    #[test]
    fn test_io_error_wrapping() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::io("reading cookie dir", io_err);
        assert!(err.to_string().contains("io error in reading cookie dir"));
    }

    #[test]
    fn test_is_invalid_reference() {
        assert!(Error::invalid_reference("x").is_invalid_reference());
        assert!(!Error::extraction("u", "m").is_invalid_reference());
    }
}
