//! Credential pool for extraction-engine calls.
//!
//! Every external call authenticates with one cookie file picked at
//! random from a configured directory of `.txt` exports. Each selection
//! is appended to a CSV audit log next to the pool so operators can see
//! which credential served which call. The log is append-only and
//! unsynchronized; interleaved lines from concurrent calls are fine.

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::seq::IndexedRandom;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// File name of the selection audit log inside the cookie directory.
pub const AUDIT_LOG_NAME: &str = "logs.csv";

/// A directory of cookie files plus its audit log.
#[derive(Debug, Clone)]
pub struct CookiePool {
    dir: PathBuf,
    log_path: PathBuf,
}

impl CookiePool {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let log_path = dir.join(AUDIT_LOG_NAME);
        Self { dir, log_path }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Pick one cookie file at random and record the choice.
    ///
    /// An empty (or missing) pool is a configuration error and fails with
    /// `NoCredentials`. A failure to write the audit record does not fail
    /// the selection; the side channel must never block the call itself.
    pub fn select(&self) -> Result<PathBuf> {
        let files = self.available()?;
        let Some(chosen) = files.choose(&mut rand::rng()) else {
            return Err(Error::NoCredentials { dir: self.dir.clone() });
        };

        debug!(cookie = %chosen.display(), "selected cookie file");
        if let Err(e) = self.append_audit(chosen) {
            warn!(error = %e, log = %self.log_path.display(), "failed to append cookie audit record");
        }

        Ok(chosen.clone())
    }

    /// All `.txt` cookie files currently in the pool, sorted for
    /// determinism. A missing directory counts as an empty pool.
    fn available(&self) -> Result<Vec<PathBuf>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::io("reading cookie directory", e)),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::io("reading cookie directory", e))?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some("txt") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn append_audit(&self, chosen: &Path) -> std::result::Result<(), csv::Error> {
        let file = OpenOptions::new().create(true).append(true).open(&self.log_path)?;
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);

        let timestamp = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0);
        writer.write_record([timestamp.to_string().as_str(), &chosen.to_string_lossy()])?;
        writer.flush()?;
        Ok(())
    }
}
