//! yt-dlp subprocess interaction utilities.

use std::process::Stdio;

use tokio::io::AsyncReadExt;
use tokio::process::Command;

/// Captured result of one yt-dlp invocation.
#[derive(Debug)]
pub struct YtDlpOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

impl YtDlpOutput {
    /// Playlists with removed entries make yt-dlp print
    /// "unavailable videos are hidden" on stderr. Informational, not a
    /// failure; the ids on stdout are still valid.
    pub fn stderr_is_benign(&self) -> bool {
        self.stderr.to_lowercase().contains("unavailable videos are hidden")
    }
}

/// Run a yt-dlp command and capture stdout/stderr.
/// Ensures stdin is closed and output is captured concurrently.
pub async fn run_yt_dlp(cmd: &mut Command) -> Result<YtDlpOutput, std::io::Error> {
    // Ensure we capture output and close stdin
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    // On Windows, prevent window creation
    #[cfg(windows)]
    cmd.creation_flags(0x08000000); // CREATE_NO_WINDOW

    let mut child = cmd.spawn()?;

    let mut stdout = child.stdout.take().ok_or_else(|| std::io::Error::other("Could not capture stdout"))?;
    let mut stderr = child.stderr.take().ok_or_else(|| std::io::Error::other("Could not capture stderr"))?;

    let mut output = String::new();
    let mut errors = String::new();

    // Read stdout and stderr concurrently
    let (out_res, err_res) = tokio::join!(stdout.read_to_string(&mut output), stderr.read_to_string(&mut errors));

    out_res?;
    err_res?;

    let status = child.wait().await?;

    // yt-dlp can emit valid output while returning non-zero (warnings,
    // partial failures). Preserve stdout so callers can still use it, and
    // surface the status via stderr.
    if !status.success() {
        let status_note = match status.code() {
            Some(code) => format!("yt-dlp exited with status code {code}"),
            None => "yt-dlp exited without status code (terminated by signal)".to_string(),
        };

        if errors.trim().is_empty() {
            errors.push_str(&status_note);
        } else {
            errors.push('\n');
            errors.push_str(&status_note);
        }
    }

    Ok(YtDlpOutput { stdout: output, stderr: errors, success: status.success() })
}
