//! Quality-menu construction from probed format records.

use super::media_info::RawFormat;

/// One user-selectable download quality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOption {
    pub display_label: String,
    pub filesize_bytes: u64,
    pub format_id: String,
    pub file_extension: String,
    pub format_note: String,
    /// The canonical watch URL these formats were probed from, carried so
    /// a later explicit download needs no re-resolution.
    pub source_url: String,
}

/// Build the quality menu from raw probe records.
///
/// DASH segment formats are dropped; they are not directly downloadable
/// files. Records missing any displayed field are dropped too, so every
/// surviving option renders completely.
pub fn select_formats(formats: &[RawFormat], canonical_url: &str) -> Vec<FormatOption> {
    formats
        .iter()
        .filter_map(|f| {
            let label = f.format.as_deref()?;
            if label.to_lowercase().contains("dash") {
                return None;
            }

            Some(FormatOption {
                display_label: label.to_string(),
                filesize_bytes: f.filesize?,
                format_id: f.format_id.clone()?,
                file_extension: f.ext.clone()?,
                format_note: f.format_note.clone()?,
                source_url: canonical_url.to_string(),
            })
        })
        .collect()
}
