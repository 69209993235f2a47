//! Utility functions for file naming and path manipulation

use crate::error::{DownloadError, Error, Result};
use std::path::{Path, PathBuf};

/// Characters stripped from titles before they become file names
pub const FORBIDDEN_FILENAME_CHARS: [char; 9] = ['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Suffix of the in-progress file written next to a download target
const PARTIAL_SUFFIX: &str = ".part";

/// Remove characters that are not allowed in file names on common platforms
///
/// # Examples
///
/// ```
/// use report_dl::utils::sanitize_title;
///
/// assert_eq!(sanitize_title("A/B:C?"), "ABC");
/// assert_eq!(sanitize_title("Semis <2025> outlook"), "Semis 2025 outlook");
/// ```
#[must_use]
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| !FORBIDDEN_FILENAME_CHARS.contains(c))
        .collect()
}

/// Date portion of an ISO-8601-like timestamp (everything before `T`)
///
/// # Examples
///
/// ```
/// use report_dl::utils::date_portion;
///
/// assert_eq!(date_portion("2025-09-30T00:00:00.000"), "2025-09-30");
/// assert_eq!(date_portion("2025-09-30"), "2025-09-30");
/// assert_eq!(date_portion(""), "");
/// ```
#[must_use]
pub fn date_portion(timestamp: &str) -> &str {
    timestamp.split('T').next().unwrap_or_default()
}

/// Path of the temporary file a download streams into before it is renamed
///
/// Returns an error if the target has no file name component.
pub fn partial_path(target: &Path) -> Result<PathBuf> {
    let file_name = target.file_name().ok_or_else(|| {
        Error::Download(DownloadError::InvalidTarget {
            path: target.to_path_buf(),
            reason: "target has no file name".to_string(),
        })
    })?;

    let mut partial = file_name.to_os_string();
    partial.push(PARTIAL_SUFFIX);
    Ok(target.with_file_name(partial))
}

/// True if the path ends in `.pdf`, ignoring case
#[must_use]
pub fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}
