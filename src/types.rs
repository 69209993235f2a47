//! Core types: report records, per-record outcomes, and batch summaries

use crate::error::{Error, Result};
use crate::utils::{date_portion, sanitize_title};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// One element of the list endpoint's `data` array
///
/// Only `infoCode`, `title` and `publishDate` are interpreted; every other
/// field is kept verbatim in [`extra`](Self::extra). Numbers and booleans in
/// the interpreted fields are read as their text; arrays and objects count as
/// absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    /// Remote identifier used to locate the detail page
    #[serde(rename = "infoCode", default, deserialize_with = "lenient_string")]
    pub info_code: Option<String>,

    /// Report title
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,

    /// Publish timestamp, e.g. `2025-09-30T00:00:00.000`
    #[serde(rename = "publishDate", default, deserialize_with = "lenient_string")]
    pub publish_date: Option<String>,

    /// Fields this crate does not use
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ReportRecord {
    /// The `infoCode`, or `MissingData` when it is absent or empty
    pub fn require_info_code(&self) -> Result<&str> {
        match self.info_code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => Ok(code),
            _ => Err(Error::MissingData {
                field: "infoCode",
                context: self.display_title(),
            }),
        }
    }

    /// Title for logs and file names, `Untitled_{infoCode}` when absent or empty
    pub fn display_title(&self) -> String {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => format!("Untitled_{}", self.info_code.as_deref().unwrap_or_default()),
        }
    }

    /// Date part of `publishDate`, or an empty string
    pub fn publish_day(&self) -> &str {
        self.publish_date.as_deref().map(date_portion).unwrap_or_default()
    }

    /// File name `{date}_{sanitized title}.pdf`
    pub fn file_name(&self) -> String {
        format!(
            "{}_{}.pdf",
            self.publish_day(),
            sanitize_title(&self.display_title())
        )
    }

    /// Where this record's PDF is written inside `dir`
    ///
    /// Two records with the same date and title map to the same path; the
    /// later download overwrites the earlier one.
    pub fn download_target(&self, dir: &Path) -> PathBuf {
        dir.join(self.file_name())
    }
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// One page of the list endpoint
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ReportPage {
    /// Page number this page was requested as
    pub page_no: u32,
    /// Records in list order
    pub records: Vec<ReportRecord>,
    /// Total number of pages reported by the server, if present
    pub total_pages: Option<u32>,
    /// Total number of matching reports reported by the server, if present
    pub hits: Option<u64>,
}

/// A PDF that was written to disk
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DownloadedFile {
    /// Final path of the file
    pub path: PathBuf,
    /// Bytes written
    pub bytes: u64,
    /// Attempts it took, the successful one included
    pub attempts: u32,
}

/// What happened to a single record
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecordOutcome {
    /// The PDF was downloaded
    Downloaded {
        /// Final path of the file
        path: PathBuf,
        /// Bytes written
        bytes: u64,
        /// Attempts it took
        attempts: u32,
    },
    /// The detail page has no PDF link
    NoPdf,
    /// The record could not be processed at all (e.g. no `infoCode`)
    Skipped {
        /// Why it was skipped
        reason: String,
    },
    /// Resolution or download failed
    Failed {
        /// Machine-readable error code
        code: String,
        /// Human-readable error message
        message: String,
    },
}

impl RecordOutcome {
    /// Build a `Failed` outcome from an error
    pub fn failed(error: &Error) -> Self {
        RecordOutcome::Failed {
            code: error.error_code().to_string(),
            message: error.to_string(),
        }
    }
}

impl From<DownloadedFile> for RecordOutcome {
    fn from(file: DownloadedFile) -> Self {
        RecordOutcome::Downloaded {
            path: file.path,
            bytes: file.bytes,
            attempts: file.attempts,
        }
    }
}

/// Outcome of one record together with enough context to identify it
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecordReport {
    /// Page the record came from
    pub page_no: u32,
    /// Record `infoCode`, if any
    pub info_code: Option<String>,
    /// Display title
    pub title: String,
    /// What happened
    #[serde(flatten)]
    pub outcome: RecordOutcome,
}

/// A list page that could not be fetched
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageFailure {
    /// Page number
    pub page_no: u32,
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

/// Aggregated results of a pipeline run
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    /// Per-record results in processing order
    pub records: Vec<RecordReport>,
    /// Pages whose list request failed
    pub failed_pages: Vec<PageFailure>,
}

impl BatchSummary {
    fn count(&self, pred: impl Fn(&RecordOutcome) -> bool) -> usize {
        self.records.iter().filter(|r| pred(&r.outcome)).count()
    }

    /// Records whose PDF was written
    pub fn downloaded(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::Downloaded { .. }))
    }

    /// Records without a PDF link
    pub fn no_pdf(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::NoPdf))
    }

    /// Records skipped before any request was made
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::Skipped { .. }))
    }

    /// Records whose resolution or download failed
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::Failed { .. }))
    }
}

/// Page count of one readable PDF
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PdfPageCount {
    /// File path
    pub path: PathBuf,
    /// Number of pages
    pub pages: usize,
}

/// A PDF the page counter could not read
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SkippedPdf {
    /// File path
    pub path: PathBuf,
    /// Why it was skipped
    pub reason: String,
}

/// Result of counting pages in a directory
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PageCountReport {
    /// Sum of pages across readable PDFs
    pub total: usize,
    /// Per-file counts for readable PDFs
    pub files: Vec<PdfPageCount>,
    /// Unreadable PDFs
    pub skipped: Vec<SkippedPdf>,
}
