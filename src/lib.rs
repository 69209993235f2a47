//! # report-dl
//!
//! Batch downloader for industry research report PDFs.
//!
//! ## Overview
//!
//! A run walks a range of pages of a JSONP report list, resolves each
//! report's PDF link from its HTML detail page, and streams the PDF to disk
//! with bounded retry. Processing is strictly sequential. A separate utility
//! sums the page counts of the PDFs in a directory.
//!
//! - [`fetcher`] - list endpoint and detail pages
//! - [`downloader`] - streaming download with retry
//! - [`pipeline`] - the page → record → download driver
//! - [`page_counter`] - directory page totals
//!
//! ## Quick Start
//!
//! ```no_run
//! use report_dl::{Config, ReportPipeline};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::default();
//!     config.query.industry_code = "738".to_string();
//!     config.query.limit = Some(3);
//!
//!     let summary = ReportPipeline::new(config)?.run().await?;
//!     println!("{} downloaded, {} failed", summary.downloaded(), summary.failed());
//!
//!     let pages = report_dl::page_counter::count_pages("reports_pdf".as_ref());
//!     println!("{} pages", pages.total);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Streaming PDF download with retry
pub mod downloader;
/// Error types
pub mod error;
/// Report list and detail page lookups
pub mod fetcher;
/// JSONP unwrapping
pub mod jsonp;
/// PDF page counting
pub mod page_counter;
/// Sequential batch driver
pub mod pipeline;
/// Retry logic with configurable delay
pub mod retry;
/// Core types
pub mod types;
/// Utility functions
pub mod utils;

#[cfg(test)]
mod test_helpers;

// Re-export commonly used types
pub use config::{Config, DownloadConfig, EndpointConfig, QueryConfig, RequestConfig, RetryConfig};
pub use downloader::DownloadManager;
pub use error::{DownloadError, Error, ParseError, Result};
pub use fetcher::ReportClient;
pub use pipeline::ReportPipeline;
pub use types::{
    BatchSummary, DownloadedFile, PageCountReport, PageFailure, RecordOutcome, RecordReport,
    ReportPage, ReportRecord,
};
