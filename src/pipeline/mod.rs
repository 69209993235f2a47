//! Sequential batch driver: list pages → detail pages → PDF downloads.

use crate::config::Config;
use crate::downloader::DownloadManager;
use crate::error::{Error, Result};
use crate::fetcher::ReportClient;
use crate::types::{BatchSummary, PageFailure, RecordOutcome, RecordReport, ReportRecord};

/// Runs a full fetch over the configured page range
///
/// Everything happens in order on the calling task: one list page, then each
/// of its records (detail lookup, then download), then the next page.
pub struct ReportPipeline {
    client: ReportClient,
    downloader: DownloadManager,
}

impl ReportPipeline {
    /// Build the client and download manager from `config`
    ///
    /// # Errors
    /// Returns `Error::Config` when the configuration does not validate.
    pub fn new(config: Config) -> Result<Self> {
        let client = ReportClient::new(config)?;
        let downloader = DownloadManager::from_config(client.http().clone(), client.config());
        Ok(Self::from_parts(client, downloader))
    }

    /// Assemble a pipeline from an existing client and download manager
    pub fn from_parts(client: ReportClient, downloader: DownloadManager) -> Self {
        Self { client, downloader }
    }

    /// The configuration the pipeline runs with
    pub fn config(&self) -> &Config {
        self.client.config()
    }

    /// Process every page in `start_page ..= start_page + pages - 1`
    ///
    /// The run:
    /// 1. Fetches each list page in turn
    /// 2. Processes its records in list order until `limit` records were handled
    /// 3. Stops early on an empty page or once the server's `TotalPage` is reached
    ///
    /// Record-level problems never stop the run; they end up in the summary.
    /// A failed list page is recorded and the next page is tried.
    ///
    /// # Errors
    /// Returns `Error::Auth` when the list endpoint rejects the session; every
    /// later request would fail the same way.
    pub async fn run(&self) -> Result<BatchSummary> {
        let query = &self.config().query;
        let first = query.start_page;
        let last = first.saturating_add(query.pages.saturating_sub(1));
        let limit = query.limit;

        tracing::info!(
            industry_code = %query.industry_code,
            first_page = first,
            last_page = last,
            limit = ?limit,
            "Starting report fetch"
        );

        let mut summary = BatchSummary::default();

        for page_no in first..=last {
            if limit.is_some_and(|max| summary.records.len() >= max) {
                tracing::info!(page_no, "Record limit reached");
                break;
            }

            let page = match self
                .client
                .fetch_reports(&query.industry_code, page_no, query.page_size)
                .await
            {
                Ok(page) => page,
                Err(e @ Error::Auth { .. }) => {
                    tracing::error!(page_no, error = %e, "Provider rejected the session, aborting");
                    return Err(e);
                }
                Err(e) => {
                    tracing::warn!(page_no, error = %e, "Failed to fetch report list page");
                    summary.failed_pages.push(PageFailure {
                        page_no,
                        code: e.error_code().to_string(),
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            if page.records.is_empty() {
                tracing::info!(page_no, "Empty page, no more reports");
                break;
            }

            tracing::info!(
                page_no,
                records = page.records.len(),
                hits = ?page.hits,
                "Processing report page"
            );

            for record in &page.records {
                if limit.is_some_and(|max| summary.records.len() >= max) {
                    break;
                }
                let report = self.process_record(page_no, record).await;
                summary.records.push(report);
            }

            if page.total_pages.is_some_and(|total| page_no >= total) {
                tracing::info!(page_no, "Reached last page reported by server");
                break;
            }
        }

        tracing::info!(
            downloaded = summary.downloaded(),
            no_pdf = summary.no_pdf(),
            skipped = summary.skipped(),
            failed = summary.failed(),
            failed_pages = summary.failed_pages.len(),
            "Report fetch finished"
        );

        Ok(summary)
    }

    /// Resolve and download a single record
    ///
    /// Never fails: every problem is folded into the returned outcome.
    pub async fn process_record(&self, page_no: u32, record: &ReportRecord) -> RecordReport {
        let title = record.display_title();
        let outcome = self.record_outcome(record, &title).await;
        RecordReport {
            page_no,
            info_code: record.info_code.clone(),
            title,
            outcome,
        }
    }

    async fn record_outcome(&self, record: &ReportRecord, title: &str) -> RecordOutcome {
        let info_code = match record.require_info_code() {
            Ok(code) => code,
            Err(e) => {
                tracing::warn!(title, error = %e, "Skipping record without infoCode");
                return RecordOutcome::Skipped {
                    reason: e.to_string(),
                };
            }
        };

        tracing::info!(info_code, title, "Processing report");

        let pdf_url = match self.client.resolve_pdf_link(info_code).await {
            Ok(Some(url)) => url,
            Ok(None) => {
                tracing::warn!(info_code, "No PDF link on detail page");
                return RecordOutcome::NoPdf;
            }
            Err(e) => {
                tracing::warn!(info_code, error = %e, "Failed to resolve PDF link");
                return RecordOutcome::failed(&e);
            }
        };

        let target = record.download_target(self.downloader.download_dir());
        match self.downloader.download_pdf(pdf_url.as_str(), &target).await {
            Ok(file) => file.into(),
            Err(e) => {
                tracing::error!(info_code, url = %pdf_url, error = %e, "Download failed");
                RecordOutcome::failed(&e)
            }
        }
    }
}
