//! Streaming PDF download with bounded retry
//!
//! Each attempt streams the response body into `{target}.part` through a
//! buffered writer and renames it onto the target once the body is complete.
//! A failed attempt removes its partial file, so the target path only ever
//! holds a complete download. Two records mapping to the same target
//! overwrite each other; the last successful download wins.

use crate::config::{Config, DownloadConfig, RetryConfig};
use crate::error::{DownloadError, Error, Result};
use crate::retry::{IsRetryable, with_retry};
use crate::types::DownloadedFile;
use crate::utils::partial_path;
use std::path::Path;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, warn};

/// Downloads PDFs to disk, retrying transient failures
pub struct DownloadManager {
    http: reqwest::Client,
    download: DownloadConfig,
    retry: RetryConfig,
}

impl DownloadManager {
    /// Create a download manager with an explicit retry policy
    pub fn new(http: reqwest::Client, download: DownloadConfig, retry: RetryConfig) -> Self {
        Self {
            http,
            download,
            retry,
        }
    }

    /// Create a download manager from the download and retry sections of `config`
    pub fn from_config(http: reqwest::Client, config: &Config) -> Self {
        Self::new(http, config.download.clone(), config.retry.clone())
    }

    /// Directory PDFs are written to
    pub fn download_dir(&self) -> &Path {
        &self.download.download_dir
    }

    /// Download `url` to `target`
    ///
    /// The parent directory is created first (idempotently). Transient
    /// failures are retried according to the retry policy; the attempt count
    /// of the successful attempt is reported in the result.
    ///
    /// # Errors
    /// - `DownloadError::RetriesExhausted` when every attempt failed with a transient error
    /// - the attempt's own error when it fails permanently (e.g. a local I/O error)
    /// - `DownloadError::InvalidTarget` when `target` has no file name
    pub async fn download_pdf(&self, url: &str, target: &Path) -> Result<DownloadedFile> {
        let partial = partial_path(target)?;
        let partial = partial.as_path();

        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let outcome = with_retry(&self.retry, |attempt| {
            self.attempt(url, partial, target, attempt)
        })
        .await;

        match outcome.result {
            Ok(bytes) => {
                info!(
                    path = %target.display(),
                    bytes,
                    attempts = outcome.attempts,
                    "Saved PDF"
                );
                Ok(DownloadedFile {
                    path: target.to_path_buf(),
                    bytes,
                    attempts: outcome.attempts,
                })
            }
            Err(e) if e.is_retryable() => Err(Error::Download(DownloadError::RetriesExhausted {
                url: url.to_string(),
                attempts: outcome.attempts,
                last_error: e.to_string(),
            })),
            Err(e) => Err(e),
        }
    }

    async fn attempt(&self, url: &str, partial: &Path, target: &Path, attempt: u32) -> Result<u64> {
        info!(
            url,
            attempt,
            max_attempts = self.retry.max_attempts,
            "Attempting download"
        );

        let result = match self.stream_to(url, partial).await {
            Ok(bytes) => replace_file(partial, target).await.map(|()| bytes),
            Err(e) => Err(e),
        };

        if result.is_err() {
            remove_partial(partial).await;
        }
        result
    }

    /// Stream the response body into `partial`, returning the byte count
    async fn stream_to(&self, url: &str, partial: &Path) -> Result<u64> {
        let mut response = self
            .http
            .get(url)
            .timeout(self.download.attempt_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let file = tokio::fs::File::create(partial).await?;
        let mut writer = BufWriter::with_capacity(self.download.chunk_size, file);
        let mut bytes = 0u64;

        while let Some(chunk) = response.chunk().await? {
            writer.write_all(&chunk).await?;
            bytes += chunk.len() as u64;
        }

        writer.flush().await?;
        writer.into_inner().sync_all().await?;
        debug!(url, bytes, "Body fully written");
        Ok(bytes)
    }
}

/// Move a finished partial file onto the target, replacing any existing file
async fn replace_file(partial: &Path, target: &Path) -> Result<()> {
    // rename does not replace an existing file on Windows
    #[cfg(windows)]
    if tokio::fs::metadata(target).await.is_ok() {
        tokio::fs::remove_file(target).await?;
    }
    tokio::fs::rename(partial, target).await?;
    Ok(())
}

async fn remove_partial(partial: &Path) {
    match tokio::fs::remove_file(partial).await {
        Ok(()) => debug!(path = %partial.display(), "Removed partial download"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %partial.display(), error = %e, "Failed to remove partial download"),
    }
}
