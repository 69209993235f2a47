//! Error types for report-dl
//!
//! This module provides the error taxonomy for the library:
//! - Transport failures (`Network`, `HttpStatus`) and credential rejection (`Auth`)
//! - Malformed remote content (`Parse`)
//! - Records lacking a required field (`MissingData`)
//! - Download failures that survived every retry attempt (`Download`)
//!
//! Every variant maps to a stable machine-readable code via [`Error::error_code`],
//! which batch summaries use so callers can aggregate failures programmatically.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for report-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for report-dl
///
/// This is the primary error type used throughout the library. Each variant includes
/// contextual information to help diagnose issues.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "query.page_size")
        key: Option<String>,
    },

    /// Network error (connect failure, timeout, body read failure)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Remote answered with a non-success status that is not a credential rejection
    #[error("HTTP {status} from {url}")]
    HttpStatus {
        /// The HTTP status code returned
        status: u16,
        /// The requested URL
        url: String,
    },

    /// Remote rejected the request, usually because the session cookie expired
    #[error("request rejected with HTTP {status} from {url} (session cookie may have expired)")]
    Auth {
        /// The HTTP status code returned (401 or 403)
        status: u16,
        /// The requested URL
        url: String,
    },

    /// Malformed remote content
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A record lacks a field the pipeline requires
    #[error("record '{context}' is missing required field '{field}'")]
    MissingData {
        /// The missing field name as it appears in the remote payload
        field: &'static str,
        /// Something identifying the record (usually its title)
        context: String,
    },

    /// Download-related error
    #[error("download error: {0}")]
    Download(#[from] DownloadError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised while decoding remote payloads
#[derive(Debug, Error)]
pub enum ParseError {
    /// The response body has no balanced `callback(...)` wrapper
    #[error("no JSONP wrapper found in response ({preview})")]
    MissingJsonpWrapper {
        /// Leading part of the offending body, for logging
        preview: String,
    },

    /// The JSONP interior is not valid JSON
    #[error("invalid JSON inside JSONP wrapper: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// A URL taken from remote content could not be parsed
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The raw URL text
        url: String,
        /// Why parsing failed
        reason: String,
    },
}

/// Download-related errors
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Every attempt failed; the last error is kept for reporting
    #[error("giving up on {url} after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        /// The PDF URL
        url: String,
        /// Number of attempts made
        attempts: u32,
        /// Display text of the final attempt's error
        last_error: String,
    },

    /// Target path has no usable parent directory or file name
    #[error("invalid download target {path}: {reason}")]
    InvalidTarget {
        /// The rejected target path
        path: PathBuf,
        /// The reason the path is invalid
        reason: String,
    },
}

impl Error {
    /// Get the machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Network(_) => "network_error",
            Error::HttpStatus { .. } => "http_status",
            Error::Auth { .. } => "auth_error",
            Error::Parse(_) => "parse_error",
            Error::MissingData { .. } => "missing_data",
            Error::Download(e) => match e {
                DownloadError::RetriesExhausted { .. } => "retries_exhausted",
                DownloadError::InvalidTarget { .. } => "invalid_target",
            },
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
        }
    }

    /// Build a configuration error for a specific key
    pub fn config(key: &str, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.to_string()),
        }
    }

    /// Classify a non-success HTTP status into `Auth` or `HttpStatus`
    pub fn from_status(status: reqwest::StatusCode, url: &str) -> Self {
        match status.as_u16() {
            401 | 403 => Error::Auth {
                status: status.as_u16(),
                url: url.to_string(),
            },
            code => Error::HttpStatus {
                status: code,
                url: url.to_string(),
            },
        }
    }

    /// True for failures caused by connectivity or a non-success response
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network(_) | Error::HttpStatus { .. })
    }
}
