//! Configuration types for report-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::Path, path::PathBuf, time::Duration};

/// Which reports to fetch and how many pages of them
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Industry code the list query is filtered by (default: "738")
    #[serde(default = "default_industry_code")]
    pub industry_code: String,

    /// Records per list page (default: 50)
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// First page to fetch, 1-based (default: 1)
    #[serde(default = "default_start_page")]
    pub start_page: u32,

    /// Number of consecutive pages to fetch (default: 1)
    #[serde(default = "default_pages")]
    pub pages: u32,

    /// Cap on records processed across all pages (None = no cap)
    #[serde(default)]
    pub limit: Option<usize>,

    /// Length of the trailing publish-date window in days (default: 730)
    #[serde(default = "default_window_days")]
    pub window_days: u32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            industry_code: default_industry_code(),
            page_size: default_page_size(),
            start_page: default_start_page(),
            pages: default_pages(),
            limit: None,
            window_days: default_window_days(),
        }
    }
}

/// Remote endpoints and the detail-page link selector
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// JSONP list endpoint
    #[serde(default = "default_list_url")]
    pub list_url: String,

    /// Detail page URL; `{info_code}` is replaced with the URL-encoded record code
    #[serde(default = "default_detail_url_template")]
    pub detail_url_template: String,

    /// CSS selector for the PDF anchor on a detail page
    #[serde(default = "default_pdf_link_selector")]
    pub pdf_link_selector: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            list_url: default_list_url(),
            detail_url_template: default_detail_url_template(),
            pdf_link_selector: default_pdf_link_selector(),
        }
    }
}

/// Identifying headers and timeouts for list and detail requests
///
/// The provider rejects requests that do not look like they come from a browser,
/// so every request carries these headers. The session cookie is never embedded;
/// supply it through configuration or the `REPORT_DL_COOKIE` environment variable.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RequestConfig {
    /// User-Agent header
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Accept header
    #[serde(default = "default_accept")]
    pub accept: String,

    /// Accept-Language header
    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    /// Referer header; `{industry_code}` is replaced with the query's industry code
    #[serde(default = "default_referer_template")]
    pub referer_template: String,

    /// Session cookie sent verbatim in the Cookie header
    #[serde(default)]
    pub cookie: Option<String>,

    /// Additional headers sent with every request
    #[serde(default)]
    pub extra_headers: BTreeMap<String, String>,

    /// Timeout for the list request (default: 10 seconds)
    #[serde(default = "default_list_timeout", with = "duration_serde")]
    pub list_timeout: Duration,

    /// Timeout for detail page requests (default: 20 seconds, minimum 20)
    #[serde(default = "default_detail_timeout", with = "duration_serde")]
    pub detail_timeout: Duration,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            accept: default_accept(),
            accept_language: default_accept_language(),
            referer_template: default_referer_template(),
            cookie: None,
            extra_headers: BTreeMap::new(),
            list_timeout: default_list_timeout(),
            detail_timeout: default_detail_timeout(),
        }
    }
}

impl RequestConfig {
    /// Referer for a given industry code
    pub fn referer_for(&self, industry_code: &str) -> String {
        self.referer_template
            .replace("{industry_code}", industry_code)
    }
}

/// Where and how PDFs are written
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Download directory (default: "reports_pdf")
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Write buffer size in bytes (default: 8192)
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Timeout for one download attempt, body included (default: 60 seconds)
    #[serde(default = "default_attempt_timeout", with = "duration_serde")]
    pub attempt_timeout: Duration,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            chunk_size: default_chunk_size(),
            attempt_timeout: default_attempt_timeout(),
        }
    }
}

/// Retry configuration for PDF downloads
///
/// The default is the fixed policy of three attempts five seconds apart.
/// Setting `backoff_multiplier` above 1.0 turns it into exponential backoff
/// capped at `max_delay`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total number of attempts, the first one included (default: 3)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry (default: 5 seconds)
    #[serde(default = "default_retry_delay", with = "duration_serde")]
    pub initial_delay: Duration,

    /// Maximum delay between retries (default: 60 seconds)
    #[serde(default = "default_max_delay", with = "duration_serde")]
    pub max_delay: Duration,

    /// Multiplier applied to the delay after each retry (default: 1.0, fixed delay)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Add random jitter to delays (default: false)
    #[serde(default)]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay: default_retry_delay(),
            max_delay: default_max_delay(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: false,
        }
    }
}

impl RetryConfig {
    /// A policy with `max_attempts` attempts and no waiting between them
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
            jitter: false,
        }
    }
}

/// Main configuration for the report pipeline and page counter
///
/// Fields are organized into logical sub-configs:
/// - [`query`](QueryConfig) — industry code, pagination window, record limit
/// - [`endpoints`](EndpointConfig) — list/detail URLs and the PDF link selector
/// - [`request`](RequestConfig) — identifying headers, cookie, timeouts
/// - [`download`](DownloadConfig) — output directory, buffering, attempt timeout
/// - [`retry`](RetryConfig) — download retry policy
///
/// The value is immutable once handed to a component.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Query settings
    #[serde(default)]
    pub query: QueryConfig,

    /// Remote endpoints
    #[serde(default)]
    pub endpoints: EndpointConfig,

    /// Outbound request settings
    #[serde(default)]
    pub request: RequestConfig,

    /// Download settings
    #[serde(default)]
    pub download: DownloadConfig,

    /// Download retry policy
    #[serde(default)]
    pub retry: RetryConfig,

    /// Directory scanned by the page counter (default: "reports")
    #[serde(default = "default_count_dir")]
    pub count_dir: PathBuf,
}

impl Config {
    /// Load a JSON configuration file; missing fields take their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(
                "config_file",
                format!("failed to read '{}': {}", path.display(), e),
            )
        })?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Check the invariants every component relies on
    pub fn validate(&self) -> Result<()> {
        if self.query.industry_code.trim().is_empty() {
            return Err(Error::config(
                "query.industry_code",
                "industry code cannot be empty",
            ));
        }
        if self.query.page_size == 0 {
            return Err(Error::config("query.page_size", "must be at least 1"));
        }
        if self.query.start_page == 0 {
            return Err(Error::config("query.start_page", "pages are 1-based"));
        }
        if self.query.pages == 0 {
            return Err(Error::config("query.pages", "must be at least 1"));
        }
        if self.query.window_days > MAX_WINDOW_DAYS {
            return Err(Error::config(
                "query.window_days",
                format!("must be at most {MAX_WINDOW_DAYS} days"),
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(Error::config("retry.max_attempts", "must be at least 1"));
        }
        if self.request.detail_timeout < MIN_DETAIL_TIMEOUT {
            return Err(Error::config(
                "request.detail_timeout",
                format!(
                    "must be at least {} seconds",
                    MIN_DETAIL_TIMEOUT.as_secs()
                ),
            ));
        }
        if self.download.chunk_size == 0 {
            return Err(Error::config("download.chunk_size", "must be at least 1"));
        }
        if !self.endpoints.detail_url_template.contains("{info_code}") {
            return Err(Error::config(
                "endpoints.detail_url_template",
                "must contain the {info_code} placeholder",
            ));
        }
        url::Url::parse(&self.endpoints.list_url)
            .map_err(|e| Error::config("endpoints.list_url", e.to_string()))?;
        scraper::Selector::parse(&self.endpoints.pdf_link_selector).map_err(|e| {
            Error::config(
                "endpoints.pdf_link_selector",
                format!("invalid CSS selector: {e}"),
            )
        })?;
        Ok(())
    }
}

/// Upper bound for the list query's publish-date window (about a century)
pub const MAX_WINDOW_DAYS: u32 = 36_500;

/// Detail pages are slower than the list API; shorter timeouts cut them off
pub const MIN_DETAIL_TIMEOUT: Duration = Duration::from_secs(20);

fn default_industry_code() -> String {
    "738".to_string()
}

fn default_page_size() -> u32 {
    50
}

fn default_start_page() -> u32 {
    1
}

fn default_pages() -> u32 {
    1
}

fn default_window_days() -> u32 {
    730
}

fn default_list_url() -> String {
    "https://reportapi.eastmoney.com/report/list".to_string()
}

fn default_detail_url_template() -> String {
    "https://data.eastmoney.com/report/zw_industry.jshtml?infocode={info_code}".to_string()
}

fn default_pdf_link_selector() -> String {
    ".to-link a.pdf-link".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/139.0.0.0 Safari/537.36".to_string()
}

fn default_accept() -> String {
    "*/*".to_string()
}

fn default_accept_language() -> String {
    "zh,zh-CN;q=0.9".to_string()
}

fn default_referer_template() -> String {
    "https://data.eastmoney.com/report/industry.jshtml?hyid={industry_code}".to_string()
}

fn default_list_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_detail_timeout() -> Duration {
    Duration::from_secs(20)
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("reports_pdf")
}

fn default_chunk_size() -> usize {
    8192
}

fn default_attempt_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_delay() -> Duration {
    Duration::from_secs(5)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(60)
}

fn default_backoff_multiplier() -> f64 {
    1.0
}

fn default_count_dir() -> PathBuf {
    PathBuf::from("reports")
}

// Duration serialization helper (whole seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_values() {
        let config = Config::default();
        assert_eq!(config.query.industry_code, "738");
        assert_eq!(config.query.page_size, 50);
        assert_eq!(config.query.window_days, 730);
        assert_eq!(config.download.download_dir, PathBuf::from("reports_pdf"));
        assert_eq!(config.count_dir, PathBuf::from("reports"));
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.initial_delay, Duration::from_secs(5));
        assert_eq!(config.download.attempt_timeout, Duration::from_secs(60));
        assert_eq!(config.request.detail_timeout, Duration::from_secs(20));
        assert!(config.request.cookie.is_none());
        config.validate().expect("default config must be valid");
    }

    #[test]
    fn empty_json_object_yields_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.query.page_size, 50);
        assert_eq!(config.endpoints.pdf_link_selector, ".to-link a.pdf-link");
    }

    #[test]
    fn duration_serde_serializes_as_seconds() {
        let retry = RetryConfig {
            initial_delay: Duration::from_secs(7),
            ..RetryConfig::default()
        };
        let json = serde_json::to_value(&retry).unwrap();
        assert_eq!(json["initial_delay"], 7);
        assert_eq!(json["max_delay"], 60);
    }

    #[test]
    fn duration_serde_rejects_string_instead_of_integer() {
        let result = serde_json::from_str::<RetryConfig>(r#"{"initial_delay": "5s"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn partial_nested_config_keeps_other_defaults() {
        let json = r#"{
            "query": { "industry_code": "1036", "pages": 3 },
            "request": { "cookie": "nid=abc" }
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.query.industry_code, "1036");
        assert_eq!(config.query.pages, 3);
        assert_eq!(config.query.page_size, 50);
        assert_eq!(config.request.cookie.as_deref(), Some("nid=abc"));
        assert_eq!(config.request.accept, "*/*");
    }

    #[test]
    fn referer_substitutes_industry_code() {
        let request = RequestConfig::default();
        assert_eq!(
            request.referer_for("738"),
            "https://data.eastmoney.com/report/industry.jshtml?hyid=738"
        );
    }

    fn expect_config_key(config: &Config, expected_key: &str) {
        match config.validate() {
            Err(Error::Config { key, .. }) => assert_eq!(key.as_deref(), Some(expected_key)),
            other => panic!("expected config error for {expected_key}, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_empty_industry_code() {
        let mut config = Config::default();
        config.query.industry_code = "  ".into();
        expect_config_key(&config, "query.industry_code");
    }

    #[test]
    fn validate_rejects_zero_pagination() {
        let mut config = Config::default();
        config.query.page_size = 0;
        expect_config_key(&config, "query.page_size");

        let mut config = Config::default();
        config.query.start_page = 0;
        expect_config_key(&config, "query.start_page");

        let mut config = Config::default();
        config.query.pages = 0;
        expect_config_key(&config, "query.pages");
    }

    #[test]
    fn validate_bounds_window_days() {
        let mut config = Config::default();
        config.query.window_days = MAX_WINDOW_DAYS;
        config.validate().unwrap();

        config.query.window_days = 200_000_000;
        expect_config_key(&config, "query.window_days");
    }

    #[test]
    fn validate_rejects_zero_attempts() {
        let mut config = Config::default();
        config.retry.max_attempts = 0;
        expect_config_key(&config, "retry.max_attempts");
    }

    #[test]
    fn validate_rejects_short_detail_timeout() {
        let mut config = Config::default();
        config.request.detail_timeout = Duration::from_secs(5);
        expect_config_key(&config, "request.detail_timeout");
    }

    #[test]
    fn validate_rejects_bad_selector_and_template() {
        let mut config = Config::default();
        config.endpoints.pdf_link_selector = "a[".into();
        expect_config_key(&config, "endpoints.pdf_link_selector");

        let mut config = Config::default();
        config.endpoints.detail_url_template = "https://example.com/detail".into();
        expect_config_key(&config, "endpoints.detail_url_template");

        let mut config = Config::default();
        config.endpoints.list_url = "not a url".into();
        expect_config_key(&config, "endpoints.list_url");
    }

    #[test]
    fn from_file_reads_json_and_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"count_dir": "archive"}"#).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.count_dir, PathBuf::from("archive"));

        let missing = Config::from_file(&dir.path().join("nope.json"));
        assert!(matches!(missing, Err(Error::Config { .. })));
    }

    #[test]
    fn immediate_retry_policy_has_no_delay() {
        let retry = RetryConfig::immediate(4);
        assert_eq!(retry.max_attempts, 4);
        assert_eq!(retry.initial_delay, Duration::ZERO);
        assert_eq!(retry.max_delay, Duration::ZERO);
    }
}
