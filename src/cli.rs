use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use report_dl::Config;

/// Download industry research report PDFs and count their pages.
#[derive(Debug, Parser)]
#[command(name = "report-dl", about, version)]
pub struct Cli {
    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fetch report pages and download their PDFs
    Fetch(FetchArgs),

    /// Sum the page counts of the PDFs in a directory
    CountPages {
        /// Directory to scan. Default: "reports"
        #[arg(value_name = "DIR", env = "REPORT_DL_COUNT_DIR")]
        dir: Option<PathBuf>,

        /// JSON configuration file
        #[arg(long, value_name = "FILE", env = "REPORT_DL_CONFIG")]
        config: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Options for `fetch`. Unset flags keep the value from the config file or
/// the built-in default.
#[derive(Debug, Args)]
pub struct FetchArgs {
    /// JSON configuration file; flags override its values
    #[arg(long, value_name = "FILE", env = "REPORT_DL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Industry code to query. Default: 738
    #[arg(long, env = "REPORT_DL_INDUSTRY_CODE")]
    pub industry_code: Option<String>,

    /// First page to fetch (1-based). Default: 1
    #[arg(long, env = "REPORT_DL_START_PAGE")]
    pub start_page: Option<u32>,

    /// Number of pages to fetch. Default: 1
    #[arg(long, env = "REPORT_DL_PAGES")]
    pub pages: Option<u32>,

    /// Records per page. Default: 50
    #[arg(long, env = "REPORT_DL_PAGE_SIZE")]
    pub page_size: Option<u32>,

    /// Stop after this many records. Default: no limit
    #[arg(long, env = "REPORT_DL_LIMIT")]
    pub limit: Option<usize>,

    /// Directory PDFs are written to. Default: "reports_pdf"
    #[arg(long, value_name = "DIR", env = "REPORT_DL_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Total download attempts per PDF. Default: 3
    #[arg(long, env = "REPORT_DL_MAX_ATTEMPTS")]
    pub max_attempts: Option<u32>,

    /// Seconds to wait between download attempts. Default: 5
    #[arg(long, env = "REPORT_DL_RETRY_DELAY_SECS")]
    pub retry_delay_secs: Option<u64>,

    /// Per-attempt download timeout in seconds. Default: 60
    #[arg(long, env = "REPORT_DL_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Days covered by the list query, ending today. Default: 730
    #[arg(long, env = "REPORT_DL_WINDOW_DAYS")]
    pub window_days: Option<u32>,

    /// Cookie header sent with every request
    #[arg(long, env = "REPORT_DL_COOKIE", hide_env_values = true)]
    pub cookie: Option<String>,

    /// Print the batch summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl FetchArgs {
    /// Overlay the flags that were given onto `config`
    pub fn apply(&self, config: &mut Config) {
        if let Some(code) = &self.industry_code {
            config.query.industry_code = code.clone();
        }
        if let Some(start_page) = self.start_page {
            config.query.start_page = start_page;
        }
        if let Some(pages) = self.pages {
            config.query.pages = pages;
        }
        if let Some(page_size) = self.page_size {
            config.query.page_size = page_size;
        }
        if self.limit.is_some() {
            config.query.limit = self.limit;
        }
        if let Some(window_days) = self.window_days {
            config.query.window_days = window_days;
        }
        if let Some(dir) = &self.output_dir {
            config.download.download_dir = dir.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.download.attempt_timeout = Duration::from_secs(secs);
        }
        if let Some(max_attempts) = self.max_attempts {
            config.retry.max_attempts = max_attempts;
        }
        if let Some(secs) = self.retry_delay_secs {
            config.retry.initial_delay = Duration::from_secs(secs);
        }
        if self.cookie.is_some() {
            config.request.cookie = self.cookie.clone();
        }
    }
}
