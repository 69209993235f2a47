//! Mock report provider built on wiremock

use super::fixtures::{detail_html, list_body};
use report_dl::{Config, RetryConfig};
use serde_json::Value;
use std::path::Path;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const LIST_PATH: &str = "/report/list";
pub const DETAIL_PATH: &str = "/report/zw_industry.jshtml";

/// A wiremock server standing in for the list API, detail pages and PDF host
pub struct MockProvider {
    pub server: MockServer,
}

impl MockProvider {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Config pointing every endpoint at this provider, with zero-delay retries
    pub fn config(&self, download_dir: &Path) -> Config {
        let base = self.server.uri();
        let mut config = Config::default();
        config.endpoints.list_url = format!("{base}{LIST_PATH}");
        config.endpoints.detail_url_template = format!("{base}{DETAIL_PATH}?infocode={{info_code}}");
        config.download.download_dir = download_dir.to_path_buf();
        config.retry = RetryConfig::immediate(3);
        config
    }

    pub async fn list_page(&self, page_no: u32, records: Vec<Value>, total_pages: u32) {
        Mock::given(method("GET"))
            .and(path(LIST_PATH))
            .and(query_param("pageNo", page_no.to_string()))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/javascript")
                    .set_body_string(list_body(records, total_pages)),
            )
            .mount(&self.server)
            .await;
    }

    pub async fn list_status(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path(LIST_PATH))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Detail page for `info_code`, linking to `pdf_path` when given
    pub async fn detail(&self, info_code: &str, pdf_path: Option<&str>) {
        Mock::given(method("GET"))
            .and(path(DETAIL_PATH))
            .and(query_param("infocode", info_code))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html; charset=utf-8")
                    .set_body_string(detail_html(pdf_path)),
            )
            .mount(&self.server)
            .await;
    }

    pub async fn pdf(&self, pdf_path: &str, body: Vec<u8>) {
        Mock::given(method("GET"))
            .and(path(pdf_path))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/pdf")
                    .set_body_bytes(body),
            )
            .mount(&self.server)
            .await;
    }

    /// PDF that fails `failures` times with 503 before succeeding
    pub async fn flaky_pdf(&self, pdf_path: &str, failures: u64, body: Vec<u8>) {
        Mock::given(method("GET"))
            .and(path(pdf_path))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(failures)
            .mount(&self.server)
            .await;
        self.pdf(pdf_path, body).await;
    }
}
