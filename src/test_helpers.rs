//! Shared fixtures for unit tests that talk to a mock provider

use crate::config::{Config, RetryConfig};
use serde_json::{Value, json};
use std::path::Path;

/// Path the mock list endpoint is mounted on
pub const LIST_PATH: &str = "/report/list";

/// Path the mock detail pages are mounted on
pub const DETAIL_PATH: &str = "/report/zw_industry.jshtml";

/// Config whose endpoints point at `base_uri`, writing into `download_dir`,
/// with a zero-delay retry policy
pub fn mock_config(base_uri: &str, download_dir: &Path) -> Config {
    let mut config = Config::default();
    config.endpoints.list_url = format!("{base_uri}{LIST_PATH}");
    config.endpoints.detail_url_template = format!("{base_uri}{DETAIL_PATH}?infocode={{info_code}}");
    config.download.download_dir = download_dir.to_path_buf();
    config.retry = RetryConfig::immediate(3);
    config
}

/// A record as the list endpoint returns it
pub fn record_json(info_code: &str, title: &str, date: &str) -> Value {
    json!({
        "infoCode": info_code,
        "title": title,
        "publishDate": format!("{date}T00:00:00.000"),
        "orgSName": "Example Securities",
    })
}

/// JSONP list body wrapping `records`
pub fn list_body(records: Vec<Value>, total_pages: u32) -> String {
    let hits = records.len();
    let payload = json!({
        "hits": hits,
        "size": hits,
        "data": records,
        "TotalPage": total_pages,
        "pageNo": 1,
    });
    format!("datatable1234567({payload});")
}

/// Detail page markup; `href` of `None` renders a page without a PDF anchor
pub fn detail_html(href: Option<&str>) -> String {
    let link = match href {
        Some(href) => format!(r#"<span class="to-link"><a class="pdf-link" href="{href}">查看PDF原文</a></span>"#),
        None => r#"<span class="to-link"><a class="other-link" href="/x">原文</a></span>"#.to_string(),
    };
    format!(
        r#"<!DOCTYPE html><html><head><title>report</title></head>
<body><div class="c-infos"><span>2025-09-30</span>{link}</div></body></html>"#
    )
}
