//! Remote lookups: the JSONP report list and HTML detail pages
//!
//! [`ReportClient`] owns one `reqwest::Client` carrying the identifying headers
//! from [`RequestConfig`](crate::config::RequestConfig). The list query lives in
//! [`list`], the detail page lookup in [`detail`].

mod detail;
mod list;

pub use detail::extract_pdf_link;
pub use list::{list_query, parse_report_page};

use crate::config::{Config, RequestConfig};
use crate::error::{Error, Result};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, COOKIE, HeaderMap, HeaderName, HeaderValue, REFERER};
use scraper::Selector;
use std::time::Duration;
use tracing::debug;

/// Client for the list endpoint and detail pages
///
/// Built once from an immutable [`Config`]; it never changes afterwards.
pub struct ReportClient {
    http: reqwest::Client,
    config: Config,
    pdf_link_selector: Selector,
}

impl ReportClient {
    /// Create a client from a validated configuration
    ///
    /// # Errors
    /// Returns `Error::Config` if the configuration is invalid or a header value
    /// cannot be sent, and `Error::Network` if the HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let pdf_link_selector =
            Selector::parse(&config.endpoints.pdf_link_selector).map_err(|e| {
                Error::config("endpoints.pdf_link_selector", format!("invalid CSS selector: {e}"))
            })?;

        let http = build_http_client(&config.request, &config.query.industry_code)?;

        Ok(Self {
            http,
            config,
            pdf_link_selector,
        })
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The underlying HTTP client, shared with the download manager
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// GET a URL and return the body as text
    ///
    /// Non-success statuses become `Auth` (401/403) or `HttpStatus`.
    async fn get_text(
        &self,
        url: &str,
        query: &[(&str, String)],
        headers: HeaderMap,
        timeout: Duration,
    ) -> Result<String> {
        debug!(url, "GET");
        let mut request = self.http.get(url).headers(headers).timeout(timeout);
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::from_status(status, url));
        }

        Ok(response.text().await?)
    }
}

/// Build the HTTP client with the identifying headers every request carries
///
/// The Referer defaults to the one for `industry_code`; list requests for other
/// industries override it per request.
pub fn build_http_client(request: &RequestConfig, industry_code: &str) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, header_value("request.accept", &request.accept)?);
    headers.insert(
        ACCEPT_LANGUAGE,
        header_value("request.accept_language", &request.accept_language)?,
    );
    headers.insert(
        REFERER,
        header_value("request.referer_template", &request.referer_for(industry_code))?,
    );
    if let Some(cookie) = request.cookie.as_deref().filter(|c| !c.is_empty()) {
        let mut value = header_value("request.cookie", cookie)?;
        value.set_sensitive(true);
        headers.insert(COOKIE, value);
    }
    for (name, value) in &request.extra_headers {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            Error::config("request.extra_headers", format!("invalid header name '{name}': {e}"))
        })?;
        headers.insert(name, header_value("request.extra_headers", value)?);
    }

    let client = reqwest::Client::builder()
        .user_agent(request.user_agent.as_str())
        .default_headers(headers)
        .build()?;
    Ok(client)
}

fn header_value(key: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| Error::config(key, format!("invalid header value: {e}")))
}
