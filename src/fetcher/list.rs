//! Paginated report list (JSONP)

use super::ReportClient;
use crate::error::{Error, Result};
use crate::jsonp::parse_jsonp;
use crate::types::{ReportPage, ReportRecord};
use chrono::{DateTime, Duration as ChronoDuration, TimeZone};
use rand::Rng;
use reqwest::header::{HeaderMap, REFERER};
use serde_json::Value;
use tracing::{debug, info, warn};

impl ReportClient {
    /// Fetch one page of report records for an industry
    ///
    /// The query covers the trailing `query.window_days` days. There is no
    /// internal retry: a failed request is returned to the caller.
    ///
    /// # Errors
    /// - `Error::Config` for an empty industry code or a zero page number/size
    /// - `Error::Network` / `Error::HttpStatus` for connectivity or status failures
    /// - `Error::Auth` when the provider rejects the session (401/403)
    /// - `Error::Parse` when the body is not a JSONP-wrapped JSON document
    pub async fn fetch_reports(
        &self,
        industry_code: &str,
        page_no: u32,
        page_size: u32,
    ) -> Result<ReportPage> {
        if industry_code.trim().is_empty() {
            return Err(Error::config("query.industry_code", "industry code cannot be empty"));
        }
        if page_no == 0 || page_size == 0 {
            return Err(Error::config(
                "query.page_size",
                "page number and page size must be positive",
            ));
        }

        info!(industry_code, page_no, page_size, "Fetching report list");

        let callback = format!("datatable{}", rand::thread_rng().gen_range(1_000_000..=9_999_999));
        let query = list_query(
            industry_code,
            page_no,
            page_size,
            self.config.query.window_days,
            &chrono::Local::now(),
            &callback,
        )?;

        let mut headers = HeaderMap::new();
        headers.insert(
            REFERER,
            super::header_value(
                "request.referer_template",
                &self.config.request.referer_for(industry_code),
            )?,
        );

        let body = self
            .get_text(
                &self.config.endpoints.list_url,
                &query,
                headers,
                self.config.request.list_timeout,
            )
            .await?;

        let page = parse_report_page(&body, page_no)?;
        debug!(
            page_no,
            records = page.records.len(),
            total_pages = ?page.total_pages,
            "Parsed report list"
        );
        Ok(page)
    }
}

/// Query parameters for one list request
///
/// `now` anchors the `[now - window_days, now]` date window and the
/// millisecond cache-busting timestamp.
///
/// # Errors
/// Returns `Error::Config` when the window reaches outside the representable
/// date range.
pub fn list_query<Tz: TimeZone>(
    industry_code: &str,
    page_no: u32,
    page_size: u32,
    window_days: u32,
    now: &DateTime<Tz>,
    callback: &str,
) -> Result<Vec<(&'static str, String)>>
where
    Tz::Offset: std::fmt::Display,
{
    let begin = ChronoDuration::try_days(i64::from(window_days))
        .and_then(|window| now.clone().checked_sub_signed(window))
        .ok_or_else(|| {
            Error::config(
                "query.window_days",
                format!("{window_days} days reaches outside the supported date range"),
            )
        })?;

    Ok(vec![
        ("cb", callback.to_string()),
        ("industryCode", industry_code.to_string()),
        ("pageSize", page_size.to_string()),
        ("industry", "*".to_string()),
        ("rating", "*".to_string()),
        ("ratingChange", "*".to_string()),
        ("beginTime", begin.format("%Y-%m-%d").to_string()),
        ("endTime", now.format("%Y-%m-%d").to_string()),
        ("pageNo", page_no.to_string()),
        ("fields", String::new()),
        ("qType", "1".to_string()),
        ("orgCode", String::new()),
        ("rcode", String::new()),
        ("_", now.timestamp_millis().to_string()),
    ])
}

/// Decode a JSONP list body into a page of records
///
/// A missing or non-array `data` field yields an empty page. Elements that are
/// not objects are skipped with a warning.
pub fn parse_report_page(body: &str, page_no: u32) -> Result<ReportPage> {
    let payload = parse_jsonp(body)?;

    let records = match payload.get("data") {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| decode_record(index, item))
            .collect(),
        Some(other) => {
            warn!(page_no, kind = value_kind(other), "List payload 'data' is not an array");
            Vec::new()
        }
        None => {
            warn!(page_no, "List payload has no 'data' field");
            Vec::new()
        }
    };

    Ok(ReportPage {
        page_no,
        records,
        total_pages: payload
            .get("TotalPage")
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok()),
        hits: payload.get("hits").and_then(Value::as_u64),
    })
}

fn decode_record(index: usize, item: &Value) -> Option<ReportRecord> {
    if !item.is_object() {
        warn!(index, kind = value_kind(item), "Skipping non-object list entry");
        return None;
    }
    match serde_json::from_value::<ReportRecord>(item.clone()) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!(index, error = %e, "Skipping malformed list entry");
            None
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
