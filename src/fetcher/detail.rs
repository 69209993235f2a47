//! Detail page lookup: find the PDF link for one report

use super::ReportClient;
use crate::error::{Error, ParseError, Result};
use reqwest::header::HeaderMap;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

impl ReportClient {
    /// URL of the detail page for `info_code`
    pub fn detail_url(&self, info_code: &str) -> Result<Url> {
        let raw = self
            .config
            .endpoints
            .detail_url_template
            .replace("{info_code}", &urlencoding::encode(info_code));
        Url::parse(&raw).map_err(|e| {
            Error::Parse(ParseError::InvalidUrl {
                url: raw.clone(),
                reason: e.to_string(),
            })
        })
    }

    /// Resolve the PDF link of a report from its detail page
    ///
    /// Returns `Ok(None)` when the page loads but carries no PDF anchor; the
    /// report simply has no downloadable PDF.
    ///
    /// # Errors
    /// - `Error::MissingData` for an empty `info_code`
    /// - `Error::Network` / `Error::HttpStatus` / `Error::Auth` when the page cannot be fetched
    /// - `Error::Parse` when the anchor's `href` is not a usable URL
    pub async fn resolve_pdf_link(&self, info_code: &str) -> Result<Option<Url>> {
        if info_code.trim().is_empty() {
            return Err(Error::MissingData {
                field: "infoCode",
                context: "detail lookup".to_string(),
            });
        }

        let page_url = self.detail_url(info_code)?;
        let html = self
            .get_text(
                page_url.as_str(),
                &[],
                HeaderMap::new(),
                self.config.request.detail_timeout,
            )
            .await?;

        let link = extract_pdf_link(&html, &self.pdf_link_selector, &page_url)?;
        debug!(info_code, found = link.is_some(), "Parsed detail page");
        Ok(link)
    }
}

/// Find the first anchor matching `selector` and resolve its `href` against `base`
///
/// An anchor without an `href`, or with an empty one, counts as no link.
pub fn extract_pdf_link(html: &str, selector: &Selector, base: &Url) -> Result<Option<Url>> {
    let document = Html::parse_document(html);

    let Some(href) = document
        .select(selector)
        .next()
        .and_then(|anchor| anchor.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
    else {
        return Ok(None);
    };

    base.join(href).map(Some).map_err(|e| {
        Error::Parse(ParseError::InvalidUrl {
            url: href.to_string(),
            reason: e.to_string(),
        })
    })
}
