//! JSONP unwrapping
//!
//! The list endpoint answers with `callbackName({...})`. Unwrapping happens in
//! two steps that are tested separately: [`extract_jsonp_payload`] finds the
//! text inside the outermost balanced parenthesis pair, and [`parse_jsonp`]
//! parses that text as JSON.

use crate::error::ParseError;
use serde_json::Value;

/// Characters of the body quoted in error messages
const PREVIEW_LEN: usize = 120;

/// Locate the payload inside the outermost balanced `(...)` pair
///
/// Parentheses inside JSON string literals do not count towards the balance,
/// so titles such as `"Outlook (2025)"` are handled. Anything after the closing
/// parenthesis (typically `;`) is ignored.
///
/// # Examples
///
/// ```
/// use report_dl::jsonp::extract_jsonp_payload;
///
/// let body = r#"datatable123({"data": [], "note": "a)b"});"#;
/// assert_eq!(
///     extract_jsonp_payload(body).unwrap(),
///     r#"{"data": [], "note": "a)b"}"#
/// );
/// ```
pub fn extract_jsonp_payload(body: &str) -> Result<&str, ParseError> {
    let missing = || ParseError::MissingJsonpWrapper {
        preview: preview(body),
    };

    let open = body.find('(').ok_or_else(missing)?;
    let start = open + 1;

    let mut depth = 1usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in body[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&body[start..start + offset]);
                }
            }
            _ => {}
        }
    }

    Err(missing())
}

/// Unwrap a JSONP body and parse the payload as JSON
pub fn parse_jsonp(body: &str) -> Result<Value, ParseError> {
    let payload = extract_jsonp_payload(body)?;
    if payload.trim().is_empty() {
        return Err(ParseError::MissingJsonpWrapper {
            preview: preview(body),
        });
    }
    serde_json::from_str(payload).map_err(ParseError::InvalidJson)
}

fn preview(body: &str) -> String {
    body.chars().take(PREVIEW_LEN).collect()
}
