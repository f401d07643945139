//! Extraction of the FreshMail error payload from transport error text.
//!
//! Error bodies look like `{"errors":[{"code":1304,"message":"..."}]}`, but
//! the transport reports them inside a longer message, e.g.
//! ``Client error: `POST ...` resulted in a `400 Bad Request` response:\n{...}``.
//! Everything from the first `{` onward is taken as the JSON payload.

use serde::Deserialize;
use serde_json::Value;

use super::catalog::ErrorCatalog;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

/// The first error reported by the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorError {
    pub code: Option<i64>,
    pub message: Option<String>,
}

impl VendorError {
    /// Extract the first vendor error embedded in `text`.
    ///
    /// Returns `None` when there is no `{`, the fragment is not valid JSON,
    /// or the `errors` list is empty.
    pub fn extract(text: &str) -> Option<Self> {
        let start = text.find('{')?;
        let body: ErrorBody = serde_json::from_str(text[start..].trim_end()).ok()?;
        let entry = body.errors.into_iter().next()?;

        Some(Self {
            code: entry.code.as_ref().and_then(parse_code),
            message: entry.message,
        })
    }
}

/// The API sends codes as numbers, occasionally as numeric strings.
fn parse_code(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Resolve the code and message to report for a transport error text.
///
/// A known code gets its catalog message; otherwise the vendor message is
/// kept. When nothing can be extracted the code is `None` and the trimmed
/// error text is used as the message.
pub fn resolve(text: &str, catalog: &ErrorCatalog) -> (Option<i64>, String) {
    let Some(vendor) = VendorError::extract(text) else {
        return (None, text.trim().to_string());
    };

    let message = match (vendor.code, vendor.message.as_deref()) {
        (Some(code), Some(message)) => catalog.resolve(code, message).to_string(),
        (Some(code), None) => catalog
            .message(code)
            .map(str::to_string)
            .unwrap_or_else(|| text.trim().to_string()),
        (None, Some(message)) => message.to_string(),
        (None, None) => text.trim().to_string(),
    };

    (vendor.code, message)
}
