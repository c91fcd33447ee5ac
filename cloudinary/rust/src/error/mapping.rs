//! Mapping from non-2xx Cloudinary responses to [`ApiError`].

use super::ApiError;
use serde::Deserialize;

/// Header Cloudinary uses to repeat the error message.
pub const CLD_ERROR_HEADER: &str = "x-cld-error";

/// Error body shape: `{"error": {"message": "..."}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct CloudinaryErrorBody {
    /// Error details.
    pub error: CloudinaryErrorDetail,
}

/// Inner error object.
#[derive(Debug, Clone, Deserialize)]
pub struct CloudinaryErrorDetail {
    /// Human-readable message.
    pub message: String,
}

/// Build an [`ApiError`] from a failed response.
///
/// The body is kept as JSON when it parses, or as a JSON string otherwise.
/// The message prefers the body, then the `X-Cld-Error` header, then the
/// raw body text.
pub fn map_api_error(status: u16, cld_error_header: Option<&str>, body: &[u8]) -> ApiError {
    let json = serde_json::from_slice::<serde_json::Value>(body)
        .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(body).into_owned()));

    let message = serde_json::from_value::<CloudinaryErrorBody>(json.clone())
        .ok()
        .map(|b| b.error.message)
        .or_else(|| cld_error_header.map(String::from))
        .unwrap_or_else(|| {
            let text = String::from_utf8_lossy(body);
            if text.is_empty() {
                format!("HTTP {}", status)
            } else {
                text.into_owned()
            }
        });

    ApiError {
        status,
        message,
        body: json,
    }
}
