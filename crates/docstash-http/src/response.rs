//! Response serialization: JSON success envelopes and plain-text errors.

use docstash_model::error::DocStashError;
use docstash_model::output::ApiResponse;

use crate::body::DocStashResponseBody;

/// Content type for success envelopes.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Content type for error bodies.
pub const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Build a 200 response wrapping `payload` in the `{status, payload}` envelope.
///
/// # Errors
///
/// Returns an internal error if the payload cannot be serialized.
pub fn json_response<T: serde::Serialize>(
    payload: T,
) -> Result<http::Response<DocStashResponseBody>, DocStashError> {
    let json = serde_json::to_vec(&ApiResponse::ok(payload)).map_err(|e| {
        DocStashError::internal_error(format!("Failed to serialize response: {e}")).with_source(e)
    })?;

    Ok(http::Response::builder()
        .status(http::StatusCode::OK)
        .header(http::header::CONTENT_TYPE, JSON_CONTENT_TYPE)
        .body(DocStashResponseBody::from_json(json))
        .expect("valid JSON response"))
}

/// Convert a `DocStashError` into a plain-text HTTP error response.
#[must_use]
pub fn error_to_response(
    error: &DocStashError,
    request_id: &str,
) -> http::Response<DocStashResponseBody> {
    http::Response::builder()
        .status(error.status_code)
        .header(http::header::CONTENT_TYPE, TEXT_CONTENT_TYPE)
        .header("x-request-id", request_id)
        .body(DocStashResponseBody::from_string(error.message.clone()))
        .expect("valid error response")
}
