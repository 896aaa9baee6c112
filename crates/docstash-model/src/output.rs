//! Response payloads and the success envelope.

use serde::{Deserialize, Serialize};

use crate::types::UploadId;

/// Uniform success envelope: `{"status": 200, "payload": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// HTTP status mirrored into the body.
    pub status: u16,
    /// Operation-specific payload.
    pub payload: T,
}

impl<T> ApiResponse<T> {
    /// Wrap a payload in a 200 envelope.
    #[must_use]
    pub fn ok(payload: T) -> Self {
        Self {
            status: http::StatusCode::OK.as_u16(),
            payload,
        }
    }
}

/// Payload of `POST /initiate-multipart-upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiateMultipartUploadOutput {
    /// Upload session token to echo back as `fileId`.
    pub id: UploadId,
    /// Object key the session is bound to.
    pub key: String,
}

/// Payload of `POST /complete-multipart-upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleteMultipartUploadOutput {
    /// Final object key.
    pub key: String,
    /// Final object size in bytes.
    pub size: i64,
}
