//! Object storage seam.
//!
//! Every bucket interaction DocStash performs goes through [`ObjectBackend`].
//! Production uses [`S3Backend`]; unit tests substitute an in-memory recorder.

mod s3;

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;

use docstash_model::types::{CompletedPart, ObjectEntry, UploadId};

pub use s3::S3Backend;

/// Failure reported by the object store.
///
/// Messages are kept verbatim so they can be relayed to clients unchanged.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BackendError {
    /// The store rejected or failed the call.
    #[error("{message}")]
    Service {
        /// Store operation that failed (e.g. `CopyObject`).
        operation: &'static str,
        /// Message as reported by the store.
        message: String,
    },

    /// A URL could not be signed.
    #[error("failed to presign {operation}: {message}")]
    Presign {
        /// Operation being signed.
        operation: &'static str,
        /// Signing failure detail.
        message: String,
    },

    /// The store answered without a field DocStash depends on.
    #[error("{operation} response is missing {field}")]
    MissingField {
        /// Store operation.
        operation: &'static str,
        /// Missing response field.
        field: &'static str,
    },
}

impl BackendError {
    /// Store operation associated with this failure.
    #[must_use]
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Service { operation, .. }
            | Self::Presign { operation, .. }
            | Self::MissingField { operation, .. } => operation,
        }
    }
}

/// A freshly opened multipart upload session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSession {
    /// Store-issued session token.
    pub upload_id: UploadId,
    /// Key the session is bound to.
    pub key: String,
}

/// Operations DocStash needs from an object store bound to a single bucket.
#[async_trait]
pub trait ObjectBackend: Send + Sync + Debug + 'static {
    /// Open a multipart upload session for `key`.
    async fn create_multipart_upload(&self, key: &str) -> Result<UploadSession, BackendError>;

    /// Sign a part upload URL. Signing is local and does not contact the store.
    async fn presign_upload_part(
        &self,
        key: &str,
        upload_id: &UploadId,
        part_number: i32,
        expires_in: Duration,
    ) -> Result<String, BackendError>;

    /// Assemble the uploaded parts. `parts` is ascending by part number.
    async fn complete_multipart_upload(
        &self,
        key: &str,
        upload_id: &UploadId,
        parts: &[CompletedPart],
    ) -> Result<(), BackendError>;

    /// Size of an existing object in bytes.
    async fn object_size(&self, key: &str) -> Result<i64, BackendError>;

    /// Every object under `prefix`, following pagination to the end.
    async fn list_objects(
        &self,
        prefix: &str,
        delimiter: &str,
    ) -> Result<Vec<ObjectEntry>, BackendError>;

    /// Delete `key`. Deleting a missing key succeeds.
    async fn delete_object(&self, key: &str) -> Result<(), BackendError>;

    /// Server-side copy of `source_key` to `dest_key` within the bucket.
    async fn copy_object(&self, source_key: &str, dest_key: &str) -> Result<(), BackendError>;

    /// Sign a download URL that serves `key` as an attachment.
    async fn presign_download(
        &self,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, BackendError>;
}
