//! Request inputs for every DocStash operation.
//!
//! POST operations deserialize these from the JSON body. GET / DELETE / PATCH
//! operations are built from query parameters by the handler. String fields
//! default to empty so that a missing field reaches validation and produces a
//! `"<field> is required"` message instead of a serde error.

use serde::{Deserialize, Serialize};

use crate::types::{CompletedPart, UploadId};

// ---------------------------------------------------------------------------
// Multipart upload protocol
// ---------------------------------------------------------------------------

/// Input for `POST /initiate-multipart-upload`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiateMultipartUploadInput {
    /// Target object key.
    #[serde(default)]
    pub file_name: String,
}

/// Input for `POST /generate-presigned-urls`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePresignedUrlsInput {
    /// Object key the session was opened for.
    #[serde(default)]
    pub file_key: String,
    /// Upload session token.
    #[serde(default)]
    pub file_id: UploadId,
    /// Number of parts to issue URLs for.
    #[serde(default)]
    pub parts: i64,
}

/// Input for `POST /complete-multipart-upload`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteMultipartUploadInput {
    /// Object key the session was opened for.
    #[serde(default)]
    pub file_key: String,
    /// Upload session token.
    #[serde(default)]
    pub file_id: UploadId,
    /// Parts the client uploaded, in any order.
    #[serde(default)]
    pub parts: Vec<CompletedPart>,
}

// ---------------------------------------------------------------------------
// Directory operations
// ---------------------------------------------------------------------------

/// Input for `GET /list-documents`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDocumentsInput {
    /// Key prefix to list under.
    #[serde(default)]
    pub prefix: String,
    /// Delimiter; exactly `"/"` selects folder markers, anything else selects files.
    #[serde(default)]
    pub delimiter: String,
}

/// Input for `DELETE /remove-document`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveDocumentInput {
    /// Key to delete.
    #[serde(default)]
    pub file_key: String,
}

/// Input for `PATCH /rename-document`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameDocumentInput {
    /// Existing key.
    #[serde(default)]
    pub old_file_key: String,
    /// Destination key.
    #[serde(default)]
    pub new_file_key: String,
}

/// Input for `GET /generate-share-url`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateShareUrlInput {
    /// Key to share.
    #[serde(default)]
    pub file_key: String,
    /// Link validity in seconds; `None` when the client omitted it.
    #[serde(default)]
    pub expires_in: Option<i64>,
}
