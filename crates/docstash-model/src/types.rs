//! Shared value types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque multipart upload identifier minted by the storage backend.
///
/// DocStash never parses or fabricates one; it only carries values the
/// backend returned (or the client echoed back) to the next call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UploadId(String);

impl UploadId {
    /// Wrap a backend-issued upload ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the token is empty (i.e. the client did not send one).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for UploadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A part the client reports as uploaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedPart {
    /// Entity tag the backend returned for the part upload.
    #[serde(default, alias = "ETag")]
    pub e_tag: String,
    /// 1-based part number.
    #[serde(alias = "PartNumber")]
    pub part_number: i32,
}

impl CompletedPart {
    /// Convenience constructor.
    #[must_use]
    pub fn new(part_number: i32, e_tag: impl Into<String>) -> Self {
        Self {
            e_tag: e_tag.into(),
            part_number,
        }
    }
}

/// A presigned URL authorizing the upload of exactly one part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedPart {
    /// URL the client `PUT`s the part bytes to.
    pub signed_url: String,
    /// Part number the URL is scoped to.
    pub part_number: i32,
}

/// A listed object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectEntry {
    /// Full object key.
    pub key: String,
    /// Size in bytes.
    pub size: i64,
}

impl ObjectEntry {
    /// Convenience constructor.
    #[must_use]
    pub fn new(key: impl Into<String>, size: i64) -> Self {
        Self {
            key: key.into(),
            size,
        }
    }

    /// Whether the key is a synthetic folder marker (ends with `/`).
    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.key.ends_with('/')
    }
}
