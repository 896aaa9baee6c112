//! DocStash operation enum.

use std::fmt;

/// All supported DocStash operations.
///
/// Each operation is bound to exactly one `(method, path)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocStashOperation {
    // Multipart upload protocol
    /// Start a multipart upload session for a key.
    InitiateMultipartUpload,
    /// Mint one presigned upload URL per part.
    GeneratePresignedUrls,
    /// Submit the part manifest and report the final object size.
    CompleteMultipartUpload,

    // Directory operations
    /// List objects under a prefix.
    ListDocuments,
    /// Delete a single object.
    RemoveDocument,
    /// Copy an object to a new key, then delete the old key.
    RenameDocument,
    /// Mint a time-limited download URL.
    GenerateShareUrl,
}

impl DocStashOperation {
    /// Every operation, in route-table order.
    pub const ALL: [Self; 7] = [
        Self::InitiateMultipartUpload,
        Self::GeneratePresignedUrls,
        Self::CompleteMultipartUpload,
        Self::ListDocuments,
        Self::RemoveDocument,
        Self::RenameDocument,
        Self::GenerateShareUrl,
    ];

    /// Returns the operation name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InitiateMultipartUpload => "InitiateMultipartUpload",
            Self::GeneratePresignedUrls => "GeneratePresignedUrls",
            Self::CompleteMultipartUpload => "CompleteMultipartUpload",
            Self::ListDocuments => "ListDocuments",
            Self::RemoveDocument => "RemoveDocument",
            Self::RenameDocument => "RenameDocument",
            Self::GenerateShareUrl => "GenerateShareUrl",
        }
    }

    /// The URI path this operation is served on.
    #[must_use]
    pub fn path(&self) -> &'static str {
        match self {
            Self::InitiateMultipartUpload => "/initiate-multipart-upload",
            Self::GeneratePresignedUrls => "/generate-presigned-urls",
            Self::CompleteMultipartUpload => "/complete-multipart-upload",
            Self::ListDocuments => "/list-documents",
            Self::RemoveDocument => "/remove-document",
            Self::RenameDocument => "/rename-document",
            Self::GenerateShareUrl => "/generate-share-url",
        }
    }

    /// The HTTP method this operation accepts.
    #[must_use]
    pub fn method(&self) -> http::Method {
        match self {
            Self::InitiateMultipartUpload
            | Self::GeneratePresignedUrls
            | Self::CompleteMultipartUpload => http::Method::POST,
            Self::ListDocuments | Self::GenerateShareUrl => http::Method::GET,
            Self::RemoveDocument => http::Method::DELETE,
            Self::RenameDocument => http::Method::PATCH,
        }
    }

    /// Look up the operation served on `path`, ignoring the method.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.path() == path)
    }

    /// Whether the request body carries a JSON document.
    #[must_use]
    pub fn has_json_body(&self) -> bool {
        self.method() == http::Method::POST
    }
}

impl fmt::Display for DocStashOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
