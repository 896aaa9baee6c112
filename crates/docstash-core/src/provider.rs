//! DocStash provider: the seven document operations over an [`ObjectBackend`].
//!
//! The provider is stateless. Upload sessions live in the object store and the
//! client carries `(fileKey, fileId)` between the three multipart calls.

use std::sync::Arc;
use std::time::Duration;

use futures::future::try_join_all;
use tracing::{debug, info, warn};

use docstash_model::error::DocStashError;
use docstash_model::input::{
    CompleteMultipartUploadInput, GeneratePresignedUrlsInput, GenerateShareUrlInput,
    InitiateMultipartUploadInput, ListDocumentsInput, RemoveDocumentInput, RenameDocumentInput,
};
use docstash_model::output::{CompleteMultipartUploadOutput, InitiateMultipartUploadOutput};
use docstash_model::types::{CompletedPart, ObjectEntry, PresignedPart};

use crate::backend::{BackendError, ObjectBackend};

/// Validity of each part upload URL.
pub const PART_URL_TTL: Duration = Duration::from_secs(15 * 60);

/// Most parts a single multipart upload can have.
pub const MAX_PARTS: i64 = 10_000;

/// Longest share link validity, in seconds (7 days).
pub const MAX_SHARE_EXPIRY_SECS: i64 = 604_800;

/// Result of a rename, which is a copy followed by a delete.
#[derive(Debug)]
pub enum RenameOutcome {
    /// Both steps succeeded.
    Renamed,
    /// The copy failed. Nothing changed.
    CopyFailed(BackendError),
    /// The copy succeeded but the original could not be removed. Both keys now exist.
    CopiedButDeleteFailed(BackendError),
}

impl RenameOutcome {
    /// Whether the old key is gone and the new key exists.
    #[must_use]
    pub fn is_renamed(&self) -> bool {
        matches!(self, Self::Renamed)
    }

    /// Map the outcome to the value sent to the client.
    ///
    /// # Errors
    ///
    /// Both failure outcomes become a backend error. A partial rename names
    /// both keys so the caller knows the document now exists twice.
    pub fn into_result(self, old_key: &str, new_key: &str) -> Result<bool, DocStashError> {
        match self {
            Self::Renamed => Ok(true),
            Self::CopyFailed(err) => Err(backend_error(err)),
            Self::CopiedButDeleteFailed(err) => Err(DocStashError::backend(format!(
                "copied {old_key} to {new_key} but failed to delete {old_key}: {err}"
            ))
            .with_source(err)),
        }
    }
}

/// Convert a store failure into a client-facing error, keeping the message verbatim.
pub(crate) fn backend_error(err: BackendError) -> DocStashError {
    DocStashError::backend(err.to_string()).with_source(err)
}

/// Sort a completion manifest ascending by part number.
#[must_use]
pub fn sort_parts(mut parts: Vec<CompletedPart>) -> Vec<CompletedPart> {
    parts.sort_by_key(|p| p.part_number);
    parts
}

/// Keep folder markers when `delimiter` is exactly `"/"`, files otherwise.
#[must_use]
pub fn filter_listing(entries: Vec<ObjectEntry>, delimiter: &str) -> Vec<ObjectEntry> {
    let folders = delimiter == "/";
    entries
        .into_iter()
        .filter(|entry| entry.is_folder() == folders)
        .collect()
}

/// The DocStash provider.
#[derive(Debug)]
pub struct DocStash {
    backend: Arc<dyn ObjectBackend>,
}

impl DocStash {
    /// Create a provider over `backend`.
    #[must_use]
    pub fn new(backend: Arc<dyn ObjectBackend>) -> Self {
        Self { backend }
    }

    /// Open a multipart upload session keyed by the client-supplied file name.
    pub async fn initiate_multipart_upload(
        &self,
        input: InitiateMultipartUploadInput,
    ) -> Result<InitiateMultipartUploadOutput, DocStashError> {
        if input.file_name.is_empty() {
            return Err(DocStashError::missing_field("fileName"));
        }

        let session = self
            .backend
            .create_multipart_upload(&input.file_name)
            .await
            .map_err(backend_error)?;

        info!(key = %session.key, upload_id = %session.upload_id, "multipart upload initiated");
        Ok(InitiateMultipartUploadOutput {
            id: session.upload_id,
            key: session.key,
        })
    }

    /// Issue one upload URL per part, ascending by part number.
    ///
    /// URLs are signed concurrently; any signing failure fails the whole call.
    pub async fn generate_presigned_urls(
        &self,
        input: GeneratePresignedUrlsInput,
    ) -> Result<Vec<PresignedPart>, DocStashError> {
        if input.file_key.is_empty() {
            return Err(DocStashError::missing_field("fileKey"));
        }
        if input.file_id.is_empty() {
            return Err(DocStashError::missing_field("fileId"));
        }
        if !(1..=MAX_PARTS).contains(&input.parts) {
            return Err(DocStashError::invalid_input(format!(
                "parts must be between 1 and {MAX_PARTS}"
            )));
        }
        let count = i32::try_from(input.parts)
            .map_err(|_| DocStashError::invalid_input("parts is out of range"))?;

        let key = input.file_key.as_str();
        let upload_id = &input.file_id;
        let backend = self.backend.as_ref();

        let parts = try_join_all((1..=count).map(|part_number| async move {
            backend
                .presign_upload_part(key, upload_id, part_number, PART_URL_TTL)
                .await
                .map(|signed_url| PresignedPart {
                    signed_url,
                    part_number,
                })
        }))
        .await
        .map_err(backend_error)?;

        debug!(key, upload_id = %upload_id, parts = count, "part URLs issued");
        Ok(parts)
    }

    /// Assemble the uploaded parts and report the final object size.
    ///
    /// The size lookup runs after the store has already assembled the object.
    /// If it fails the call still fails, but the message says so.
    pub async fn complete_multipart_upload(
        &self,
        input: CompleteMultipartUploadInput,
    ) -> Result<CompleteMultipartUploadOutput, DocStashError> {
        if input.file_key.is_empty() {
            return Err(DocStashError::missing_field("fileKey"));
        }
        if input.file_id.is_empty() {
            return Err(DocStashError::missing_field("fileId"));
        }
        if input.parts.is_empty() {
            return Err(DocStashError::invalid_input("parts must not be empty"));
        }
        if let Some(bad) = input.parts.iter().find(|p| p.part_number < 1) {
            return Err(DocStashError::invalid_input(format!(
                "invalid partNumber {}",
                bad.part_number
            )));
        }

        let parts = sort_parts(input.parts);
        self.backend
            .complete_multipart_upload(&input.file_key, &input.file_id, &parts)
            .await
            .map_err(backend_error)?;

        let size = self
            .backend
            .object_size(&input.file_key)
            .await
            .map_err(|err| {
                warn!(key = %input.file_key, error = %err, "size lookup failed after completion");
                DocStashError::backend(format!(
                    "upload of {} completed but its size could not be read: {err}",
                    input.file_key
                ))
                .with_source(err)
            })?;

        info!(key = %input.file_key, size, parts = parts.len(), "multipart upload completed");
        Ok(CompleteMultipartUploadOutput {
            key: input.file_key,
            size,
        })
    }

    /// List folder markers (`delimiter == "/"`) or files under a prefix.
    pub async fn list_documents(
        &self,
        input: ListDocumentsInput,
    ) -> Result<Vec<ObjectEntry>, DocStashError> {
        let entries = self
            .backend
            .list_objects(&input.prefix, &input.delimiter)
            .await
            .map_err(backend_error)?;
        Ok(filter_listing(entries, &input.delimiter))
    }

    /// Delete a document. Deleting a missing key succeeds.
    pub async fn remove_document(&self, input: RemoveDocumentInput) -> Result<bool, DocStashError> {
        if input.file_key.is_empty() {
            return Err(DocStashError::missing_field("fileKey"));
        }
        self.backend
            .delete_object(&input.file_key)
            .await
            .map_err(backend_error)?;
        info!(key = %input.file_key, "document removed");
        Ok(true)
    }

    /// Rename a document by copying it to the new key and deleting the old one.
    ///
    /// Only input validation fails the returned `Result`. Store failures are
    /// reported through [`RenameOutcome`].
    pub async fn rename_document(
        &self,
        input: &RenameDocumentInput,
    ) -> Result<RenameOutcome, DocStashError> {
        if input.old_file_key.is_empty() {
            return Err(DocStashError::missing_field("oldFileKey"));
        }
        if input.new_file_key.is_empty() {
            return Err(DocStashError::missing_field("newFileKey"));
        }
        // Copy-onto-self followed by the delete would lose the document.
        if input.old_file_key == input.new_file_key {
            return Err(DocStashError::invalid_input(
                "newFileKey must differ from oldFileKey",
            ));
        }

        let (old_key, new_key) = (input.old_file_key.as_str(), input.new_file_key.as_str());

        if let Err(err) = self.backend.copy_object(old_key, new_key).await {
            warn!(old_key, new_key, error = %err, "rename copy failed");
            return Ok(RenameOutcome::CopyFailed(err));
        }
        if let Err(err) = self.backend.delete_object(old_key).await {
            warn!(old_key, new_key, error = %err, "rename left both keys in place");
            return Ok(RenameOutcome::CopiedButDeleteFailed(err));
        }

        info!(old_key, new_key, "document renamed");
        Ok(RenameOutcome::Renamed)
    }

    /// Sign a time-limited download link served as an attachment.
    ///
    /// The key is not checked for existence.
    pub async fn generate_share_url(
        &self,
        input: GenerateShareUrlInput,
    ) -> Result<String, DocStashError> {
        if input.file_key.is_empty() {
            return Err(DocStashError::missing_field("fileKey"));
        }
        let expires_in = input
            .expires_in
            .filter(|secs| (1..=MAX_SHARE_EXPIRY_SECS).contains(secs))
            .and_then(|secs| u64::try_from(secs).ok())
            .ok_or_else(|| DocStashError::invalid_input("Invalid or missing expiresIn parameter"))?;

        self.backend
            .presign_download(&input.file_key, Duration::from_secs(expires_in))
            .await
            .map_err(backend_error)
    }
}
