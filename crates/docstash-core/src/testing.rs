//! In-memory [`ObjectBackend`] that records every call.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use docstash_model::types::{CompletedPart, ObjectEntry, UploadId};

use crate::backend::{BackendError, ObjectBackend, UploadSession};

/// Bytes credited to an object per completed part.
pub const PART_SIZE: i64 = 5 * 1024 * 1024;

/// A call observed by [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    CreateMultipartUpload { key: String },
    PresignUploadPart { key: String, upload_id: String, part_number: i32 },
    CompleteMultipartUpload { key: String, upload_id: String, parts: Vec<CompletedPart> },
    ObjectSize { key: String },
    ListObjects { prefix: String, delimiter: String },
    DeleteObject { key: String },
    CopyObject { source: String, dest: String },
    PresignDownload { key: String, expires_in: Duration },
}

#[derive(Debug, Default)]
struct State {
    objects: BTreeMap<String, i64>,
    calls: Vec<BackendCall>,
    failures: HashMap<&'static str, String>,
    next_upload: u32,
}

/// Scriptable fake store. Objects are kept in key order and listings group
/// on the delimiter the way S3 does (grouped keys are not returned).
#[derive(Debug, Default)]
pub struct RecordingBackend {
    state: Mutex<State>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(self, key: &str, size: i64) -> Self {
        self.state.lock().objects.insert(key.to_owned(), size);
        self
    }

    /// Make every later call to `operation` fail with `message`.
    pub fn fail_on(self, operation: &'static str, message: &str) -> Self {
        self.state
            .lock()
            .failures
            .insert(operation, message.to_owned());
        self
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.state.lock().calls.clone()
    }

    pub fn has_object(&self, key: &str) -> bool {
        self.state.lock().objects.contains_key(key)
    }

    fn record(&self, operation: &'static str, call: BackendCall) -> Result<(), BackendError> {
        let mut state = self.state.lock();
        state.calls.push(call);
        match state.failures.get(operation) {
            Some(message) => Err(BackendError::Service {
                operation,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ObjectBackend for RecordingBackend {
    async fn create_multipart_upload(&self, key: &str) -> Result<UploadSession, BackendError> {
        self.record(
            "CreateMultipartUpload",
            BackendCall::CreateMultipartUpload { key: key.to_owned() },
        )?;
        let mut state = self.state.lock();
        state.next_upload += 1;
        Ok(UploadSession {
            upload_id: UploadId::new(format!("upload-{}", state.next_upload)),
            key: key.to_owned(),
        })
    }

    async fn presign_upload_part(
        &self,
        key: &str,
        upload_id: &UploadId,
        part_number: i32,
        expires_in: Duration,
    ) -> Result<String, BackendError> {
        self.record(
            "UploadPart",
            BackendCall::PresignUploadPart {
                key: key.to_owned(),
                upload_id: upload_id.to_string(),
                part_number,
            },
        )?;
        // Later parts finish signing first to exercise result ordering.
        tokio::time::sleep(Duration::from_millis(u64::from(20_u32.saturating_sub(
            u32::try_from(part_number).unwrap_or(0),
        ))))
        .await;
        Ok(format!(
            "https://store.test/{key}?uploadId={upload_id}&partNumber={part_number}&X-Amz-Expires={}",
            expires_in.as_secs()
        ))
    }

    async fn complete_multipart_upload(
        &self,
        key: &str,
        upload_id: &UploadId,
        parts: &[CompletedPart],
    ) -> Result<(), BackendError> {
        self.record(
            "CompleteMultipartUpload",
            BackendCall::CompleteMultipartUpload {
                key: key.to_owned(),
                upload_id: upload_id.to_string(),
                parts: parts.to_vec(),
            },
        )?;
        let size = PART_SIZE * i64::try_from(parts.len()).unwrap_or(0);
        self.state.lock().objects.insert(key.to_owned(), size);
        Ok(())
    }

    async fn object_size(&self, key: &str) -> Result<i64, BackendError> {
        self.record("HeadObject", BackendCall::ObjectSize { key: key.to_owned() })?;
        self.state
            .lock()
            .objects
            .get(key)
            .copied()
            .ok_or_else(|| BackendError::Service {
                operation: "HeadObject",
                message: "NotFound".to_owned(),
            })
    }

    async fn list_objects(
        &self,
        prefix: &str,
        delimiter: &str,
    ) -> Result<Vec<ObjectEntry>, BackendError> {
        self.record(
            "ListObjectsV2",
            BackendCall::ListObjects {
                prefix: prefix.to_owned(),
                delimiter: delimiter.to_owned(),
            },
        )?;
        Ok(self
            .state
            .lock()
            .objects
            .iter()
            .filter_map(|(key, size)| {
                let rest = key.strip_prefix(prefix)?;
                // Keys with the delimiter past the prefix roll up into common prefixes.
                if !delimiter.is_empty() && rest.contains(delimiter) {
                    return None;
                }
                Some((key, size))
            })
            .map(|(key, size)| ObjectEntry::new(key.clone(), *size))
            .collect())
    }

    async fn delete_object(&self, key: &str) -> Result<(), BackendError> {
        self.record("DeleteObject", BackendCall::DeleteObject { key: key.to_owned() })?;
        self.state.lock().objects.remove(key);
        Ok(())
    }

    async fn copy_object(&self, source_key: &str, dest_key: &str) -> Result<(), BackendError> {
        self.record(
            "CopyObject",
            BackendCall::CopyObject {
                source: source_key.to_owned(),
                dest: dest_key.to_owned(),
            },
        )?;
        let mut state = self.state.lock();
        let size = state
            .objects
            .get(source_key)
            .copied()
            .ok_or_else(|| BackendError::Service {
                operation: "CopyObject",
                message: "NoSuchKey: The specified key does not exist.".to_owned(),
            })?;
        state.objects.insert(dest_key.to_owned(), size);
        Ok(())
    }

    async fn presign_download(
        &self,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, BackendError> {
        self.record(
            "GetObject",
            BackendCall::PresignDownload {
                key: key.to_owned(),
                expires_in,
            },
        )?;
        Ok(format!(
            "https://store.test/{key}?response-content-disposition=attachment&X-Amz-Expires={}",
            expires_in.as_secs()
        ))
    }
}
