//! [`ObjectBackend`] over the AWS S3 SDK.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart as S3CompletedPart};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::{debug, info, warn};

use docstash_model::types::{CompletedPart, ObjectEntry, UploadId};

use super::{BackendError, ObjectBackend, UploadSession};
use crate::config::DocStashConfig;

/// Characters left as-is in a `CopySource` header (`bucket/key`).
const COPY_SOURCE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// S3 (or S3-compatible) object store bound to one bucket.
#[derive(Debug, Clone)]
pub struct S3Backend {
    client: Client,
    bucket: String,
}

impl S3Backend {
    /// Wrap an existing client.
    #[must_use]
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Build a client from the DocStash configuration.
    ///
    /// Static credentials are used when both halves are configured. Otherwise
    /// the default AWS provider chain (environment, profile, IMDS) applies.
    pub async fn from_config(config: &DocStashConfig) -> Self {
        let region = Region::new(config.region.clone());

        let mut builder = match (&config.access_key_id, &config.secret_access_key) {
            (Some(access_key), Some(secret_key)) => aws_sdk_s3::config::Builder::new()
                .behavior_version(BehaviorVersion::latest())
                .credentials_provider(Credentials::new(
                    access_key,
                    secret_key,
                    None,
                    None,
                    "docstash-static",
                )),
            _ => {
                warn!("no static S3 credentials configured, using the default AWS provider chain");
                let shared = aws_config::defaults(BehaviorVersion::latest())
                    .region(region.clone())
                    .load()
                    .await;
                aws_sdk_s3::config::Builder::from(&shared)
            }
        };

        builder = builder
            .region(region)
            .force_path_style(config.force_path_style);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }

        info!(
            bucket = %config.bucket,
            region = %config.region,
            endpoint = config.endpoint.as_deref().unwrap_or("aws"),
            force_path_style = config.force_path_style,
            "S3 backend configured"
        );

        Self::new(Client::from_conf(builder.build()), config.bucket.clone())
    }

    fn copy_source(&self, key: &str) -> String {
        utf8_percent_encode(&format!("{}/{key}", self.bucket), COPY_SOURCE_SET).to_string()
    }
}

/// Relay the store's own message when there is one.
fn service_error<E>(operation: &'static str, err: &E) -> BackendError
where
    E: ProvideErrorMetadata + std::error::Error,
{
    let message = match (err.code(), err.message()) {
        (Some(code), Some(message)) => format!("{code}: {message}"),
        (None, Some(message)) => message.to_owned(),
        _ => DisplayErrorContext(err).to_string(),
    };
    BackendError::Service { operation, message }
}

fn presign_config(
    operation: &'static str,
    expires_in: Duration,
) -> Result<PresigningConfig, BackendError> {
    PresigningConfig::expires_in(expires_in).map_err(|e| BackendError::Presign {
        operation,
        message: e.to_string(),
    })
}

#[async_trait]
impl ObjectBackend for S3Backend {
    async fn create_multipart_upload(&self, key: &str) -> Result<UploadSession, BackendError> {
        const OP: &str = "CreateMultipartUpload";

        let output = self
            .client
            .create_multipart_upload()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| service_error(OP, &e))?;

        let upload_id = output.upload_id().ok_or(BackendError::MissingField {
            operation: OP,
            field: "UploadId",
        })?;

        Ok(UploadSession {
            upload_id: UploadId::new(upload_id),
            key: output.key().unwrap_or(key).to_owned(),
        })
    }

    async fn presign_upload_part(
        &self,
        key: &str,
        upload_id: &UploadId,
        part_number: i32,
        expires_in: Duration,
    ) -> Result<String, BackendError> {
        const OP: &str = "UploadPart";

        let request = self
            .client
            .upload_part()
            .bucket(&self.bucket)
            .key(key)
            .upload_id(upload_id.as_str())
            .part_number(part_number)
            .presigned(presign_config(OP, expires_in)?)
            .await
            .map_err(|e| BackendError::Presign {
                operation: OP,
                message: DisplayErrorContext(&e).to_string(),
            })?;

        Ok(request.uri().to_owned())
    }

    async fn complete_multipart_upload(
        &self,
        key: &str,
        upload_id: &UploadId,
        parts: &[CompletedPart],
    ) -> Result<(), BackendError> {
        let manifest = parts
            .iter()
            .map(|p| {
                S3CompletedPart::builder()
                    .part_number(p.part_number)
                    .e_tag(&p.e_tag)
                    .build()
            })
            .collect::<Vec<_>>();

        self.client
            .complete_multipart_upload()
            .bucket(&self.bucket)
            .key(key)
            .upload_id(upload_id.as_str())
            .multipart_upload(
                CompletedMultipartUpload::builder()
                    .set_parts(Some(manifest))
                    .build(),
            )
            .send()
            .await
            .map_err(|e| service_error("CompleteMultipartUpload", &e))?;

        Ok(())
    }

    async fn object_size(&self, key: &str) -> Result<i64, BackendError> {
        const OP: &str = "HeadObject";

        let output = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| service_error(OP, &e))?;

        output.content_length().ok_or(BackendError::MissingField {
            operation: OP,
            field: "ContentLength",
        })
    }

    async fn list_objects(
        &self,
        prefix: &str,
        delimiter: &str,
    ) -> Result<Vec<ObjectEntry>, BackendError> {
        let mut entries = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix);
            if !delimiter.is_empty() {
                request = request.delimiter(delimiter);
            }
            if let Some(token) = continuation_token.take() {
                request = request.continuation_token(token);
            }

            let page = request
                .send()
                .await
                .map_err(|e| service_error("ListObjectsV2", &e))?;

            entries.extend(page.contents().iter().filter_map(|object| {
                object
                    .key()
                    .map(|key| ObjectEntry::new(key, object.size().unwrap_or_default()))
            }));

            match (page.is_truncated(), page.next_continuation_token()) {
                (Some(true), Some(token)) => continuation_token = Some(token.to_owned()),
                _ => break,
            }
        }

        debug!(prefix, delimiter, count = entries.len(), "listed objects");
        Ok(entries)
    }

    async fn delete_object(&self, key: &str) -> Result<(), BackendError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| service_error("DeleteObject", &e))?;
        Ok(())
    }

    async fn copy_object(&self, source_key: &str, dest_key: &str) -> Result<(), BackendError> {
        self.client
            .copy_object()
            .bucket(&self.bucket)
            .copy_source(self.copy_source(source_key))
            .key(dest_key)
            .send()
            .await
            .map_err(|e| service_error("CopyObject", &e))?;
        Ok(())
    }

    async fn presign_download(
        &self,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, BackendError> {
        const OP: &str = "GetObject";

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .response_content_disposition("attachment")
            .presigned(presign_config(OP, expires_in)?)
            .await
            .map_err(|e| BackendError::Presign {
                operation: OP,
                message: DisplayErrorContext(&e).to_string(),
            })?;

        Ok(request.uri().to_owned())
    }
}
