//! Integration tests for DocStash server.
//!
//! These tests require a running DocStash server (default `localhost:8080`)
//! backed by an S3-compatible store (default MinIO at `localhost:9000`) with
//! the test bucket already created. They are marked `#[ignore]` so they don't
//! run during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p docstash-integration -- --ignored
//! ```

use std::sync::Once;

use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_owned())
}

/// Base URL of the DocStash server.
#[must_use]
pub fn server_url() -> String {
    env_or("DOCSTASH_URL", "http://localhost:8080")
}

/// Bucket the server under test is configured with.
#[must_use]
pub fn test_bucket() -> String {
    env_or("S3_BUCKET_NAME", "docstash-test")
}

/// HTTP client for talking to the server and to presigned URLs.
#[must_use]
pub fn http_client() -> reqwest::Client {
    init_tracing();
    reqwest::Client::new()
}

/// S3 client pointing at the same store as the server, for verification.
#[must_use]
pub fn s3_client() -> aws_sdk_s3::Client {
    init_tracing();

    let creds = Credentials::new(
        env_or("S3_ACCESS_KEY_ID", "minioadmin"),
        env_or("S3_SECRET_ACCESS_KEY", "minioadmin"),
        None,
        None,
        "integration-test",
    );

    let config = aws_sdk_s3::config::Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(env_or("S3_REGION", "us-east-1")))
        .credentials_provider(creds)
        .endpoint_url(env_or("S3_ENDPOINT", "http://localhost:9000"))
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(config)
}

/// Generate a unique key prefix so tests never collide in the shared bucket.
#[must_use]
pub fn test_prefix(name: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("it-{name}-{id}/")
}

/// Build `{server}{path}?k=v&...` with every value percent-encoded.
#[must_use]
pub fn endpoint(path: &str, params: &[(&str, &str)]) -> String {
    let query = params
        .iter()
        .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    if query.is_empty() {
        format!("{}{path}", server_url())
    } else {
        format!("{}{path}?{query}", server_url())
    }
}

/// Upload `body` to `key` directly through S3.
pub async fn put_object(client: &aws_sdk_s3::Client, key: &str, body: &'static [u8]) {
    client
        .put_object()
        .bucket(test_bucket())
        .key(key)
        .body(aws_sdk_s3::primitives::ByteStream::from_static(body))
        .send()
        .await
        .unwrap_or_else(|e| panic!("failed to put {key}: {e}"));
}

/// Whether `key` exists in the test bucket.
pub async fn object_exists(client: &aws_sdk_s3::Client, key: &str) -> bool {
    client
        .head_object()
        .bucket(test_bucket())
        .key(key)
        .send()
        .await
        .is_ok()
}

/// Delete every object under `prefix`.
pub async fn cleanup_prefix(client: &aws_sdk_s3::Client, prefix: &str) {
    let bucket = test_bucket();
    let mut continuation_token = None;
    loop {
        let mut req = client.list_objects_v2().bucket(&bucket).prefix(prefix);
        if let Some(token) = continuation_token.take() {
            req = req.continuation_token(token);
        }
        let Ok(resp) = req.send().await else {
            return;
        };

        for obj in resp.contents() {
            if let Some(key) = obj.key() {
                let _ = client.delete_object().bucket(&bucket).key(key).send().await;
            }
        }

        if resp.is_truncated() == Some(true) {
            continuation_token = resp.next_continuation_token().map(ToOwned::to_owned);
        } else {
            break;
        }
    }
}

mod test_documents;
mod test_http;
