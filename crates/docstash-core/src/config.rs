//! DocStash configuration.
//!
//! Provides [`DocStashConfig`], built once at startup (normally from
//! environment variables) and shared by `Arc` with every component.

use std::fmt;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Configuration validation failure.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No bucket configured.
    #[error("S3_BUCKET_NAME must be set")]
    MissingBucket,

    /// `PORT` is 0 or not a number.
    #[error("PORT must be between 1 and 65535")]
    InvalidPort,

    /// Only one half of a static credential pair is set.
    #[error("S3_ACCESS_KEY_ID and S3_SECRET_ACCESS_KEY must be set together")]
    PartialCredentials,
}

/// DocStash service configuration.
///
/// # Examples
///
/// ```
/// use docstash_core::config::DocStashConfig;
///
/// let config = DocStashConfig::builder().bucket("documents".into()).build();
/// assert_eq!(config.listen_addr(), "127.0.0.1:8080");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct DocStashConfig {
    /// Listen host (name or IP).
    #[builder(default = String::from("127.0.0.1"))]
    pub host: String,

    /// Listen port.
    #[builder(default = 8080)]
    pub port: u16,

    /// Value of `Access-Control-Allow-Origin`.
    #[builder(default = String::from("*"))]
    pub cors_origin: String,

    /// Deployment environment label (e.g. `dev`, `production`).
    #[builder(default = String::from("dev"))]
    pub environment: String,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,

    /// The single bucket every operation targets.
    #[builder(default)]
    pub bucket: String,

    /// Bucket region.
    #[builder(default = String::from("us-east-1"))]
    pub region: String,

    /// Custom S3 endpoint (MinIO, R2, LocalStack, ...).
    #[builder(default)]
    pub endpoint: Option<String>,

    /// Static access key ID.
    #[builder(default)]
    pub access_key_id: Option<String>,

    /// Static secret access key.
    #[serde(skip_serializing)]
    #[builder(default)]
    pub secret_access_key: Option<String>,

    /// Use path-style bucket addressing.
    #[builder(default = true)]
    pub force_path_style: bool,
}

impl Default for DocStashConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for DocStashConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocStashConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("cors_origin", &self.cors_origin)
            .field("environment", &self.environment)
            .field("log_level", &self.log_level)
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("endpoint", &self.endpoint)
            .field("access_key_id", &self.access_key_id)
            .field(
                "secret_access_key",
                &self.secret_access_key.as_ref().map(|_| "<redacted>"),
            )
            .field("force_path_style", &self.force_path_style)
            .finish()
    }
}

impl DocStashConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `HOST` | `127.0.0.1` |
    /// | `PORT` | `8080` |
    /// | `CORS_ORIGIN` | `*` |
    /// | `NODE_ENV` | `dev` |
    /// | `LOG_LEVEL` | `info` |
    /// | `S3_BUCKET_NAME` | *(empty)* |
    /// | `S3_REGION` | `us-east-1` |
    /// | `S3_ENDPOINT` | *(unset)* |
    /// | `S3_ACCESS_KEY_ID` | *(unset)* |
    /// | `S3_SECRET_ACCESS_KEY` | *(unset)* |
    /// | `S3_FORCE_PATH_STYLE` | `true` |
    ///
    /// A `.env` file in the working directory, when present, fills in
    /// variables that are not already set in the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("HOST") {
            config.host = strip_scheme(&v).to_owned();
        }
        if let Some(v) = lookup("PORT") {
            // An unparseable port is kept as 0 so `validate` rejects it.
            config.port = v.trim().parse::<u16>().unwrap_or(0);
        }
        if let Some(v) = lookup("CORS_ORIGIN") {
            config.cors_origin = v;
        }
        if let Some(v) = lookup("NODE_ENV") {
            config.environment = v;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }
        if let Some(v) = lookup("S3_BUCKET_NAME") {
            config.bucket = v;
        }
        if let Some(v) = lookup("S3_REGION") {
            config.region = v;
        }
        config.endpoint = non_empty(lookup("S3_ENDPOINT"));
        config.access_key_id = non_empty(lookup("S3_ACCESS_KEY_ID"));
        config.secret_access_key = non_empty(lookup("S3_SECRET_ACCESS_KEY"));
        if let Some(v) = lookup("S3_FORCE_PATH_STYLE") {
            config.force_path_style = parse_bool(&v);
        }

        config
    }

    /// Check that the configuration can serve requests.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bucket.trim().is_empty() {
            return Err(ConfigError::MissingBucket);
        }
        if self.port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        if self.access_key_id.is_some() != self.secret_access_key.is_some() {
            return Err(ConfigError::PartialCredentials);
        }
        Ok(())
    }

    /// `host:port` to bind.
    #[must_use]
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// `HOST` historically carried a URL (`http://localhost`); keep only the host part.
fn strip_scheme(value: &str) -> &str {
    let value = value.trim();
    value
        .strip_prefix("http://")
        .or_else(|| value.strip_prefix("https://"))
        .unwrap_or(value)
        .trim_end_matches('/')
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse a string as a boolean, accepting `"1"` and `"true"` (case-insensitive).
fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
