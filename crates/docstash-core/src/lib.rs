//! DocStash core: configuration, the object store seam and the document
//! operations built on it.

pub mod backend;
pub mod config;
pub mod handler;
pub mod provider;

#[cfg(test)]
#[allow(missing_docs)]
pub(crate) mod testing;

pub use backend::{BackendError, ObjectBackend, S3Backend, UploadSession};
pub use config::{ConfigError, DocStashConfig};
pub use handler::DocStashRequestHandler;
pub use provider::{DocStash, RenameOutcome};
