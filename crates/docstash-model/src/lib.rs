//! Wire types for DocStash.
//!
//! This crate holds everything that crosses the HTTP boundary: the operation
//! enum, request inputs, response outputs, the `{status, payload}` envelope,
//! and the error model. It performs no I/O.
//!
//! All JSON field names are `camelCase` to match what browser clients send
//! (`fileKey`, `fileId`, `partNumber`, `eTag`, ...).

pub mod error;
pub mod input;
pub mod operations;
pub mod output;
pub mod types;

pub use error::{DocStashError, DocStashErrorCode};
pub use operations::DocStashOperation;
pub use output::ApiResponse;
pub use types::{CompletedPart, ObjectEntry, PresignedPart, UploadId};
