//! DocStash request router.
//!
//! Every operation owns exactly one path, so routing is a table lookup on
//! the path followed by a method check. An unknown path is a 404; a known
//! path with the wrong method is a 405.

use docstash_model::error::DocStashError;
use docstash_model::operations::DocStashOperation;

/// Resolve the operation for a request method and path.
///
/// # Errors
///
/// Returns `NotFound` for an unknown path and `MethodNotAllowed` when the
/// path exists but is bound to another method.
pub fn resolve_operation(
    method: &http::Method,
    path: &str,
) -> Result<DocStashOperation, DocStashError> {
    let op = DocStashOperation::from_path(path).ok_or_else(|| DocStashError::not_found(path))?;

    if *method == op.method() {
        Ok(op)
    } else {
        Err(DocStashError::method_not_allowed(method, path))
    }
}
