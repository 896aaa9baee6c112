//! DocStash handler trait and operation dispatch.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;

use docstash_model::error::DocStashError;
use docstash_model::operations::DocStashOperation;

use crate::body::DocStashResponseBody;
use crate::query::QueryParams;

/// Everything the HTTP layer learned about a request before dispatch.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The routed operation.
    pub operation: DocStashOperation,
    /// Decoded query string.
    pub query: QueryParams,
    /// Per-request correlation ID (also sent back as `x-request-id`).
    pub request_id: String,
}

/// Boxed future returned by [`DocStashHandler::handle_operation`].
pub type HandlerFuture =
    Pin<Box<dyn Future<Output = Result<http::Response<DocStashResponseBody>, DocStashError>> + Send>>;

/// Trait that the DocStash business logic provider must implement.
///
/// The handler receives the routed request context and the raw body bytes
/// (empty for non-POST operations), and returns a complete HTTP response.
/// This trait is the boundary between the HTTP transport layer and the
/// storage logic.
pub trait DocStashHandler: Send + Sync + 'static {
    /// Handle a DocStash operation and produce an HTTP response.
    fn handle_operation(&self, ctx: RequestContext, body: Bytes) -> HandlerFuture;
}

/// Dispatch a routed request to the handler.
pub async fn dispatch_operation<H: DocStashHandler>(
    handler: &H,
    ctx: RequestContext,
    body: Bytes,
) -> Result<http::Response<DocStashResponseBody>, DocStashError> {
    tracing::debug!(operation = %ctx.operation, request_id = %ctx.request_id, "dispatching DocStash operation");
    handler.handle_operation(ctx, body).await
}

/// Default handler that returns an internal error for all operations.
///
/// Useful for exercising routing and the service pipeline in isolation.
#[derive(Debug, Clone, Default)]
pub struct NotImplementedHandler;

impl DocStashHandler for NotImplementedHandler {
    fn handle_operation(&self, ctx: RequestContext, _body: Bytes) -> HandlerFuture {
        Box::pin(async move {
            Err(DocStashError::internal_error(format!(
                "{} is not implemented",
                ctx.operation
            )))
        })
    }
}
