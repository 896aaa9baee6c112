//! The DocStash HTTP service implementing hyper's `Service` trait.
//!
//! [`DocStashHttpService`] ties routing, body collection, dispatch and
//! response formatting together:
//!
//! 1. Health check interception (`GET /health`, `GET /_health`)
//! 2. CORS preflight requests (`OPTIONS`)
//! 3. Route resolution (404 / 405 on mismatch)
//! 4. Body collection (POST operations only)
//! 5. Operation dispatch to the [`DocStashHandler`]
//! 6. Common response headers (`x-request-id`, `Server`, CORS)

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::service::Service;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use docstash_model::error::{DocStashError, DocStashErrorCode};
use docstash_model::operations::DocStashOperation;

use crate::body::DocStashResponseBody;
use crate::dispatch::{DocStashHandler, RequestContext, dispatch_operation};
use crate::query::QueryParams;
use crate::response::error_to_response;
use crate::router::resolve_operation;

/// Value of the `Server` response header.
const SERVER_NAME: &str = "DocStash";

/// Configuration for the DocStash HTTP service.
#[derive(Debug, Clone)]
pub struct DocStashHttpConfig {
    /// Origin echoed in `Access-Control-Allow-Origin` (`*` allows any).
    pub cors_origin: String,
}

impl Default for DocStashHttpConfig {
    fn default() -> Self {
        Self {
            cors_origin: "*".to_owned(),
        }
    }
}

/// Hyper `Service` implementation for DocStash.
///
/// # Type Parameters
///
/// - `H`: The business logic handler implementing [`DocStashHandler`].
#[derive(Debug)]
pub struct DocStashHttpService<H: DocStashHandler> {
    handler: Arc<H>,
    config: Arc<DocStashHttpConfig>,
}

impl<H: DocStashHandler> DocStashHttpService<H> {
    /// Create a new service with the given handler and configuration.
    #[must_use]
    pub fn new(handler: H, config: DocStashHttpConfig) -> Self {
        Self::from_shared(Arc::new(handler), config)
    }

    /// Create a new service from an `Arc<H>` handler and configuration.
    #[must_use]
    pub fn from_shared(handler: Arc<H>, config: DocStashHttpConfig) -> Self {
        Self {
            handler,
            config: Arc::new(config),
        }
    }
}

impl<H: DocStashHandler> Clone for DocStashHttpService<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            config: Arc::clone(&self.config),
        }
    }
}

impl<H: DocStashHandler> Service<http::Request<Incoming>> for DocStashHttpService<H> {
    type Response = http::Response<DocStashResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let handler = Arc::clone(&self.handler);
        let config = Arc::clone(&self.config);

        Box::pin(async move {
            let request_id = Uuid::new_v4().to_string();
            let response = process_request(req, handler.as_ref(), &config, &request_id).await;
            Ok(add_common_headers(response, &request_id, &config))
        })
    }
}

/// Process a single request through the DocStash pipeline.
///
/// Generic over the request body so the pipeline can be driven without a
/// live connection.
pub async fn process_request<H, B>(
    req: http::Request<B>,
    handler: &H,
    config: &DocStashHttpConfig,
    request_id: &str,
) -> http::Response<DocStashResponseBody>
where
    H: DocStashHandler,
    B: http_body::Body<Data = Bytes>,
    B::Error: std::fmt::Display,
{
    let (parts, incoming) = req.into_parts();
    let method = parts.method.clone();
    let path = parts.uri.path().to_owned();
    debug!(%method, uri = %parts.uri, request_id, "processing DocStash request");

    // 1. Health check interception.
    if is_health_check(&method, &path) {
        return health_check_response();
    }

    // 2. CORS preflight.
    if method == http::Method::OPTIONS {
        return cors_preflight_response(config);
    }

    // 3. Route.
    let operation = match resolve_operation(&method, &path) {
        Ok(op) => op,
        Err(err) => {
            warn!(%method, %path, error = %err, request_id, "failed to route request");
            return routing_error_response(&err, &path, request_id);
        }
    };

    info!(operation = %operation, request_id, "routed DocStash request");

    // 4. Collect body (only POST operations carry one).
    let body = if operation.has_json_body() {
        match incoming.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                error!(error = %e, request_id, "failed to collect request body");
                let err =
                    DocStashError::internal_error(format!("Failed to read request body: {e}"));
                return error_to_response(&err, request_id);
            }
        }
    } else {
        Bytes::new()
    };

    let ctx = RequestContext {
        operation,
        query: QueryParams::parse(parts.uri.query()),
        request_id: request_id.to_owned(),
    };

    // 5. Dispatch.
    match dispatch_operation(handler, ctx, body).await {
        Ok(response) => response,
        Err(err) => {
            if err.is_client_error() {
                warn!(operation = %operation, error = %err, request_id, "rejected client input");
            } else {
                error!(operation = %operation, error = %err, request_id, "operation failed");
            }
            error_to_response(&err, request_id)
        }
    }
}

/// Error response for a routing failure; a 405 also advertises the allowed method.
fn routing_error_response(
    err: &DocStashError,
    path: &str,
    request_id: &str,
) -> http::Response<DocStashResponseBody> {
    let mut response = error_to_response(err, request_id);
    if err.code == DocStashErrorCode::MethodNotAllowed {
        if let Some(op) = DocStashOperation::from_path(path) {
            let allow = format!("{}, OPTIONS", op.method());
            if let Ok(hv) = http::HeaderValue::from_str(&allow) {
                response.headers_mut().insert(http::header::ALLOW, hv);
            }
        }
    }
    response
}

/// Check if the request is a health check probe.
fn is_health_check(method: &http::Method, path: &str) -> bool {
    *method == http::Method::GET && (path == "/health" || path == "/_health")
}

/// Produce a health check response.
fn health_check_response() -> http::Response<DocStashResponseBody> {
    http::Response::builder()
        .status(http::StatusCode::OK)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(DocStashResponseBody::from_string(
            r#"{"status":"running","service":"docstash"}"#,
        ))
        .expect("static health response should be valid")
}

/// Produce a CORS preflight response.
fn cors_preflight_response(config: &DocStashHttpConfig) -> http::Response<DocStashResponseBody> {
    let mut response = http::Response::builder()
        .status(http::StatusCode::NO_CONTENT)
        .header(
            "Access-Control-Allow-Methods",
            "GET, POST, PATCH, DELETE, OPTIONS",
        )
        .header("Access-Control-Allow-Headers", "Content-Type, Authorization")
        .header("Access-Control-Max-Age", "86400")
        .body(DocStashResponseBody::empty())
        .expect("static CORS response should be valid");
    insert_allow_origin(&mut response, config);
    response
}

/// Add common response headers to every DocStash response.
fn add_common_headers(
    mut response: http::Response<DocStashResponseBody>,
    request_id: &str,
    config: &DocStashHttpConfig,
) -> http::Response<DocStashResponseBody> {
    insert_allow_origin(&mut response, config);

    let headers = response.headers_mut();
    if let Ok(hv) = http::HeaderValue::from_str(request_id) {
        headers.entry("x-request-id").or_insert(hv);
    }
    headers.insert(
        http::header::SERVER,
        http::HeaderValue::from_static(SERVER_NAME),
    );
    headers.insert(
        "Access-Control-Expose-Headers",
        http::HeaderValue::from_static("x-request-id"),
    );

    response
}

fn insert_allow_origin(
    response: &mut http::Response<DocStashResponseBody>,
    config: &DocStashHttpConfig,
) {
    match http::HeaderValue::from_str(&config.cors_origin) {
        Ok(hv) => {
            response
                .headers_mut()
                .insert("Access-Control-Allow-Origin", hv);
        }
        Err(_) => warn!(origin = %config.cors_origin, "CORS origin is not a valid header value"),
    }
}
