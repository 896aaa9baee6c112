//! DocStash HTTP service layer.
//!
//! - **Router** ([`router`]): maps `(method, path)` to a [`DocStashOperation`](docstash_model::DocStashOperation)
//! - **Query** ([`query`]): decodes query strings for the GET / DELETE / PATCH operations
//! - **Handler trait** ([`dispatch`]): the boundary between HTTP and storage logic
//! - **Service** ([`service`]): hyper `Service` with health check, CORS and request IDs
//! - **Response helpers** ([`response`]): `{status, payload}` envelopes and plain-text errors
//!
//! # Architecture
//!
//! ```text
//! HTTP Request
//!   -> DocStashHttpService (hyper Service)
//!     -> Health check / CORS preflight interception
//!     -> resolve_operation (404 / 405)
//!     -> Body collection (POST only)
//!     -> dispatch_operation (DocStashHandler trait)
//!     -> Common response headers (x-request-id, Server, CORS)
//!   <- HTTP Response
//! ```

pub mod body;
pub mod dispatch;
pub mod query;
pub mod response;
pub mod router;
pub mod service;

pub use body::DocStashResponseBody;
pub use dispatch::{DocStashHandler, NotImplementedHandler, RequestContext};
pub use query::QueryParams;
pub use service::{DocStashHttpConfig, DocStashHttpService};
