//! DocStash error types.
//!
//! Errors travel back to the client as plain text with the status code
//! attached to the [`DocStashErrorCode`]. Only two kinds come from the
//! operations themselves: client input errors (400) and backend failures
//! (500, message passed through verbatim). The rest are HTTP plumbing.

use std::fmt;

/// Well-known DocStash error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum DocStashErrorCode {
    /// Malformed request or missing / invalid required field.
    #[default]
    InvalidInput,
    /// The storage backend rejected or failed the call.
    BackendFailure,
    /// No route for the request path.
    NotFound,
    /// Route exists but not for this method.
    MethodNotAllowed,
    /// Failure inside the service itself.
    InternalError,
}

impl DocStashErrorCode {
    /// Returns the short error code string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "InvalidInput",
            Self::BackendFailure => "BackendFailure",
            Self::NotFound => "NotFound",
            Self::MethodNotAllowed => "MethodNotAllowed",
            Self::InternalError => "InternalError",
        }
    }

    /// Returns the default HTTP status code for this error.
    #[must_use]
    pub fn default_status_code(&self) -> http::StatusCode {
        match self {
            Self::InvalidInput => http::StatusCode::BAD_REQUEST,
            Self::NotFound => http::StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => http::StatusCode::METHOD_NOT_ALLOWED,
            Self::BackendFailure | Self::InternalError => {
                http::StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl fmt::Display for DocStashErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A DocStash error response.
#[derive(Debug)]
pub struct DocStashError {
    /// The error code.
    pub code: DocStashErrorCode,
    /// The message written to the response body.
    pub message: String,
    /// The HTTP status code.
    pub status_code: http::StatusCode,
    /// The underlying source error, if any.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for DocStashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocStashError({}): {}", self.code, self.message)
    }
}

impl std::error::Error for DocStashError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl DocStashError {
    /// Create a new `DocStashError` from an error code.
    #[must_use]
    pub fn new(code: DocStashErrorCode) -> Self {
        Self {
            status_code: code.default_status_code(),
            message: code.as_str().to_owned(),
            code,
            source: None,
        }
    }

    /// Create a new `DocStashError` with a custom message.
    #[must_use]
    pub fn with_message(code: DocStashErrorCode, message: impl Into<String>) -> Self {
        Self {
            status_code: code.default_status_code(),
            message: message.into(),
            code,
            source: None,
        }
    }

    /// Set the source error.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Whether this error was caused by the client rather than the service or backend.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status_code.is_client_error()
    }

    // -- Convenience constructors --

    /// Malformed or missing client input.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::with_message(DocStashErrorCode::InvalidInput, message)
    }

    /// A required field or query parameter is absent or empty.
    #[must_use]
    pub fn missing_field(name: &str) -> Self {
        Self::invalid_input(format!("{name} is required"))
    }

    /// Backend failure; `message` is passed through unchanged.
    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::with_message(DocStashErrorCode::BackendFailure, message)
    }

    /// Unknown route.
    #[must_use]
    pub fn not_found(path: &str) -> Self {
        Self::with_message(DocStashErrorCode::NotFound, format!("no route for {path}"))
    }

    /// Known route, wrong method.
    #[must_use]
    pub fn method_not_allowed(method: &http::Method, path: &str) -> Self {
        Self::with_message(
            DocStashErrorCode::MethodNotAllowed,
            format!("method {method} not allowed on {path}"),
        )
    }

    /// Internal server error.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::with_message(DocStashErrorCode::InternalError, message)
    }
}
