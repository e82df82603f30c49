//! Storage adapter error types.

use thiserror::Error;

/// Result type alias using `StoreError`.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by the Cloud Files adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Bad credentials or identity service failure.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Operation needs an endpoint that was never resolved.
    #[error("Endpoint not configured: {0}")]
    EndpointNotConfigured(String),

    /// Operation attempted before a container was selected.
    #[error("Container not configured")]
    ContainerNotConfigured,

    /// Network or HTTP failure, collapsed to its message.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Object absent on the remote store.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Response did not have the expected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A stored path could not be decoded.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Operation has no equivalent on the remote store.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

impl StoreError {
    /// Create an authentication error.
    #[must_use]
    pub fn authentication(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create an endpoint-not-configured error.
    #[must_use]
    pub fn endpoint_not_configured(endpoint: impl Into<String>) -> Self {
        Self::EndpointNotConfigured(endpoint.into())
    }

    /// Create a transport error.
    #[must_use]
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound(path.into())
    }

    /// Create a malformed response error.
    #[must_use]
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Create an unsupported operation error.
    #[must_use]
    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported(operation.into())
    }

    /// Returns true when the remote object does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns a stable code for logs and callers that match on strings.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Authentication(_) => "AUTHENTICATION_FAILED",
            Self::EndpointNotConfigured(_) => "ENDPOINT_NOT_CONFIGURED",
            Self::ContainerNotConfigured => "CONTAINER_NOT_CONFIGURED",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::MalformedResponse(_) => "MALFORMED_RESPONSE",
            Self::InvalidPath(_) => "INVALID_PATH",
            Self::Unsupported(_) => "UNSUPPORTED",
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
