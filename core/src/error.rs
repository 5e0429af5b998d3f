//! Error types for the storefront API client.
//!
//! # Design
//! Every failure keeps its origin as a variant, and `ApiError::kind` groups
//! the variants into the five classes callers branch on. A caller that only
//! needs "did it work" checks `Result::is_ok` and ignores the rest.

use thiserror::Error;

/// Coarse classification of an `ApiError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected locally before any network I/O.
    Client,
    /// No response was obtained.
    Transport,
    /// The server answered with status 400 or above.
    Protocol,
    /// The body was malformed or did not have the expected shape.
    Payload,
    /// A well-formed response that signals an application-level error.
    Domain,
}

/// Errors returned by `StoreClient` and `Storefront` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request serialization failed: {0}")]
    SerializationError(String),

    #[error("not logged in")]
    NotLoggedIn,

    #[error("{0}")]
    InvalidInput(String),

    /// DNS failure, refused connection, timeout, or a broken body stream.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server returned status >= 400. `detail` carries the server's
    /// `detail` or `error` text when the body had one.
    #[error("HTTP {status}: {}", detail.as_deref().unwrap_or("request failed"))]
    HttpError { status: u16, detail: Option<String> },

    #[error("malformed response body: {0}")]
    DeserializationError(String),

    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),

    #[error("{0}")]
    Domain(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::UnsupportedMethod(_)
            | ApiError::InvalidUrl { .. }
            | ApiError::SerializationError(_)
            | ApiError::NotLoggedIn
            | ApiError::InvalidInput(_) => ErrorKind::Client,
            ApiError::Transport(_) => ErrorKind::Transport,
            ApiError::HttpError { .. } => ErrorKind::Protocol,
            ApiError::DeserializationError(_) | ApiError::UnexpectedShape(_) => ErrorKind::Payload,
            ApiError::Domain(_) => ErrorKind::Domain,
        }
    }

    /// HTTP status of a protocol failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short text suitable for a user notice: the server's own message when
    /// one was sent, otherwise the error's display form.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::HttpError {
                detail: Some(detail),
                ..
            } => detail.clone(),
            other => other.to_string(),
        }
    }
}
