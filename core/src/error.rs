//! Error types for the toolchain client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the resource does not exist" from "the server returned an unexpected
//! status." All other non-2xx responses land in `HttpError` with the raw
//! status code and body for debugging.
//!
//! Failures are grouped so callers can react per category: option validation
//! (`MissingField`, `InvalidField`) happens before any I/O, transport failures
//! (`Transport`, `Timeout`) come from the network, and decode failures
//! (`DeserializationError`) mean the server answered with an unexpected body.

use thiserror::Error;

/// Errors returned by the services, the pager, and the transport.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a status other than the expected one and not 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The request never produced a response (connection refused, reset, DNS).
    #[error("transport failure: {message}")]
    Transport { message: String },

    #[error("request timed out: {message}")]
    Timeout { message: String },

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A required parameter was absent or empty.
    #[error("missing required parameter: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for '{field}': {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },

    /// A required configuration key was not set.
    #[error("missing configuration: {key}")]
    MissingConfig { key: String },

    #[error("invalid configuration value for '{key}': {message}")]
    InvalidConfig { key: String, message: String },

    /// `get_next` was called after the last page had already been returned.
    #[error("no more pages: the pager has already returned the last page")]
    PagerExhausted,
}

impl ApiError {
    pub(crate) fn invalid_field(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            message: message.into(),
        }
    }

    /// True for failures raised before any request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ApiError::MissingField { .. } | ApiError::InvalidField { .. }
        )
    }

    /// True for failures where the server was never heard from.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport { .. } | ApiError::Timeout { .. })
    }

    /// HTTP status of a server-reported failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound => Some(404),
            ApiError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }
}
