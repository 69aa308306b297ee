//! Plumbing shared by every service: request scaffolding, status checks,
//! and JSON (de)serialization.
//!
//! # Design
//! `BaseService` holds the configuration and the transport and carries no
//! mutable state between calls. Services build an `HttpRequest` through it,
//! hand it to `send`, and turn the `HttpResponse` into a typed value with
//! `decode`. Keeping these steps separate lets every `build_*` and `parse_*`
//! be tested on plain data.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::config::ServiceConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::Transport;

pub(crate) const JSON: &str = "application/json";
pub(crate) const MERGE_PATCH_JSON: &str = "application/merge-patch+json";

#[derive(Debug, Clone)]
pub(crate) struct BaseService<T> {
    config: ServiceConfig,
    transport: T,
}

impl<T: Transport> BaseService<T> {
    pub(crate) fn new(config: ServiceConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub(crate) fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Start a request for the path made of `segments` under the service URL,
    /// with the headers every call carries.
    ///
    /// Each segment is percent-encoded on its own, so `/`, `?` and `#` inside
    /// an id stay part of that id.
    pub(crate) fn request(
        &self,
        method: HttpMethod,
        segments: &[&str],
    ) -> Result<HttpRequest, ApiError> {
        let mut url = Url::parse(&self.config.service_url)?;
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidConfig {
                key: "service_url".to_string(),
                message: format!("'{}' cannot be a base URL", self.config.service_url),
            })?
            .pop_if_empty()
            .extend(segments);

        let mut req = HttpRequest::new(method, url.into())
            .header("accept", JSON)
            .header("user-agent", &self.config.user_agent);
        req.headers.extend(self.config.default_headers.iter().cloned());
        Ok(req)
    }

    pub(crate) fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), path = %request.path, "sending request");
        self.transport.execute(request)
    }
}

pub(crate) fn encode<B: Serialize>(body: &B) -> Result<String, ApiError> {
    serde_json::to_string(body).map_err(|e| ApiError::SerializationError(e.to_string()))
}

/// Check the status, then deserialize the body.
pub(crate) fn decode<R: DeserializeOwned>(
    response: HttpResponse,
    expected: u16,
) -> Result<R, ApiError> {
    check_status(&response, expected)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
pub(crate) fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

/// Reject an empty required parameter.
pub(crate) fn require(field: &'static str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::MissingField { field });
    }
    Ok(())
}

/// Reject an id that cannot be sent as a single path segment.
///
/// `.` and `..` would be resolved away by URL normalization instead of being
/// encoded.
pub(crate) fn require_path_id(field: &'static str, value: &str) -> Result<(), ApiError> {
    require(field, value)?;
    if value == "." || value == ".." {
        return Err(ApiError::invalid_field(
            field,
            format!("'{value}' is not a valid path segment"),
        ));
    }
    Ok(())
}
