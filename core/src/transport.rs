//! The I/O boundary.
//!
//! # Design
//! Services never open sockets themselves; they hand a finished
//! `HttpRequest` to a [`Transport`] and get an `HttpResponse` back. A
//! transport performs exactly one logical request per call: it must not
//! retry behind the caller's back, and it reports non-2xx statuses as data so
//! the services decide what a status means.
//!
//! [`UreqTransport`] is the blocking implementation used by default.

use std::fmt;

use tracing::debug;

use crate::config::ServiceConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one HTTP request and returns the raw response.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a `ureq` agent.
///
/// The agent keeps a connection pool, so one `UreqTransport` should be
/// shared by every call against the same service.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(config: &ServiceConfig) -> Self {
        // Status interpretation belongs to the services, so 4xx/5xx must come
        // back as responses rather than `Err`.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(config.timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = request.url()?;
        debug!(method = request.method.as_str(), %url, "executing request");

        let body = request.body.as_deref().map(str::as_bytes);
        let result = match request.method {
            HttpMethod::Get => with_headers(self.agent.get(&url), &request.headers).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(&url), &request.headers).call(),
            HttpMethod::Post => send(with_headers(self.agent.post(&url), &request.headers), body),
            HttpMethod::Put => send(with_headers(self.agent.put(&url), &request.headers), body),
            HttpMethod::Patch => {
                send(with_headers(self.agent.patch(&url), &request.headers), body)
            }
        };
        let mut response = result.map_err(map_ureq_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(map_ureq_error)?;

        debug!(status, bytes = body.len(), "received response");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (key, value) in headers {
        builder = builder.header(key.as_str(), value.as_str());
    }
    builder
}

fn send(
    builder: ureq::RequestBuilder<ureq::typestate::WithBody>,
    body: Option<&[u8]>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(bytes) => builder.send(bytes),
        None => builder.send_empty(),
    }
}

fn map_ureq_error(err: ureq::Error) -> ApiError {
    match err {
        ureq::Error::Timeout(_) => ApiError::Timeout {
            message: err.to_string(),
        },
        other => ApiError::Transport {
            message: other.to_string(),
        },
    }
}
