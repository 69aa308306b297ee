//! Client for the example resource API.
//!
//! `GET /resources` is limit-only and has no cursor, so this service has no
//! pager.

use crate::client::{decode, encode, require, require_path_id, BaseService, JSON};
use crate::config::ServiceConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::{CreateResource, Resource, Resources};

/// Service name used to look up environment configuration.
pub const DEFAULT_SERVICE_NAME: &str = "example_service";

/// Synchronous client for the example resource API.
#[derive(Debug, Clone)]
pub struct ExampleService<T = UreqTransport> {
    base: BaseService<T>,
}

impl ExampleService<UreqTransport> {
    pub fn with_config(config: ServiceConfig) -> Self {
        let transport = UreqTransport::new(&config);
        Self::new(config, transport)
    }

    /// Build a service from the `EXAMPLE_SERVICE_*` environment variables.
    pub fn from_env() -> Result<Self, ApiError> {
        Ok(Self::with_config(ServiceConfig::from_env(DEFAULT_SERVICE_NAME)?))
    }
}

impl<T: Transport> ExampleService<T> {
    pub fn new(config: ServiceConfig, transport: T) -> Self {
        Self {
            base: BaseService::new(config, transport),
        }
    }

    pub fn build_list_resources(&self, limit: Option<i64>) -> Result<HttpRequest, ApiError> {
        if let Some(limit) = limit.filter(|l| *l < 1) {
            return Err(ApiError::invalid_field(
                "limit",
                format!("must be positive, got {limit}"),
            ));
        }
        Ok(self
            .base
            .request(HttpMethod::Get, &["resources"])?
            .query_param("limit", limit))
    }

    pub fn parse_list_resources(&self, response: HttpResponse) -> Result<Resources, ApiError> {
        decode(response, 200)
    }

    pub fn list_resources(&self, limit: Option<i64>) -> Result<Resources, ApiError> {
        let req = self.build_list_resources(limit)?;
        self.parse_list_resources(self.base.send(&req)?)
    }

    pub fn build_create_resource(&self, input: &CreateResource) -> Result<HttpRequest, ApiError> {
        require("resource_id", &input.resource_id)?;
        require("name", &input.name)?;
        Ok(self
            .base
            .request(HttpMethod::Post, &["resources"])?
            .json_body(JSON, encode(input)?))
    }

    pub fn parse_create_resource(&self, response: HttpResponse) -> Result<Resource, ApiError> {
        decode(response, 201)
    }

    pub fn create_resource(&self, input: &CreateResource) -> Result<Resource, ApiError> {
        let req = self.build_create_resource(input)?;
        self.parse_create_resource(self.base.send(&req)?)
    }

    pub fn build_get_resource(&self, resource_id: &str) -> Result<HttpRequest, ApiError> {
        require_path_id("resource_id", resource_id)?;
        self.base.request(HttpMethod::Get, &["resources", resource_id])
    }

    pub fn parse_get_resource(&self, response: HttpResponse) -> Result<Resource, ApiError> {
        decode(response, 200)
    }

    pub fn get_resource(&self, resource_id: &str) -> Result<Resource, ApiError> {
        let req = self.build_get_resource(resource_id)?;
        self.parse_get_resource(self.base.send(&req)?)
    }
}
