//! Client for the toolchain API: toolchains and the tools bound to them.
//!
//! # Design
//! Every operation is split into `build_*`, which validates its inputs and
//! produces an `HttpRequest`, and `parse_*`, which consumes an
//! `HttpResponse`. The method named after the operation runs both around one
//! `Transport::execute` call. Both list endpoints are cursor-paginated and
//! can be consumed page by page through [`ToolchainsPager`] / [`ToolsPager`].

use crate::client::{
    check_status, decode, encode, require, require_path_id, BaseService, JSON, MERGE_PATCH_JSON,
};
use crate::config::ServiceConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::pager::{PageSource, PagedOptions, Pager};
use crate::transport::{Transport, UreqTransport};
use crate::types::{
    CreateToolOptions, CreateToolchainOptions, Tool, ToolCollection, ToolPatch, Toolchain,
    ToolchainCollection, ToolchainPatch,
};

/// Service name used to look up environment configuration.
pub const DEFAULT_SERVICE_NAME: &str = "cd_toolchain";

/// Largest page size the list endpoints accept.
pub const MAX_PAGE_LIMIT: i64 = 200;

pub type ToolchainsPager<'a, T> = Pager<'a, ToolchainService<T>, ListToolchainsOptions>;
pub type ToolsPager<'a, T> = Pager<'a, ToolchainService<T>, ListToolsOptions>;

/// Query parameters for `GET /toolchains`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListToolchainsOptions {
    pub resource_group_id: String,
    pub limit: Option<i64>,
    pub start: Option<String>,
    /// Exact-match filter on the toolchain name.
    pub name: Option<String>,
}

impl ListToolchainsOptions {
    pub fn new(resource_group_id: impl Into<String>) -> Self {
        Self {
            resource_group_id: resource_group_id.into(),
            limit: None,
            start: None,
            name: None,
        }
    }

    #[must_use]
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn start(mut self, start: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl PagedOptions for ListToolchainsOptions {
    fn validate(&self) -> Result<(), ApiError> {
        require("resource_group_id", &self.resource_group_id)?;
        validate_limit(self.limit)
    }

    fn start_token(&self) -> Option<&str> {
        self.start.as_deref()
    }

    fn set_start(&mut self, start: Option<String>) {
        self.start = start;
    }
}

/// Query parameters for `GET /toolchains/{toolchain_id}/tools`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListToolsOptions {
    pub toolchain_id: String,
    pub limit: Option<i64>,
    pub start: Option<String>,
}

impl ListToolsOptions {
    pub fn new(toolchain_id: impl Into<String>) -> Self {
        Self {
            toolchain_id: toolchain_id.into(),
            limit: None,
            start: None,
        }
    }

    #[must_use]
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn start(mut self, start: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self
    }
}

impl PagedOptions for ListToolsOptions {
    fn validate(&self) -> Result<(), ApiError> {
        require_path_id("toolchain_id", &self.toolchain_id)?;
        validate_limit(self.limit)
    }

    fn start_token(&self) -> Option<&str> {
        self.start.as_deref()
    }

    fn set_start(&mut self, start: Option<String>) {
        self.start = start;
    }
}

fn validate_limit(limit: Option<i64>) -> Result<(), ApiError> {
    match limit {
        Some(limit) if !(1..=MAX_PAGE_LIMIT).contains(&limit) => Err(ApiError::invalid_field(
            "limit",
            format!("must be between 1 and {MAX_PAGE_LIMIT}, got {limit}"),
        )),
        _ => Ok(()),
    }
}

/// Synchronous client for the toolchain API.
#[derive(Debug, Clone)]
pub struct ToolchainService<T = UreqTransport> {
    base: BaseService<T>,
}

impl ToolchainService<UreqTransport> {
    /// Build a service that talks HTTP through `ureq`.
    pub fn with_config(config: ServiceConfig) -> Self {
        let transport = UreqTransport::new(&config);
        Self::new(config, transport)
    }

    /// Build a service from the `CD_TOOLCHAIN_*` environment variables.
    pub fn from_env() -> Result<Self, ApiError> {
        Ok(Self::with_config(ServiceConfig::from_env(DEFAULT_SERVICE_NAME)?))
    }
}

impl<T: Transport> ToolchainService<T> {
    pub fn new(config: ServiceConfig, transport: T) -> Self {
        Self {
            base: BaseService::new(config, transport),
        }
    }

    pub fn service_url(&self) -> &str {
        &self.base.config().service_url
    }

    // -- toolchains ---------------------------------------------------------

    pub fn build_list_toolchains(
        &self,
        options: &ListToolchainsOptions,
    ) -> Result<HttpRequest, ApiError> {
        options.validate()?;
        Ok(self
            .base
            .request(HttpMethod::Get, &["toolchains"])?
            .query_param("resource_group_id", Some(&options.resource_group_id))
            .query_param("limit", options.limit)
            .query_param("start", options.start.as_ref())
            .query_param("name", options.name.as_ref()))
    }

    pub fn parse_list_toolchains(
        &self,
        response: HttpResponse,
    ) -> Result<ToolchainCollection, ApiError> {
        decode(response, 200)
    }

    /// Fetch a single page of toolchains.
    pub fn list_toolchains(
        &self,
        options: &ListToolchainsOptions,
    ) -> Result<ToolchainCollection, ApiError> {
        let req = self.build_list_toolchains(options)?;
        self.parse_list_toolchains(self.base.send(&req)?)
    }

    /// Iterate over every toolchain matching `options`.
    pub fn toolchains_pager(
        &self,
        options: ListToolchainsOptions,
    ) -> Result<ToolchainsPager<'_, T>, ApiError> {
        Pager::new(self, options)
    }

    pub fn build_create_toolchain(
        &self,
        input: &CreateToolchainOptions,
    ) -> Result<HttpRequest, ApiError> {
        require("name", &input.name)?;
        require("resource_group_id", &input.resource_group_id)?;
        Ok(self
            .base
            .request(HttpMethod::Post, &["toolchains"])?
            .json_body(JSON, encode(input)?))
    }

    pub fn parse_create_toolchain(&self, response: HttpResponse) -> Result<Toolchain, ApiError> {
        decode(response, 201)
    }

    pub fn create_toolchain(&self, input: &CreateToolchainOptions) -> Result<Toolchain, ApiError> {
        let req = self.build_create_toolchain(input)?;
        self.parse_create_toolchain(self.base.send(&req)?)
    }

    pub fn build_get_toolchain_by_id(&self, toolchain_id: &str) -> Result<HttpRequest, ApiError> {
        require_path_id("toolchain_id", toolchain_id)?;
        self.base
            .request(HttpMethod::Get, &["toolchains", toolchain_id])
    }

    pub fn parse_get_toolchain_by_id(&self, response: HttpResponse) -> Result<Toolchain, ApiError> {
        decode(response, 200)
    }

    pub fn get_toolchain_by_id(&self, toolchain_id: &str) -> Result<Toolchain, ApiError> {
        let req = self.build_get_toolchain_by_id(toolchain_id)?;
        self.parse_get_toolchain_by_id(self.base.send(&req)?)
    }

    pub fn build_update_toolchain(
        &self,
        toolchain_id: &str,
        patch: &ToolchainPatch,
    ) -> Result<HttpRequest, ApiError> {
        require_path_id("toolchain_id", toolchain_id)?;
        Ok(self
            .base
            .request(HttpMethod::Patch, &["toolchains", toolchain_id])?
            .json_body(MERGE_PATCH_JSON, encode(patch)?))
    }

    pub fn parse_update_toolchain(&self, response: HttpResponse) -> Result<Toolchain, ApiError> {
        decode(response, 200)
    }

    pub fn update_toolchain(
        &self,
        toolchain_id: &str,
        patch: &ToolchainPatch,
    ) -> Result<Toolchain, ApiError> {
        let req = self.build_update_toolchain(toolchain_id, patch)?;
        self.parse_update_toolchain(self.base.send(&req)?)
    }

    pub fn build_delete_toolchain(&self, toolchain_id: &str) -> Result<HttpRequest, ApiError> {
        require_path_id("toolchain_id", toolchain_id)?;
        self.base
            .request(HttpMethod::Delete, &["toolchains", toolchain_id])
    }

    pub fn parse_delete_toolchain(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }

    pub fn delete_toolchain(&self, toolchain_id: &str) -> Result<(), ApiError> {
        let req = self.build_delete_toolchain(toolchain_id)?;
        self.parse_delete_toolchain(self.base.send(&req)?)
    }

    // -- tools --------------------------------------------------------------

    pub fn build_list_tools(&self, options: &ListToolsOptions) -> Result<HttpRequest, ApiError> {
        options.validate()?;
        Ok(self
            .base
            .request(
                HttpMethod::Get,
                &["toolchains", options.toolchain_id.as_str(), "tools"],
            )?
            .query_param("limit", options.limit)
            .query_param("start", options.start.as_ref()))
    }

    pub fn parse_list_tools(&self, response: HttpResponse) -> Result<ToolCollection, ApiError> {
        decode(response, 200)
    }

    /// Fetch a single page of tools.
    pub fn list_tools(&self, options: &ListToolsOptions) -> Result<ToolCollection, ApiError> {
        let req = self.build_list_tools(options)?;
        self.parse_list_tools(self.base.send(&req)?)
    }

    /// Iterate over every tool in a toolchain.
    pub fn tools_pager(&self, options: ListToolsOptions) -> Result<ToolsPager<'_, T>, ApiError> {
        Pager::new(self, options)
    }

    pub fn build_create_tool(
        &self,
        toolchain_id: &str,
        input: &CreateToolOptions,
    ) -> Result<HttpRequest, ApiError> {
        require_path_id("toolchain_id", toolchain_id)?;
        require("tool_type_id", &input.tool_type_id)?;
        Ok(self
            .base
            .request(HttpMethod::Post, &["toolchains", toolchain_id, "tools"])?
            .json_body(JSON, encode(input)?))
    }

    pub fn parse_create_tool(&self, response: HttpResponse) -> Result<Tool, ApiError> {
        decode(response, 201)
    }

    pub fn create_tool(
        &self,
        toolchain_id: &str,
        input: &CreateToolOptions,
    ) -> Result<Tool, ApiError> {
        let req = self.build_create_tool(toolchain_id, input)?;
        self.parse_create_tool(self.base.send(&req)?)
    }

    pub fn build_get_tool_by_id(
        &self,
        toolchain_id: &str,
        tool_id: &str,
    ) -> Result<HttpRequest, ApiError> {
        require_path_id("toolchain_id", toolchain_id)?;
        require_path_id("tool_id", tool_id)?;
        self.base.request(
            HttpMethod::Get,
            &["toolchains", toolchain_id, "tools", tool_id],
        )
    }

    pub fn parse_get_tool_by_id(&self, response: HttpResponse) -> Result<Tool, ApiError> {
        decode(response, 200)
    }

    pub fn get_tool_by_id(&self, toolchain_id: &str, tool_id: &str) -> Result<Tool, ApiError> {
        let req = self.build_get_tool_by_id(toolchain_id, tool_id)?;
        self.parse_get_tool_by_id(self.base.send(&req)?)
    }

    pub fn build_update_tool(
        &self,
        toolchain_id: &str,
        tool_id: &str,
        patch: &ToolPatch,
    ) -> Result<HttpRequest, ApiError> {
        require_path_id("toolchain_id", toolchain_id)?;
        require_path_id("tool_id", tool_id)?;
        Ok(self
            .base
            .request(
                HttpMethod::Patch,
                &["toolchains", toolchain_id, "tools", tool_id],
            )?
            .json_body(MERGE_PATCH_JSON, encode(patch)?))
    }

    pub fn parse_update_tool(&self, response: HttpResponse) -> Result<Tool, ApiError> {
        decode(response, 200)
    }

    pub fn update_tool(
        &self,
        toolchain_id: &str,
        tool_id: &str,
        patch: &ToolPatch,
    ) -> Result<Tool, ApiError> {
        let req = self.build_update_tool(toolchain_id, tool_id, patch)?;
        self.parse_update_tool(self.base.send(&req)?)
    }

    pub fn build_delete_tool(
        &self,
        toolchain_id: &str,
        tool_id: &str,
    ) -> Result<HttpRequest, ApiError> {
        require_path_id("toolchain_id", toolchain_id)?;
        require_path_id("tool_id", tool_id)?;
        self.base.request(
            HttpMethod::Delete,
            &["toolchains", toolchain_id, "tools", tool_id],
        )
    }

    pub fn parse_delete_tool(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }

    pub fn delete_tool(&self, toolchain_id: &str, tool_id: &str) -> Result<(), ApiError> {
        let req = self.build_delete_tool(toolchain_id, tool_id)?;
        self.parse_delete_tool(self.base.send(&req)?)
    }
}

impl<T: Transport> PageSource<ListToolchainsOptions> for ToolchainService<T> {
    type Page = ToolchainCollection;

    fn fetch_page(&self, options: &ListToolchainsOptions) -> Result<ToolchainCollection, ApiError> {
        self.list_toolchains(options)
    }
}

impl<T: Transport> PageSource<ListToolsOptions> for ToolchainService<T> {
    type Page = ToolCollection;

    fn fetch_page(&self, options: &ListToolsOptions) -> Result<ToolCollection, ApiError> {
        self.list_tools(options)
    }
}
