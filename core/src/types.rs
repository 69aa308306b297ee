//! Wire DTOs for the toolchain and example resource APIs.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! the integration tests catch any schema drift between the two crates.
//! Navigation links and server-computed fields are optional so that a sparse
//! response still decodes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::pager::PagedCollection;

// ---------------------------------------------------------------------------
// Toolchains
// ---------------------------------------------------------------------------

/// A toolchain as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Toolchain {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub account_id: Option<String>,
    pub location: Option<String>,
    pub resource_group_id: String,
    pub crn: Option<String>,
    pub href: Option<String>,
    pub ui_href: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
}

/// Link to the first page of a collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FirstPageLink {
    pub href: String,
}

/// Link to a non-first page of a collection, carrying its `start` cursor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageLink {
    pub start: Option<String>,
    pub href: Option<String>,
}

/// One page of toolchains.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolchainCollection {
    pub total_count: Option<i64>,
    pub limit: Option<i64>,
    pub first: Option<FirstPageLink>,
    pub previous: Option<PageLink>,
    pub next: Option<PageLink>,
    pub last: Option<PageLink>,
    #[serde(default)]
    pub toolchains: Vec<Toolchain>,
}

impl PagedCollection for ToolchainCollection {
    type Item = Toolchain;

    fn next_start(&self) -> Option<&str> {
        next_start(self.next.as_ref())
    }

    fn into_items(self) -> Vec<Toolchain> {
        self.toolchains
    }
}

/// Request payload for `POST /toolchains`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateToolchainOptions {
    pub name: String,
    pub resource_group_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateToolchainOptions {
    pub fn new(name: impl Into<String>, resource_group_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resource_group_id: resource_group_id.into(),
            description: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Merge-patch payload for `PATCH /toolchains/{id}`. Omitted fields are left
/// unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolchainPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Tools
// ---------------------------------------------------------------------------

/// Where a tool integration lives outside the toolchain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolReferent {
    pub ui_href: Option<String>,
    pub api_href: Option<String>,
}

/// A tool integration bound to a toolchain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tool {
    pub id: String,
    pub toolchain_id: String,
    pub tool_type_id: String,
    pub name: Option<String>,
    pub resource_group_id: Option<String>,
    pub crn: Option<String>,
    pub toolchain_crn: Option<String>,
    pub href: Option<String>,
    pub referent: Option<ToolReferent>,
    /// Tool-specific settings; the schema depends on `tool_type_id`.
    #[serde(default)]
    pub parameters: Map<String, Value>,
    pub state: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// One page of tools.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCollection {
    pub total_count: Option<i64>,
    pub limit: Option<i64>,
    pub first: Option<FirstPageLink>,
    pub previous: Option<PageLink>,
    pub next: Option<PageLink>,
    pub last: Option<PageLink>,
    #[serde(default)]
    pub tools: Vec<Tool>,
}

impl PagedCollection for ToolCollection {
    type Item = Tool;

    fn next_start(&self) -> Option<&str> {
        next_start(self.next.as_ref())
    }

    fn into_items(self) -> Vec<Tool> {
        self.tools
    }
}

/// Request payload for `POST /toolchains/{toolchain_id}/tools`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateToolOptions {
    pub tool_type_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Map<String, Value>>,
}

impl CreateToolOptions {
    pub fn new(tool_type_id: impl Into<String>) -> Self {
        Self {
            tool_type_id: tool_type_id.into(),
            name: None,
            parameters: None,
        }
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn parameters(mut self, parameters: Map<String, Value>) -> Self {
        self.parameters = Some(parameters);
        self
    }
}

/// Merge-patch payload for `PATCH /toolchains/{toolchain_id}/tools/{tool_id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ToolPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_type_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Map<String, Value>>,
}

// A `next` link without a usable `start` ends the listing just like a
// missing `next`.
fn next_start(next: Option<&PageLink>) -> Option<&str> {
    next.and_then(|link| link.start.as_deref())
        .filter(|start| !start.is_empty())
}

// ---------------------------------------------------------------------------
// Example resources
// ---------------------------------------------------------------------------

/// A resource managed by the example service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resource {
    pub resource_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<String>,
}

/// Response of `GET /resources`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Resources {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

/// Request payload for `POST /resources`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateResource {
    pub resource_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl CreateResource {
    pub fn new(resource_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            name: name.into(),
            tag: None,
        }
    }

    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}
