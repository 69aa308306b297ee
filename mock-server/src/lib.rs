use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use url::form_urlencoded;
use uuid::Uuid;

pub const DEFAULT_LIMIT: usize = 20;
pub const MAX_LIMIT: usize = 200;

// --- schema ---

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Toolchain {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub account_id: String,
    pub location: String,
    pub resource_group_id: String,
    pub crn: String,
    pub href: String,
    pub ui_href: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tool {
    pub id: Uuid,
    pub toolchain_id: Uuid,
    pub tool_type_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub resource_group_id: String,
    pub crn: String,
    pub toolchain_crn: String,
    pub href: String,
    pub parameters: Map<String, Value>,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Resource {
    pub resource_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    pub read_only: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Link {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    pub href: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToolchainCollection {
    pub total_count: usize,
    pub limit: usize,
    pub first: Link,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<Link>,
    pub last: Link,
    pub toolchains: Vec<Toolchain>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToolCollection {
    pub total_count: usize,
    pub limit: usize,
    pub first: Link,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<Link>,
    pub last: Link,
    pub tools: Vec<Tool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Resources {
    pub offset: usize,
    pub limit: usize,
    pub resources: Vec<Resource>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status_code: u16,
    pub message: String,
}

#[derive(Deserialize)]
pub struct CreateToolchain {
    pub name: String,
    pub resource_group_id: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize)]
pub struct UpdateToolchain {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateTool {
    pub tool_type_id: String,
    pub name: Option<String>,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

#[derive(Deserialize)]
pub struct UpdateTool {
    pub name: Option<String>,
    pub tool_type_id: Option<String>,
    pub parameters: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
pub struct CreateResource {
    pub resource_id: String,
    pub name: String,
    pub tag: Option<String>,
}

#[derive(Deserialize)]
pub struct ListToolchainsQuery {
    pub resource_group_id: Option<String>,
    pub limit: Option<usize>,
    pub start: Option<String>,
    pub name: Option<String>,
}

#[derive(Deserialize)]
pub struct PageQuery {
    pub limit: Option<usize>,
    pub start: Option<String>,
}

// --- state ---

#[derive(Default)]
pub struct Store {
    toolchains: Vec<Toolchain>,
    tools: Vec<Tool>,
    resources: Vec<Resource>,
}

pub type Db = Arc<RwLock<Store>>;

type ApiResult<T> = Result<T, (StatusCode, Json<ErrorBody>)>;

fn error(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<ErrorBody>) {
    (
        status,
        Json(ErrorBody {
            status_code: status.as_u16(),
            message: message.into(),
        }),
    )
}

fn not_found(what: &str) -> (StatusCode, Json<ErrorBody>) {
    error(StatusCode::NOT_FOUND, format!("{what} not found"))
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/toolchains", get(list_toolchains).post(create_toolchain))
        .route(
            "/toolchains/{id}",
            get(get_toolchain).patch(update_toolchain).delete(delete_toolchain),
        )
        .route("/toolchains/{id}/tools", get(list_tools).post(create_tool))
        .route(
            "/toolchains/{id}/tools/{tool_id}",
            get(get_tool).patch(update_tool).delete(delete_tool),
        )
        .route("/resources", get(list_resources).post(create_resource))
        .route("/resources/{id}", get(get_resource))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// --- pagination ---

/// One page of `items`. The `start` cursor is the offset of the page's first
/// item, which clients must treat as opaque.
struct Page<T> {
    items: Vec<T>,
    total_count: usize,
    limit: usize,
    first: Link,
    previous: Option<Link>,
    next: Option<Link>,
    last: Link,
}

fn paginate<T: Clone>(
    items: &[T],
    limit: Option<usize>,
    start: Option<&str>,
    base_href: &str,
    filters: &[(&str, &str)],
) -> ApiResult<Page<T>> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(error(
            StatusCode::BAD_REQUEST,
            format!("limit must be between 1 and {MAX_LIMIT}"),
        ));
    }
    let offset = match start {
        None => 0,
        Some(raw) => raw
            .parse::<usize>()
            .ok()
            .filter(|offset| *offset < items.len())
            .ok_or_else(|| error(StatusCode::BAD_REQUEST, format!("invalid start '{raw}'")))?,
    };

    let link = |start: Option<usize>| {
        let start = start.map(|s| s.to_string());
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair("limit", &limit.to_string());
        query.extend_pairs(filters);
        if let Some(start) = &start {
            query.append_pair("start", start);
        }
        Link {
            href: format!("{base_href}?{}", query.finish()),
            start,
        }
    };

    let end = (offset + limit).min(items.len());
    let last_offset = items.len().saturating_sub(1) / limit * limit;
    Ok(Page {
        items: items[offset..end].to_vec(),
        total_count: items.len(),
        limit,
        first: link(None),
        previous: (offset > 0).then(|| link(Some(offset.saturating_sub(limit)))),
        next: (end < items.len()).then(|| link(Some(end))),
        last: link((last_offset > 0).then_some(last_offset)),
    })
}

// --- toolchains ---

async fn list_toolchains(
    State(db): State<Db>,
    Query(query): Query<ListToolchainsQuery>,
) -> ApiResult<Json<ToolchainCollection>> {
    let Some(resource_group_id) = query.resource_group_id.filter(|s| !s.is_empty()) else {
        return Err(error(StatusCode::BAD_REQUEST, "resource_group_id is required"));
    };
    let store = db.read().await;
    let matching: Vec<Toolchain> = store
        .toolchains
        .iter()
        .filter(|t| t.resource_group_id == resource_group_id)
        .filter(|t| query.name.as_ref().map_or(true, |name| &t.name == name))
        .cloned()
        .collect();

    let mut filters = vec![("resource_group_id", resource_group_id.as_str())];
    if let Some(name) = &query.name {
        filters.push(("name", name.as_str()));
    }
    let page = paginate(
        &matching,
        query.limit,
        query.start.as_deref(),
        "/toolchains",
        &filters,
    )?;
    tracing::debug!(returned = page.items.len(), total = page.total_count, "listed toolchains");
    Ok(Json(ToolchainCollection {
        total_count: page.total_count,
        limit: page.limit,
        first: page.first,
        previous: page.previous,
        next: page.next,
        last: page.last,
        toolchains: page.items,
    }))
}

async fn create_toolchain(
    State(db): State<Db>,
    Json(input): Json<CreateToolchain>,
) -> ApiResult<(StatusCode, Json<Toolchain>)> {
    if input.name.trim().is_empty() || input.resource_group_id.trim().is_empty() {
        return Err(error(
            StatusCode::BAD_REQUEST,
            "name and resource_group_id are required",
        ));
    }
    let id = Uuid::new_v4();
    let now = Utc::now();
    let toolchain = Toolchain {
        id,
        name: input.name,
        description: input.description,
        account_id: "mock-account".to_string(),
        location: "us-south".to_string(),
        resource_group_id: input.resource_group_id,
        crn: format!("crn:v1:mock:public:toolchain:us-south:a/mock-account:{id}::"),
        href: format!("/toolchains/{id}"),
        ui_href: format!("/devops/toolchains/{id}"),
        created_at: now,
        updated_at: now,
        created_by: "mock-user".to_string(),
    };
    db.write().await.toolchains.push(toolchain.clone());
    Ok((StatusCode::CREATED, Json(toolchain)))
}

async fn get_toolchain(State(db): State<Db>, Path(id): Path<Uuid>) -> ApiResult<Json<Toolchain>> {
    let store = db.read().await;
    store
        .toolchains
        .iter()
        .find(|t| t.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found("toolchain"))
}

async fn update_toolchain(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateToolchain>,
) -> ApiResult<Json<Toolchain>> {
    let mut store = db.write().await;
    let toolchain = store
        .toolchains
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| not_found("toolchain"))?;
    if let Some(name) = input.name {
        toolchain.name = name;
    }
    if let Some(description) = input.description {
        toolchain.description = description;
    }
    toolchain.updated_at = Utc::now();
    Ok(Json(toolchain.clone()))
}

async fn delete_toolchain(State(db): State<Db>, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    let before = store.toolchains.len();
    store.toolchains.retain(|t| t.id != id);
    if store.toolchains.len() == before {
        return Err(not_found("toolchain"));
    }
    store.tools.retain(|t| t.toolchain_id != id);
    Ok(StatusCode::NO_CONTENT)
}

// --- tools ---

async fn list_tools(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<ToolCollection>> {
    let store = db.read().await;
    if !store.toolchains.iter().any(|t| t.id == id) {
        return Err(not_found("toolchain"));
    }
    let tools: Vec<Tool> = store
        .tools
        .iter()
        .filter(|t| t.toolchain_id == id)
        .cloned()
        .collect();
    let page = paginate(
        &tools,
        query.limit,
        query.start.as_deref(),
        &format!("/toolchains/{id}/tools"),
        &[],
    )?;
    Ok(Json(ToolCollection {
        total_count: page.total_count,
        limit: page.limit,
        first: page.first,
        previous: page.previous,
        next: page.next,
        last: page.last,
        tools: page.items,
    }))
}

async fn create_tool(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<CreateTool>,
) -> ApiResult<(StatusCode, Json<Tool>)> {
    if input.tool_type_id.trim().is_empty() {
        return Err(error(StatusCode::BAD_REQUEST, "tool_type_id is required"));
    }
    let mut store = db.write().await;
    let toolchain = store
        .toolchains
        .iter()
        .find(|t| t.id == id)
        .ok_or_else(|| not_found("toolchain"))?;
    let tool_id = Uuid::new_v4();
    let now = Utc::now();
    let tool = Tool {
        id: tool_id,
        toolchain_id: id,
        tool_type_id: input.tool_type_id,
        name: input.name,
        resource_group_id: toolchain.resource_group_id.clone(),
        crn: format!("crn:v1:mock:public:toolchain:us-south:a/mock-account:{id}:tool:{tool_id}"),
        toolchain_crn: toolchain.crn.clone(),
        href: format!("/toolchains/{id}/tools/{tool_id}"),
        parameters: input.parameters,
        state: "configured".to_string(),
        created_at: now,
        updated_at: now,
    };
    store.tools.push(tool.clone());
    Ok((StatusCode::CREATED, Json(tool)))
}

async fn get_tool(
    State(db): State<Db>,
    Path((id, tool_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<Tool>> {
    let store = db.read().await;
    store
        .tools
        .iter()
        .find(|t| t.toolchain_id == id && t.id == tool_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found("tool"))
}

async fn update_tool(
    State(db): State<Db>,
    Path((id, tool_id)): Path<(Uuid, Uuid)>,
    Json(input): Json<UpdateTool>,
) -> ApiResult<Json<Tool>> {
    let mut store = db.write().await;
    let tool = store
        .tools
        .iter_mut()
        .find(|t| t.toolchain_id == id && t.id == tool_id)
        .ok_or_else(|| not_found("tool"))?;
    if let Some(name) = input.name {
        tool.name = Some(name);
    }
    if let Some(tool_type_id) = input.tool_type_id {
        tool.tool_type_id = tool_type_id;
    }
    if let Some(parameters) = input.parameters {
        // merge-patch: null removes a key, anything else replaces it
        for (key, value) in parameters {
            if value.is_null() {
                tool.parameters.remove(&key);
            } else {
                tool.parameters.insert(key, value);
            }
        }
    }
    tool.updated_at = Utc::now();
    Ok(Json(tool.clone()))
}

async fn delete_tool(
    State(db): State<Db>,
    Path((id, tool_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    let before = store.tools.len();
    store
        .tools
        .retain(|t| !(t.toolchain_id == id && t.id == tool_id));
    if store.tools.len() == before {
        return Err(not_found("tool"));
    }
    Ok(StatusCode::NO_CONTENT)
}

// --- example resources ---

async fn list_resources(
    State(db): State<Db>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<Resources>> {
    let store = db.read().await;
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    if limit == 0 {
        return Err(error(StatusCode::BAD_REQUEST, "limit must be positive"));
    }
    Ok(Json(Resources {
        offset: 0,
        limit,
        resources: store.resources.iter().take(limit).cloned().collect(),
    }))
}

async fn create_resource(
    State(db): State<Db>,
    Json(input): Json<CreateResource>,
) -> ApiResult<(StatusCode, Json<Resource>)> {
    let mut store = db.write().await;
    if store
        .resources
        .iter()
        .any(|r| r.resource_id == input.resource_id)
    {
        return Err(error(
            StatusCode::CONFLICT,
            format!("resource '{}' already exists", input.resource_id),
        ));
    }
    let resource = Resource {
        resource_id: input.resource_id,
        name: input.name,
        tag: input.tag,
        read_only: "false".to_string(),
    };
    store.resources.push(resource.clone());
    Ok((StatusCode::CREATED, Json(resource)))
}

async fn get_resource(State(db): State<Db>, Path(id): Path<String>) -> ApiResult<Json<Resource>> {
    let store = db.read().await;
    store
        .resources
        .iter()
        .find(|r| r.resource_id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found("resource"))
}
