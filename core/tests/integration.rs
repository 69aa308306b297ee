//! End-to-end tests against the live mock server.
//!
//! # Design
//! Each test starts the mock server on a random port, then drives the core
//! services over real HTTP through `UreqTransport`. This validates request
//! building, the blocking transport, response parsing, and both pagers
//! against the actual server schema.

use std::time::Duration;

use serde_json::json;
use toolchain_core::{
    ApiError, CreateResource, CreateToolOptions, CreateToolchainOptions, ExampleService,
    ListToolchainsOptions, ListToolsOptions, ServiceConfig, ToolPatch, ToolchainPatch,
    ToolchainService,
};

/// Start the mock server on an ephemeral port and return its base URL.
fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn config(base_url: &str) -> ServiceConfig {
    ServiceConfig::new(base_url).timeout(Duration::from_secs(10))
}

#[test]
fn toolchain_lifecycle() {
    let service = ToolchainService::with_config(config(&start_server()));

    // Step 1: list, should be empty.
    let page = service
        .list_toolchains(&ListToolchainsOptions::new("rg-1"))
        .unwrap();
    assert!(page.toolchains.is_empty(), "expected empty list");
    assert!(page.next.is_none());

    // Step 2: create.
    let created = service
        .create_toolchain(&CreateToolchainOptions::new("Integration", "rg-1").description("e2e"))
        .unwrap();
    assert_eq!(created.name, "Integration");
    assert_eq!(created.description, "e2e");
    assert!(created.created_at.is_some());
    let id = created.id.clone();

    // Step 3: get.
    let fetched = service.get_toolchain_by_id(&id).unwrap();
    assert_eq!(fetched, created);

    // Step 4: update name only.
    let patch = ToolchainPatch {
        name: Some("Renamed".to_string()),
        description: None,
    };
    let updated = service.update_toolchain(&id, &patch).unwrap();
    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.description, "e2e");

    // Step 5: tools.
    let mut params = serde_json::Map::new();
    params.insert("repo_url".into(), json!("https://github.com/a/b"));
    let tool = service
        .create_tool(
            &id,
            &CreateToolOptions::new("github").name("repo").parameters(params),
        )
        .unwrap();
    assert_eq!(tool.toolchain_id, id);
    assert_eq!(tool.parameters["repo_url"], "https://github.com/a/b");

    let fetched_tool = service.get_tool_by_id(&id, &tool.id).unwrap();
    assert_eq!(fetched_tool.name.as_deref(), Some("repo"));

    let patched = service
        .update_tool(
            &id,
            &tool.id,
            &ToolPatch {
                name: Some("renamed repo".into()),
                ..ToolPatch::default()
            },
        )
        .unwrap();
    assert_eq!(patched.name.as_deref(), Some("renamed repo"));
    assert_eq!(patched.tool_type_id, "github");

    service.delete_tool(&id, &tool.id).unwrap();
    let err = service.get_tool_by_id(&id, &tool.id).unwrap_err();
    assert!(matches!(err, ApiError::NotFound));

    // Step 6: delete the toolchain.
    service.delete_toolchain(&id).unwrap();
    let err = service.get_toolchain_by_id(&id).unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
    let err = service.delete_toolchain(&id).unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
}

#[test]
fn toolchains_pager_walks_every_page() {
    let service = ToolchainService::with_config(config(&start_server()));
    for i in 0..5 {
        service
            .create_toolchain(&CreateToolchainOptions::new(format!("tc{i}"), "rg-1"))
            .unwrap();
    }
    service
        .create_toolchain(&CreateToolchainOptions::new("elsewhere", "rg-2"))
        .unwrap();

    let options = ListToolchainsOptions::new("rg-1").limit(2);

    let mut pager = service.toolchains_pager(options.clone()).unwrap();
    let mut sizes = Vec::new();
    let mut stepped = Vec::new();
    while pager.has_next() {
        let items = pager.get_next().unwrap();
        sizes.push(items.len());
        stepped.extend(items);
    }
    assert_eq!(sizes, vec![2, 2, 1]);
    assert!(matches!(pager.get_next(), Err(ApiError::PagerExhausted)));

    let drained = service.toolchains_pager(options).unwrap().get_all().unwrap();
    assert_eq!(drained, stepped);
    let names: Vec<&str> = drained.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["tc0", "tc1", "tc2", "tc3", "tc4"]);
}

#[test]
fn tools_pager_on_empty_toolchain() {
    let service = ToolchainService::with_config(config(&start_server()));
    let toolchain = service
        .create_toolchain(&CreateToolchainOptions::new("bare", "rg-1"))
        .unwrap();

    let mut pager = service
        .tools_pager(ListToolsOptions::new(toolchain.id))
        .unwrap();
    assert!(pager.has_next());
    assert!(pager.get_all().unwrap().is_empty());
    assert!(!pager.has_next());
}

#[test]
fn tools_pager_surfaces_server_error() {
    let service = ToolchainService::with_config(config(&start_server()));
    let mut pager = service
        .tools_pager(ListToolsOptions::new("00000000-0000-0000-0000-000000000000"))
        .unwrap();

    let err = pager.get_all().unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
    assert!(pager.has_next(), "a failed fetch must not end the listing");
}

#[test]
fn example_resources_round_trip() {
    let service = ExampleService::with_config(config(&start_server()));

    let created = service
        .create_resource(&CreateResource::new("r1", "One").tag("blue"))
        .unwrap();
    assert_eq!(created.resource_id, "r1");

    let err = service
        .create_resource(&CreateResource::new("r1", "Again"))
        .unwrap_err();
    assert!(matches!(err, ApiError::HttpError { status: 409, .. }));

    let fetched = service.get_resource("r1").unwrap();
    assert_eq!(fetched.tag.as_deref(), Some("blue"));

    let list = service.list_resources(Some(10)).unwrap();
    assert_eq!(list.resources, vec![fetched]);
}

#[test]
fn unreachable_server_is_a_transport_error() {
    // Bind then drop to get a port nothing listens on.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let service = ToolchainService::with_config(config(&format!("http://127.0.0.1:{port}")));

    let err = service
        .list_toolchains(&ListToolchainsOptions::new("rg-1"))
        .unwrap_err();
    assert!(err.is_transport(), "unexpected error: {err}");
}

#[test]
fn silent_server_is_a_timeout() {
    // Accepts connections and never answers.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        let mut held = Vec::new();
        for stream in listener.incoming() {
            held.push(stream);
        }
    });
    let service = ToolchainService::with_config(
        ServiceConfig::new(&format!("http://{addr}")).timeout(Duration::from_millis(200)),
    );

    let err = service.get_toolchain_by_id("tc-1").unwrap_err();
    assert!(matches!(err, ApiError::Timeout { .. }), "unexpected error: {err}");
    assert!(err.is_transport());
}

#[test]
fn path_ids_cannot_reach_other_routes() {
    let service = ToolchainService::with_config(config(&start_server()));
    let victim = service
        .create_toolchain(&CreateToolchainOptions::new("victim", "rg-1"))
        .unwrap();
    let owner = service
        .create_toolchain(&CreateToolchainOptions::new("owner", "rg-1"))
        .unwrap();

    let err = service
        .delete_tool(&owner.id, &format!("../../{}", victim.id))
        .unwrap_err();
    assert!(!err.is_transport(), "unexpected error: {err}");
    assert_eq!(service.get_toolchain_by_id(&victim.id).unwrap(), victim);
}
