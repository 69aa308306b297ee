//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use pretty_assertions::assert_eq;
use toolchain_core::{
    ApiError, CreateToolchainOptions, HttpMethod, HttpResponse, ListToolchainsOptions,
    PagedCollection, ServiceConfig, Toolchain, ToolchainService,
};

const BASE_URL: &str = "http://localhost:3000";

fn client() -> ToolchainService {
    ToolchainService::with_config(ServiceConfig::new(BASE_URL))
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated(case: &serde_json::Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn string_pairs(value: &serde_json::Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|pair| {
            let arr = pair.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect()
}

// ---------------------------------------------------------------------------
// List toolchains
// ---------------------------------------------------------------------------

#[test]
fn list_toolchains_test_vectors() {
    let raw = include_str!("../../test-vectors/list_toolchains.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let mut options = ListToolchainsOptions::new(input["resource_group_id"].as_str().unwrap());
        if let Some(limit) = input["limit"].as_i64() {
            options = options.limit(limit);
        }
        if let Some(start) = input["start"].as_str() {
            options = options.start(start);
        }
        if let Some(filter) = input["name"].as_str() {
            options = options.name(filter);
        }
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build_list_toolchains(&options).unwrap();
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.path, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: path");
        assert_eq!(req.query, string_pairs(&expected_req["query"]), "{name}: query");
        assert_eq!(
            req.url().unwrap(),
            format!("{BASE_URL}{}", expected_req["url"].as_str().unwrap()),
            "{name}: url"
        );
        assert!(req.body.is_none(), "{name}: body should be None");

        // Verify parse
        let page = c.parse_list_toolchains(simulated(case)).unwrap();
        assert_eq!(
            page.next_start(),
            case["expected_next_start"].as_str(),
            "{name}: next start"
        );
        let ids: Vec<String> = page.into_items().into_iter().map(|t| t.id).collect();
        let expected_ids: Vec<String> = serde_json::from_value(case["expected_ids"].clone()).unwrap();
        assert_eq!(ids, expected_ids, "{name}: item ids");
    }
}

// ---------------------------------------------------------------------------
// Create toolchain
// ---------------------------------------------------------------------------

#[test]
fn create_toolchain_test_vectors() {
    let raw = include_str!("../../test-vectors/create_toolchain.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input: CreateToolchainOptions = serde_json::from_value(case["input"].clone()).unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build_create_toolchain(&input).unwrap();
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.path, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: path");
        assert_eq!(
            req.header_value("content-type"),
            expected_req["content_type"].as_str(),
            "{name}: content type"
        );
        let req_body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(req_body, expected_req["body"], "{name}: body");

        // Verify parse
        let toolchain = c.parse_create_toolchain(simulated(case)).unwrap();
        let expected: Toolchain = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(toolchain, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Get tool
// ---------------------------------------------------------------------------

#[test]
fn get_tool_test_vectors() {
    let raw = include_str!("../../test-vectors/get_tool.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let toolchain_id = case["toolchain_id"].as_str().unwrap();
        let tool_id = case["tool_id"].as_str().unwrap();
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build_get_tool_by_id(toolchain_id, tool_id).unwrap();
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.path, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: path");
        assert!(req.query.is_empty(), "{name}: query should be empty");

        // Verify parse
        let result = c.parse_get_tool_by_id(simulated(case));

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            match expected_error.as_str().unwrap() {
                "NotFound" => assert!(matches!(err, ApiError::NotFound), "{name}: expected NotFound"),
                "HttpError" => assert!(matches!(err, ApiError::HttpError { .. }), "{name}: expected HttpError"),
                other => panic!("{name}: unknown expected_error: {other}"),
            }
        } else {
            let tool = result.unwrap();
            assert_eq!(tool.tool_type_id, case["expected_tool_type_id"].as_str().unwrap(), "{name}: tool type");
            assert_eq!(
                serde_json::Value::Object(tool.parameters),
                case["expected_parameters"],
                "{name}: parameters"
            );
        }
    }
}
