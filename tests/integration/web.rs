// tests/integration/web.rs

use axum::http::StatusCode;
use axum_test::TestServer;
use nextdomen_console::hierarchy::HierarchyOptions;
use nextdomen_console::{directory_service::DirectoryService, web};
use serde_json::{json, Value};
use std::sync::Arc;

fn server() -> TestServer {
    let service = Arc::new(DirectoryService::new(HierarchyOptions::default()));
    TestServer::new(web::create_router(service)).unwrap()
}

fn snapshot() -> Value {
    json!({
        "ous": [
            { "dn": "OU=Sales,DC=x,DC=y", "name": "Sales" },
            { "dn": "OU=APAC,OU=Sales,DC=x,DC=y", "name": "APAC" },
            { "dn": "OU=IT,DC=x,DC=y", "name": "IT" }
        ],
        "users": [
            { "dn": "CN=Jane,OU=APAC,OU=Sales,DC=x,DC=y", "sAMAccountName": "jane" }
        ],
        "groups": [
            { "dn": "CN=Admins,OU=IT,DC=x,DC=y", "member": ["CN=Jane,OU=APAC,OU=Sales,DC=x,DC=y"] }
        ]
    })
}

#[tokio::test]
async fn test_empty_hierarchy() {
    let server = server();

    let response = server.get("/api/hierarchy").await;

    response.assert_status_ok();
    let content_type = response.header("content-type");
    assert_eq!(content_type.to_str().unwrap(), "application/json");
    let body: Value = response.json();
    assert_eq!(body["children"], json!([]));
}

#[tokio::test]
async fn test_upload_snapshot_and_read_tree() {
    let server = server();

    let response = server.put("/api/snapshot").json(&snapshot()).await;
    response.assert_status_ok();
    let summary: Value = response.json();
    assert_eq!(summary["containers"], 3);
    assert_eq!(summary["attachedUsers"], 1);
    assert_eq!(summary["attachedGroups"], 1);

    let tree: Value = server.get("/api/hierarchy").await.json();
    assert_eq!(tree["name"], "x.y");
    assert_eq!(tree["totalUserCount"], 1);
    assert_eq!(tree["children"][0]["type"], "container");
    assert_eq!(tree["children"][0]["name"], "IT");
}

#[tokio::test]
async fn test_search_keeps_ancestors() {
    let server = server();
    server.put("/api/snapshot").json(&snapshot()).await.assert_status_ok();

    let response = server.get("/api/hierarchy").add_query_param("search", "JANE").await;
    response.assert_status_ok();

    let tree: Value = response.json();
    let roots = tree["children"].as_array().unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0]["name"], "Sales");
    assert_eq!(roots[0]["children"][0]["name"], "APAC");
    assert_eq!(roots[0]["children"][0]["children"][0]["displayName"], "jane");
}

#[tokio::test]
async fn test_container_stats() {
    let server = server();
    server.put("/api/snapshot").json(&snapshot()).await.assert_status_ok();

    let response = server
        .get("/api/hierarchy/stats")
        .add_query_param("dn", "ou=Sales,dc=x,dc=y")
        .await;

    response.assert_status_ok();
    let stats: Value = response.json();
    assert_eq!(stats["totalUsers"], 1);
    assert_eq!(stats["directUsers"], 0);
    assert_eq!(stats["subOuCount"], 1);
}

#[tokio::test]
async fn test_stats_errors() {
    let server = server();
    server.put("/api/snapshot").json(&snapshot()).await.assert_status_ok();

    let missing = server
        .get("/api/hierarchy/stats")
        .add_query_param("dn", "OU=Nope,DC=x,DC=y")
        .await;
    missing.assert_status(StatusCode::NOT_FOUND);
    assert!(missing.json::<Value>()["error"].is_string());

    let malformed = server
        .get("/api/hierarchy/stats")
        .add_query_param("dn", "not a dn")
        .await;
    malformed.assert_status(StatusCode::BAD_REQUEST);
}
