//! HTTP RoleApi tests against a mock server

#![cfg(feature = "client")]

use std::time::Duration;

use rolegate::{
    load_session, Catalog, GrantSet, HttpRoleApi, Permission, RoleApi, RoleDraft, RoleId,
    RolegateError,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api(server: &MockServer) -> HttpRoleApi {
    HttpRoleApi::new(&format!("{}/", server.uri()), Some("t0ken".into()), Duration::from_secs(5)).unwrap()
}

fn role_body(perms: serde_json::Value) -> serde_json::Value {
    json!({
        "id": "r1",
        "name": "Editor",
        "description": "edits projects",
        "isActive": true,
        "isSystem": false,
        "permissions": perms,
    })
}

#[tokio::test]
async fn fetches_catalog_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/permissions/catalog"))
        .and(header("authorization", "Bearer t0ken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resources": ["projects"],
            "combinations": ["projects:read", "projects:write"],
        })))
        .mount(&server)
        .await;

    let resp = api(&server).fetch_catalog().await.unwrap();
    let catalog = Catalog::from_response(&resp);
    assert!(catalog.contains("projects", "write"));
}

#[tokio::test]
async fn reads_role_with_literal_wildcards() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/roles/r1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(role_body(json!([
            { "resource": "projects", "action": "*" },
            { "resource": "users", "action": "read" },
        ]))))
        .mount(&server)
        .await;

    let role = api(&server).get_role(&RoleId::new("r1")).await.unwrap();
    assert_eq!(role.name, "Editor");
    assert!(role.is_active);
    assert!(role.permissions.contains(&Permission::wildcard("projects")));
    assert!(role.permissions.is_granted("projects", "delete"));
    assert!(!role.permissions.is_granted("users", "manage"));
}

#[tokio::test]
async fn updates_role_with_wire_body() {
    let server = MockServer::start().await;
    let perms = json!([{ "resource": "projects", "action": "*" }]);
    Mock::given(method("PATCH"))
        .and(path("/roles/r1"))
        .and(body_json(json!({
            "name": "Editor",
            "description": "edits projects",
            "permissions": perms.clone(),
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(role_body(perms)))
        .expect(1)
        .mount(&server)
        .await;

    let draft = RoleDraft {
        name: "Editor".into(),
        description: "edits projects".into(),
        permissions: [Permission::wildcard("projects")].into_iter().collect::<GrantSet>(),
    };
    let role = api(&server).update_role(&RoleId::new("r1"), &draft).await.unwrap();
    assert_eq!(role.permissions, draft.permissions);
}

#[tokio::test]
async fn toggles_activation_without_body() {
    let server = MockServer::start().await;
    let mut body = role_body(json!([]));
    body["isActive"] = json!(false);
    Mock::given(method("PATCH"))
        .and(path("/roles/r1/toggle-active"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let role = api(&server).toggle_role_active(&RoleId::new("r1")).await.unwrap();
    assert!(!role.is_active);
}

#[tokio::test]
async fn api_errors_carry_the_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/roles"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({ "message": "name already taken" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/roles/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("nope"))
        .mount(&server)
        .await;

    let err = api(&server).create_role(&RoleDraft::default()).await.unwrap_err();
    match err {
        RolegateError::Api { status, message } => {
            assert_eq!(status, 409);
            assert_eq!(message, "name already taken");
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = api(&server).get_role(&RoleId::new("missing")).await.unwrap_err();
    assert!(matches!(err, RolegateError::Api { status: 404, ref message } if message == "Not Found"));
}

#[tokio::test]
async fn validation_messages_are_joined() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/roles/r1"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "statusCode": 400,
            "message": ["name should not be empty", "permissions must be an array"],
            "error": "Bad Request"
        })))
        .mount(&server)
        .await;

    let err = api(&server).update_role(&RoleId::new("r1"), &RoleDraft::default()).await.unwrap_err();
    assert!(matches!(
        err,
        RolegateError::Api { status: 400, ref message }
            if message == "name should not be empty; permissions must be an array"
    ));
}

#[tokio::test]
async fn unauthorized_session_is_anonymous() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let session = load_session(&api(&server)).await.unwrap();
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let api = HttpRoleApi::new("http://127.0.0.1:9", None, Duration::from_millis(500)).unwrap();
    assert!(matches!(api.fetch_catalog().await, Err(RolegateError::Transport(_))));
}

#[test]
fn base_url_trailing_slash_is_trimmed() {
    let api = HttpRoleApi::new("http://localhost:3000/api/", None, Duration::from_secs(1)).unwrap();
    assert_eq!(api.url("/roles"), "http://localhost:3000/api/roles");
}
