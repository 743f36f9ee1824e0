//! Mock NAS web API built on wiremock

use ds_relay::synology::{AUTH_PATH, TASK_PATH};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

/// Matcher for a login request
pub fn login() -> MockBuilder {
    Mock::given(method("GET"))
        .and(path(AUTH_PATH))
        .and(query_param("method", "login"))
}

/// Matcher for a task call with `method=<name>` carrying `sid`
pub fn task(name: &str, sid: &str) -> MockBuilder {
    Mock::given(method("GET"))
        .and(path(TASK_PATH))
        .and(query_param("method", name))
        .and(query_param("_sid", sid))
}

/// Matcher for any task call with `method=<name>`
pub fn any_task(name: &str) -> MockBuilder {
    Mock::given(method("GET"))
        .and(path(TASK_PATH))
        .and(query_param("method", name))
}

/// `{"success": true, "data": {"sid": sid}}`
pub fn login_ok(sid: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": {"sid": sid}}))
}

/// `{"success": true}` with optional data
pub fn success(data: Option<Value>) -> ResponseTemplate {
    let body = match data {
        Some(data) => json!({"success": true, "data": data}),
        None => json!({"success": true}),
    };
    ResponseTemplate::new(200).set_body_json(body)
}

/// `{"success": false, "error": {"code": code}}`
pub fn failure(code: i64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"success": false, "error": {"code": code}}))
}

/// Task list reply for `tasks`
pub fn task_list(tasks: Vec<Value>) -> ResponseTemplate {
    success(Some(json!({"total": tasks.len(), "offset": 0, "tasks": tasks})))
}

/// One task entry the way `method=list&additional=detail,transfer` returns it
pub fn wire_task(
    id: &str,
    title: &str,
    status: &str,
    size: u64,
    downloaded: u64,
    created: i64,
) -> Value {
    json!({
        "id": id,
        "title": title,
        "status": status,
        "size": size,
        "type": "http",
        "username": "operator",
        "additional": {
            "detail": {"create_time": created, "destination": "MOVIES/Downloads"},
            "transfer": {"size_downloaded": downloaded, "speed_download": 0}
        }
    })
}

/// A mock server that accepts one login with `sid`
pub async fn nas_with_session(sid: &str) -> MockServer {
    let server = MockServer::start().await;
    login().respond_with(login_ok(sid)).mount(&server).await;
    server
}
