use super::*;
use axum::Router;
use axum::http::{HeaderValue, Method};
use axum::routing::{any, get};
use std::time::Duration;

fn proxy_config(target: String) -> ProxyConfig {
    ProxyConfig {
        target,
        prefix: "/api".to_owned(),
        rewrite_to: "/api".to_owned(),
        change_origin: true,
        timeout: Duration::from_secs(2),
    }
}

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind should succeed");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{addr}")
}

async fn echo(req: Request) -> Response {
    let (parts, body) = req.into_parts();
    let body = axum::body::to_bytes(body, 1024).await.unwrap_or_default();
    let auth = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_owned();
    let host = parts
        .headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_owned();
    Json(serde_json::json!({
        "method": parts.method.as_str(),
        "uri": parts.uri.to_string(),
        "authorization": auth,
        "host": host,
        "body": String::from_utf8_lossy(&body),
    }))
    .into_response()
}

fn proxy_router(state: ProxyState) -> Router {
    Router::new()
        .route("/api/{*rest}", any(forward))
        .with_state(state)
}

// =============================================================================
// rewrite_path / upstream_url
// =============================================================================

#[test]
fn rewrite_keeps_identity_prefix() {
    assert_eq!(rewrite_path("/api/auth/login", "/api", "/api"), "/api/auth/login");
}

#[test]
fn rewrite_replaces_prefix_and_keeps_query() {
    assert_eq!(rewrite_path("/api/stations?page=2", "/api", "/v1"), "/v1/stations?page=2");
    assert_eq!(rewrite_path("/api?x=1", "/api", "/"), "/?x=1");
}

#[test]
fn rewrite_ignores_partial_segment_match() {
    assert_eq!(rewrite_path("/apiary/hives", "/api", "/v1"), "/apiary/hives");
}

#[test]
fn rewrite_root_prefix() {
    assert_eq!(rewrite_path("/stations", "/", "/api"), "/api/stations");
}

#[test]
fn upstream_url_joins_without_double_slash() {
    assert_eq!(upstream_url("http://localhost:8080/", "/api/x"), "http://localhost:8080/api/x");
    assert_eq!(upstream_url("http://localhost:8080", "api/x"), "http://localhost:8080/api/x");
}

#[test]
fn strip_headers_drops_hop_by_hop_and_host() {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(header::HOST, HeaderValue::from_static("localhost:3000"));
    headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer t"));
    strip_forwarded_headers(&mut headers, true);
    assert!(headers.get(header::CONNECTION).is_none());
    assert!(headers.get(header::HOST).is_none());
    assert!(headers.get(header::AUTHORIZATION).is_some());
}

#[test]
fn strip_headers_keeps_host_without_change_origin() {
    let mut headers = HeaderMap::new();
    headers.insert(header::HOST, HeaderValue::from_static("localhost:3000"));
    strip_forwarded_headers(&mut headers, false);
    assert!(headers.get(header::HOST).is_some());
}

#[test]
fn error_statuses() {
    assert_eq!(ProxyError::Timeout.status(), StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(ProxyError::Upstream("x".into()).status(), StatusCode::BAD_GATEWAY);
    assert_eq!(ProxyError::Body("x".into()).status(), StatusCode::PAYLOAD_TOO_LARGE);
}

// =============================================================================
// forward
// =============================================================================

#[tokio::test]
async fn forwards_method_path_headers_and_body() {
    let upstream = spawn(Router::new().route("/api/{*rest}", any(echo))).await;
    let state = ProxyState::new(proxy_config(upstream.clone())).expect("client builds");
    let proxy = spawn(proxy_router(state)).await;

    let resp = reqwest::Client::new()
        .post(format!("{proxy}/api/auth/login?next=1"))
        .header("authorization", "Bearer abc")
        .body("{\"username\":\"a\"}")
        .send()
        .await
        .expect("proxy responds");
    assert_eq!(resp.status(), reqwest::StatusCode::OK);

    let body: serde_json::Value = serde_json::from_slice(&resp.bytes().await.expect("body"))
        .expect("json body");
    assert_eq!(body["method"], "POST");
    assert_eq!(body["uri"], "/api/auth/login?next=1");
    assert_eq!(body["authorization"], "Bearer abc");
    assert_eq!(body["body"], "{\"username\":\"a\"}");
    assert_eq!(body["host"], upstream.trim_start_matches("http://"));
}

#[tokio::test]
async fn upstream_error_status_passes_through() {
    let upstream = spawn(Router::new().route(
        "/api/missing",
        get(|| async { (StatusCode::UNAUTHORIZED, "nope") }),
    ))
    .await;
    let state = ProxyState::new(proxy_config(upstream)).expect("client builds");
    let proxy = spawn(proxy_router(state)).await;

    let resp = reqwest::get(format!("{proxy}/api/missing")).await.expect("proxy responds");
    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
    assert_eq!(resp.text().await.expect("body"), "nope");
}

#[tokio::test]
async fn unreachable_upstream_is_bad_gateway() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let dead = format!("http://{}", listener.local_addr().expect("addr"));
    drop(listener);

    let state = ProxyState::new(proxy_config(dead)).expect("client builds");
    let proxy = spawn(proxy_router(state)).await;

    let resp = reqwest::Client::new()
        .request(Method::GET, format!("{proxy}/api/stations"))
        .send()
        .await
        .expect("proxy responds");
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = serde_json::from_slice(&resp.bytes().await.expect("body"))
        .expect("json body");
    assert!(body["error"].as_str().is_some_and(|e| e.starts_with("upstream request failed")));
}
