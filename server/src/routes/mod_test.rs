use super::*;
use crate::config::ProxyConfig;
use std::time::Duration;

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

fn state(target: String, prefix: &str) -> ProxyState {
    ProxyState::new(ProxyConfig {
        target,
        prefix: prefix.to_owned(),
        rewrite_to: prefix.to_owned(),
        change_origin: true,
        timeout: Duration::from_secs(2),
    })
    .expect("client builds")
}

#[tokio::test]
async fn healthz_is_ok() {
    let base = spawn(api_routes(state("http://127.0.0.1:9".into(), "/api"))).await;
    let resp = reqwest::get(format!("{base}/healthz")).await.expect("responds");
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
}

#[tokio::test]
async fn prefix_and_nested_paths_reach_upstream() {
    let upstream = spawn(
        Router::new()
            .route("/api", get(|| async { "root" }))
            .route("/api/stations/{id}", get(|| async { "station" })),
    )
    .await;
    let base = spawn(api_routes(state(upstream, "/api"))).await;

    let root = reqwest::get(format!("{base}/api")).await.expect("responds");
    assert_eq!(root.text().await.expect("body"), "root");
    let nested = reqwest::get(format!("{base}/api/stations/7")).await.expect("responds");
    assert_eq!(nested.text().await.expect("body"), "station");
}

#[tokio::test]
async fn paths_outside_prefix_are_not_proxied() {
    let upstream = spawn(Router::new().route("/other", get(|| async { "leak" }))).await;
    let base = spawn(api_routes(state(upstream, "/api"))).await;

    let resp = reqwest::get(format!("{base}/other")).await.expect("responds");
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
}
