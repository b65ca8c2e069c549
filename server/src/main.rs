mod config;
mod proxy;
mod routes;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    let config = match config::ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };
    let port = config.port;
    tracing::info!(
        target = %config.proxy.target,
        prefix = %config.proxy.prefix,
        rewrite = %config.proxy.rewrite_to,
        "api proxy configured"
    );

    let proxy = proxy::ProxyState::new(config.proxy).expect("http client init failed");
    let app = routes::app(proxy).expect("leptos configuration failed");
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "airwatch listening");
    axum::serve(listener, app).await.expect("server failed");
}
