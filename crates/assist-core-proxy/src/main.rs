use assist_core_proxy::{ProxyState, router};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let backend_url = std::env::var("ANALYSIS_BACKEND_URL")
        .unwrap_or_else(|_| "http://localhost:8010".to_string());
    let listen_addr =
        std::env::var("PROXY_LISTEN_ADDR").unwrap_or_else(|_| "127.0.0.1:3030".to_string());

    let app = router(Arc::new(ProxyState::new(&backend_url)));
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    info!(%listen_addr, %backend_url, "analysis proxy listening");
    axum::serve(listener, app).await?;
    Ok(())
}
