use lingua_proxy::{create_router, AppState, Config};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = Config::parse_args();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    // Credential loading happens here so a missing or empty key list kills
    // the process at startup instead of failing every request later.
    let state = AppState::from_config(config.clone())?;

    // Log the backend host only; the full URL could carry sensitive parts.
    let safe_url = match url::Url::parse(&config.upstream_url) {
        Ok(url) => format!("{}://{}", url.scheme(), url.host_str().unwrap_or("unknown")),
        Err(_) => "invalid-url".to_string(),
    };

    let addr = SocketAddr::new(config.host.parse()?, config.port);
    info!("lingua-proxy listening on http://{}", addr);
    info!("generation backend: {}", safe_url);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, create_router(state)).await?;

    Ok(())
}
