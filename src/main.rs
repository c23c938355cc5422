use std::sync::Arc;

use sparrow_web::{
    api::{create_router, AppState},
    backend::HttpBackend,
    config::Config,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("sparrow_web=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let backend = HttpBackend::new(&config.backend_url, config.request_timeout())?;

    // Initialize application state
    let state = AppState::new(Arc::new(backend), config.clone());

    // Create the router with all pages
    let app = create_router(state);

    // Start the server
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(
        addr = %config.bind_addr(),
        backend = %config.backend_url,
        "Sparrow web server running"
    );
    axum::serve(listener, app).await?;

    Ok(())
}
