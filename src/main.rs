use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use gbp_gateway::auth::AuthState;
use gbp_gateway::{api, AppState, Config, SharedState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gbp_gateway=info,tower_http=info".into()),
        )
        .init();

    // Load config
    let config = Config::from_env()?;
    info!("gbp-gateway v{}", env!("CARGO_PKG_VERSION"));
    info!("Listening on {}:{}", config.host, config.port);
    info!("OAuth redirect URI: {}", config.client.redirect_uri);

    // Build shared state
    let state: SharedState = Arc::new(AppState::from_config(&config).await);
    match state.lifecycle.current() {
        AuthState::Authenticated => {
            info!("Credentials found at {} ✓", config.token_path.display())
        }
        _ => info!("No credentials yet; visit /google/auth-url to authorize"),
    }

    // Build router
    let app = api::router(state);

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server ready ✓");
    axum::serve(listener, app).await?;

    Ok(())
}
