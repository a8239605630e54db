//! Passbook API server.
//!
//! Main entry point for the passbook ledger service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use passbook_api::{AppState, create_router};
use passbook_db::connect;
use passbook_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "passbook=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Connect to database
    let db = connect(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;
    info!("Connected to database");

    // Create JWT service; expiries stay in seconds end to end
    let jwt_config = JwtConfig {
        secret: config.jwt.secret.clone(),
        access_token_expiry_secs: i64::try_from(config.jwt.access_token_expiry_secs)?,
        refresh_token_expiry_secs: i64::try_from(config.jwt.refresh_token_expiry_secs)?,
    };
    let jwt_service = JwtService::new(jwt_config);

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
