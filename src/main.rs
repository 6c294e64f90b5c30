//! Service entry point: wires configuration, database, the notification
//! worker, and the JSON API together.

use dotenvy::dotenv;
use pocketledger::{
    api::{self, AppState},
    cache::StatsCache,
    config,
    core::alerts::TransactionHooks,
    errors::Result,
    notify::{self, SmtpAlertTransport},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Load the application settings
    let settings = config::settings::load_default_settings()
        .inspect_err(|e| error!("Failed to load settings: {e}"))?;
    info!(
        default_categories = settings.default_categories.len(),
        "settings loaded"
    );

    // 4. Initialize the database
    let db = config::database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    config::database::create_tables(&db)
        .await
        .inspect(|()| info!("database initialized"))
        .inspect_err(|e| error!("Failed to initialize database schema: {e}"))?;

    // 5. Spawn the alert delivery worker when SMTP is configured
    let notifier = match &settings.notifications {
        Some(smtp) => {
            let transport = Arc::new(SmtpAlertTransport::new(smtp)?);
            Some(notify::spawn_worker(transport, notify::DEFAULT_RETRY_DELAY))
        }
        None => {
            info!("no SMTP settings; budget alerts will be logged only");
            None
        }
    };

    // 6. Assemble shared state and the router
    let cache = Arc::new(StatsCache::new(Duration::from_secs(settings.cache_ttl_secs)));
    let hooks = TransactionHooks::new(Arc::<StatsCache>::clone(&cache), notifier);
    let state = Arc::new(AppState {
        db,
        cache,
        hooks,
        settings,
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = axum::Router::new()
        .nest("/api", api::routes::api_routes())
        .layer(cors)
        .with_state(state);

    // 7. Serve
    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
        .parse()
        .map_err(|e| pocketledger::errors::Error::Config {
            message: format!("Invalid BIND_ADDR: {e}"),
        })?;
    info!("listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
