use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use jobfinder_backend::{
    config::{get_config, init_config},
    database::{
        memory::MemoryStore,
        pool::{create_pool, run_migrations},
        postgres::PgStore,
        Store,
    },
    routes,
    utils::time::SystemClock,
    AppState,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_config()?;
    let config = get_config();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.json_logs {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let store: Arc<dyn Store> = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url, config.database_max_connections).await?;
            run_migrations(&pool).await?;
            info!("Connected to Postgres");
            Arc::new(PgStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, keeping data in memory for this process only");
            Arc::new(MemoryStore::new())
        }
    };

    let app_state = AppState::new(
        store,
        Arc::new(SystemClock),
        &config.identity_token_secret,
    )
    .with_listing_defaults(config.listing_defaults());

    let app = routes::router(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(DefaultBodyLimit::max(1024 * 1024));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
