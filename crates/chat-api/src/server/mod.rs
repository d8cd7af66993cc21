//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::sync::Arc;

use axum::Router;
use chat_cache::{
    CacheConfig, EventSink, LocalHub, Publisher, PublisherConfig, RedisPool, RedisSink,
};
use chat_common::{AppConfig, AppError, JwtService};
use chat_db::{
    create_pool, run_migrations, DatabaseConfig, PgChannelRepository, PgPostRepository,
    PgReactionRepository,
};
use chat_service::ServiceContext;
use chat_store::Store;
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::apply_middleware;
use crate::routes::create_router;
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let router = create_router();
    let router = apply_middleware(router, state.config().app.env.is_production());
    router.with_state(state)
}

/// Connect to PostgreSQL, apply migrations and build the AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&DatabaseConfig::from(&config.database))
        .await
        .map_err(AppError::internal)?;
    run_migrations(&pool).await.map_err(AppError::internal)?;
    info!("PostgreSQL connection established");

    let store = Store::new(
        Arc::new(PgReactionRepository::new(pool.clone())),
        Arc::new(PgPostRepository::new(pool.clone())),
        Arc::new(PgChannelRepository::new(pool)),
        CacheConfig::from(&config.cache),
    );

    assemble_state(config, store)
}

/// Wire the publisher and services around an already built store
///
/// Must run inside the tokio runtime, which hosts the broadcast dispatcher.
pub fn assemble_state(config: AppConfig, store: Store) -> Result<AppState, AppError> {
    let hub = LocalHub::new_shared(config.broadcast.subscriber_buffer);
    let mut sinks: Vec<Arc<dyn EventSink>> = vec![hub.clone()];

    if let Some(redis) = &config.redis {
        let pool = RedisPool::from_config(redis).map_err(|e| AppError::Config(e.to_string()))?;
        sinks.push(Arc::new(RedisSink::new(pool)));
        info!("Redis broadcast sink enabled");
    }

    let publisher = Publisher::start(sinks, &PublisherConfig::from(&config.broadcast));

    let service_context = ServiceContext::builder()
        .store(store)
        .publisher(publisher)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    let jwt_service = JwtService::new(&config.jwt.secret, config.jwt.token_expiry);

    Ok(AppState::new(service_context, jwt_service, hub, config))
}

/// Run the HTTP server
pub async fn run_server(app: Router, address: &str) -> Result<(), AppError> {
    let listener = TcpListener::bind(address)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {address}: {e}")))?;

    info!("Server listening on http://{}", address);

    axum::serve(listener, app)
        .await
        .map_err(AppError::internal)?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let address = config.api.address();

    let state = create_app_state(config).await?;
    let app = create_app(state);

    run_server(app, &address).await
}
