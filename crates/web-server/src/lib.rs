use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::get,
};
use configuration::{Config, ServerSettings};
use database::{BankRepository, BranchRepository, PoolConfig};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// Every endpoint of the service lives under this prefix.
pub const API_PREFIX: &str = "/api/v1";

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub banks: BankRepository,
    pub branches: BranchRepository,
}

impl AppState {
    /// Builds both repositories over one pool.
    pub fn new(pool: database::AnyPool) -> Self {
        Self {
            banks: BankRepository::new(pool.clone()),
            branches: BranchRepository::new(pool),
        }
    }
}

/// Assembles the router with all routes and middleware, without binding a socket.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    // --- DEFINE THE APPLICATION ROUTES ---
    // Collections answer with and without the trailing slash.
    let api = Router::new()
        .route("/banks/", get(handlers::list_banks).post(handlers::create_bank))
        .route("/banks", get(handlers::list_banks).post(handlers::create_bank))
        .route(
            "/banks/:bank_id",
            get(handlers::get_bank)
                .put(handlers::update_bank)
                .delete(handlers::delete_bank),
        )
        .route("/branches/", get(handlers::list_branches).post(handlers::create_branch))
        .route("/branches", get(handlers::list_branches).post(handlers::create_branch))
        .route(
            "/branches/:ifsc",
            get(handlers::get_branch)
                .put(handlers::update_branch)
                .delete(handlers::delete_branch),
        )
        .route("/branches/city/:city/:bank_id", get(handlers::get_branches_by_city));

    Router::new()
        .route("/", get(handlers::root))
        .route("/api/health", get(|| async { "OK" }))
        .nest(API_PREFIX, api)
        .with_state(Arc::new(state))
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024))
}

/// Connects to the store, applies migrations and serves until Ctrl-C / SIGTERM.
///
/// Tracing is expected to be initialised by the caller.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let database_url = config.database.connection_url()?;
    let pool_config = PoolConfig {
        max_connections: config.database.max_connections,
        acquire_timeout: config.database.acquire_timeout(),
    };

    let pool = database::connect(&database_url, &pool_config).await?;
    database::run_migrations(&pool).await?;

    let router = app(AppState::new(pool.clone()));

    let listener = bind(&config.server).await?;
    tracing::info!("Web server started and listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    database::disconnect(&pool).await;
    Ok(())
}

/// Binds the listener, resolving host names such as `localhost`.
pub async fn bind(server: &ServerSettings) -> std::io::Result<tokio::net::TcpListener> {
    tokio::net::TcpListener::bind(server.bind_address()).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C.");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM.");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received.");
}
