//! GoalTrack Backend
//!
//! REST backend for the department task tracking dashboard, with a
//! SQLite-backed blob store and an in-memory rules engine.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod models;
mod notify;
mod store;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::BlobStore;
use notify::Notifier;
use store::Store;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub notifier: Arc<Notifier>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting GoalTrack Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Warn if PSK is not configured
    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (GOALTRACK_API_PSK). Authentication is disabled!");
    }

    // Initialize the blob store and load collections into memory
    let pool = db::init_database(&config.db_path).await?;
    let store = Arc::new(Store::open(BlobStore::new(pool)).await?);
    tracing::info!("Loaded {} topics", store.topics().await.len());

    // Create application state
    let state = AppState {
        store,
        notifier: Arc::new(Notifier::new()),
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone PSK for the auth layer
    let psk = state.config.api_psk.clone();

    // API routes
    let api_routes = Router::new()
        // Topics
        .route("/topics", get(api::list_topics))
        .route("/topics", post(api::create_topic))
        .route("/topics/overdue", get(api::overdue_topics))
        .route("/topics/{id}", get(api::get_topic))
        .route("/topics/{id}", put(api::update_topic))
        .route("/topics/{id}", delete(api::delete_topic))
        .route("/topics/{id}/status", put(api::set_topic_status))
        .route("/topics/{id}/notify", post(api::notify_topic))
        .route("/stats", get(api::topic_stats))
        // Followups
        .route("/followups", get(api::list_followups))
        .route("/followups", post(api::create_followup))
        // Departments
        .route("/departments", get(api::list_departments))
        .route("/departments/resolve", post(api::resolve_department))
        .route("/departments/{id}", put(api::update_department))
        // Users
        .route("/users", get(api::list_users))
        .route("/users", post(api::create_user))
        .route("/users/{id}", put(api::update_user))
        .route("/users/{id}", delete(api::delete_user))
        // Session
        .route("/session/login", post(api::login))
        .route("/session/logout", post(api::logout))
        .route("/session/current", get(api::current_session))
        // Audit log
        .route("/logs", get(api::get_logs))
        .route("/logs", delete(api::clear_logs))
        // Settings
        .route("/settings/telegram-token", get(api::get_telegram_token))
        .route("/settings/telegram-token", put(api::set_telegram_token))
        // Backup & restore
        .route("/system/export", get(api::export_system))
        .route("/system/import", post(api::import_system))
        .route("/system/reset", post(api::reset_system))
        // Bulk import
        .route("/import/topics", post(api::import_topics))
        // Apply PSK auth middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
