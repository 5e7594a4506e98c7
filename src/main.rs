//! Equiptrack Backend
//!
//! REST backend for equipment-maintenance tracking: employees report issues,
//! admins schedule work and manage teams, technicians execute tickets.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod models;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
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

    tracing::info!("Starting Equiptrack Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Warn if no signing secret is configured
    if config.jwt_secret.is_none() {
        tracing::warn!(
            "No signing secret configured (EQUIPTRACK_JWT_SECRET). Using the development default!"
        );
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Create application state
    let state = AppState {
        repo,
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

    // API routes; protected handlers authenticate via the AuthUser extractor
    let api_routes = Router::new()
        // Auth
        .route("/auth/register", post(api::register))
        .route("/auth/login", post(api::login))
        // Team roster
        .route("/team", post(api::create_team))
        .route("/team", get(api::list_teams))
        .route("/team/available", get(api::list_available_technicians))
        .route("/team/assign", post(api::assign_technician))
        .route("/team/remove/{user_id}", put(api::remove_technician))
        // Equipment registry
        .route("/equipment", post(api::create_equipment))
        .route("/equipment", get(api::list_equipment))
        .route("/equipment/{id}", get(api::get_equipment))
        // Maintenance lifecycle
        .route("/maintenance", post(api::create_maintenance))
        .route("/maintenance", get(api::get_all_maintenance))
        .route("/maintenance/schedule", put(api::schedule_maintenance))
        .route("/maintenance/my", get(api::get_my_maintenance))
        .route("/maintenance/reported", get(api::get_reported_maintenance))
        .route("/maintenance/start/{maintenance_id}", put(api::start_maintenance))
        .route(
            "/maintenance/complete/{maintenance_id}",
            put(api::complete_maintenance),
        );

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
