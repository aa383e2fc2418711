//! PitCrew Portal Backend
//!
//! REST backend for the team composition and membership engine of the PitCrew
//! hackathon operations portal, with SQLite persistence.

mod api;
mod auth;
mod composition;
mod config;
mod db;
mod errors;
mod models;
mod notify;

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
use db::Repository;
use notify::Notifier;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub notifier: Notifier,
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

    tracing::info!("Starting PitCrew Portal Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Warn if PSK is not configured
    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (PITCREW_API_PSK). Authentication is disabled!");
    }

    if config.webhook_url.is_none() {
        tracing::info!("No webhook URL configured (PITCREW_WEBHOOK_URL). Notifications are off.");
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Create application state
    let notifier = Notifier::new(config.webhook_url.clone());
    let state = AppState {
        repo,
        notifier,
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
        // Role catalog
        .route("/roles", get(api::list_roles))
        // Datastore
        .route("/datastore", get(api::get_datastore))
        .route("/datastore/revision", get(api::get_revision))
        // Teams
        .route("/teams", get(api::list_teams))
        .route("/teams", post(api::create_team))
        .route("/teams/{id}", get(api::get_team))
        .route("/teams/{id}", delete(api::delete_team))
        .route("/teams/{id}/members", post(api::add_member))
        .route("/teams/{id}/status", put(api::update_team_status))
        .route("/teams/{id}/composition", get(api::get_composition))
        // Join requests
        .route("/teams/{id}/requests", post(api::submit_request))
        .route("/teams/{id}/requests", get(api::list_team_requests))
        .route("/requests/{id}/accept", post(api::accept_request))
        .route("/requests/{id}/reject", post(api::reject_request))
        // Attendance
        .route("/teams/{id}/attendance", put(api::set_attendance))
        .route("/teams/{id}/attendance", get(api::list_attendance))
        .route(
            "/teams/{id}/attendance/violations",
            get(api::list_violations),
        )
        .route("/teams/{id}/attendance/{member}", get(api::get_absences))
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

#[cfg(test)]
mod tests;
