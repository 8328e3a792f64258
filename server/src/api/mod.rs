//! API Router and Application State
//!
//! Central routing configuration and shared state.

use axum::{
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{admin, auth, auth::DiscordClient, config::Config, program};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,
    /// Server configuration
    pub config: Arc<Config>,
    /// Discord OAuth2 client (optional)
    pub discord: Option<Arc<DiscordClient>>,
}

impl AppState {
    /// Create new application state.
    ///
    /// Discord sign-in is enabled when the config carries its credentials.
    #[must_use]
    pub fn new(db: PgPool, config: Config) -> Self {
        let discord = DiscordClient::from_config(&config).map(Arc::new);
        Self {
            db,
            config: Arc::new(config),
            discord,
        }
    }

    /// Check if Discord sign-in is available.
    #[must_use]
    pub const fn has_discord(&self) -> bool {
        self.discord.is_some()
    }
}

/// Error body shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error_message: String,
}

/// Build a JSON error response.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error_message: message.into(),
        }),
    )
        .into_response()
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Protected routes that require authentication
    let protected_routes = Router::new()
        .nest("/api/me", auth::me_router())
        .nest("/api/admin", admin::router())
        .layer(from_fn_with_state(state.clone(), auth::require_auth));

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Program downloads
        .nest("/download", program::router())
        // Auth routes
        .nest("/auth", auth::router())
        .merge(protected_routes)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    /// Service status
    status: &'static str,
    /// Whether Discord sign-in is configured
    discord: bool,
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        discord: state.has_discord(),
    })
}
