//! Authentication Service
//!
//! Discord sign-in, access tokens, and the authenticated-user extractor.

pub mod discord;
mod error;
mod handlers;
pub mod jwt;
mod middleware;

use axum::{routing::get, Router};

use crate::api::AppState;

pub use discord::{DiscordClient, DiscordUser};
pub use error::{AuthError, AuthResult};
pub use handlers::{AccessResponse, MeResponse, TokenResponse};
pub use middleware::{require_auth, AuthUser};

/// Create authentication router.
///
/// Public routes:
/// - GET /discord/authorize - Redirect to Discord consent
/// - GET /discord/callback - Link identity and issue an access token
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/discord/authorize", get(handlers::discord_authorize))
        .route("/discord/callback", get(handlers::discord_callback))
}

/// Routes about the current user. Must be mounted behind [`require_auth`].
///
/// - GET / - Profile, roles and permission verdicts
/// - GET /access/{permission} - Verdict for one permission
pub fn me_router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_me))
        .route("/access/{permission}", get(handlers::get_access))
}
