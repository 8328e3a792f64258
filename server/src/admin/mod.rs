//! Admin Module
//!
//! Administrative endpoints. Every route requires a role that allows
//! [`Permission::AdminDashboard`].

pub mod handlers;
pub mod types;

use axum::{middleware::from_fn, routing::get, Router};

use crate::api::AppState;
use crate::permissions::{require_permission, Permission};

pub use types::{AdminError, AdminUserResponse};

/// Create the admin router. Must be mounted behind `require_auth`.
///
/// - GET /users/{user_id} - Look up a user with profile and roles
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/{user_id}", get(handlers::get_user))
        .layer(from_fn(require_permission(Permission::AdminDashboard)))
}
