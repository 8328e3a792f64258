//! Admin types and errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::api::error_response;
use crate::db::{Profile, User, UserStoreError};

/// Admin error types.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    /// Resource not found.
    #[error("Not Found")]
    NotFound,

    /// Storage failure.
    #[error("Storage error: {0}")]
    Storage(#[from] UserStoreError),
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => error_response(StatusCode::NOT_FOUND, "Not Found"),
            Self::Storage(err) => {
                tracing::error!(error = %err, "Admin endpoint storage error");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        }
    }
}

/// User as shown on the admin dashboard.
///
/// `role_names` lists every stored identifier; `roles` only the ones the
/// registry still knows.
#[derive(Debug, Serialize)]
pub struct AdminUserResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub discord_id: String,
    pub email: String,
    pub role_names: Vec<String>,
    pub roles: Vec<String>,
    pub profile: Option<Profile>,
}

impl From<User> for AdminUserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            created_at: user.created_at,
            roles: user.roles.ids().map(String::from).collect(),
            discord_id: user.discord_id,
            email: user.email,
            role_names: user.role_names,
            profile: user.profile,
        }
    }
}
