//! Authentication Error Types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::error_response;
use crate::db::UserStoreError;

/// Authentication error types.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing Authorization header.
    #[error("Missing authorization header")]
    MissingAuthHeader,

    /// Invalid authorization header format.
    #[error("Invalid authorization header format")]
    InvalidAuthHeader,

    /// Invalid or expired token.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// Token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// Token subject no longer exists.
    #[error("User not found")]
    UserNotFound,

    /// OAuth2 `state` did not match the one issued by this server.
    #[error("Invalid OAuth state")]
    InvalidState,

    /// Discord sign-in is not configured on this server.
    #[error("Discord sign-in is not configured")]
    DiscordUnavailable,

    /// Identity provider rejected the exchange or returned garbage.
    #[error("Identity provider error: {0}")]
    Provider(String),

    /// The Discord account did not share an email address.
    #[error("Discord account has no email address")]
    EmailRequired,

    /// Storage failure while loading or linking the user.
    #[error("Storage error: {0}")]
    Storage(#[from] UserStoreError),

    /// JWT encoding error.
    #[error("Token error")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::MissingAuthHeader
            | Self::InvalidAuthHeader
            | Self::InvalidToken
            | Self::TokenExpired
            | Self::UserNotFound => StatusCode::UNAUTHORIZED,
            Self::InvalidState | Self::EmailRequired => StatusCode::BAD_REQUEST,
            Self::DiscordUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Provider(msg) => {
                tracing::warn!(error = %msg, "Discord exchange failed");
                StatusCode::BAD_GATEWAY
            }
            Self::Storage(err) => {
                tracing::error!(error = %err, "Auth storage error");
                return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
            }
            Self::Jwt(err) => {
                tracing::error!(error = %err, "Failed to sign token");
                return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
            }
        };

        error_response(status, self.to_string())
    }
}

/// Result type for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;
