//! Admin Handlers

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use super::types::{AdminError, AdminUserResponse};
use crate::api::AppState;
use crate::auth::AuthUser;
use crate::db;

/// GET /api/admin/users/{user_id}
#[tracing::instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn get_user(
    State(state): State<AppState>,
    admin: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<AdminUserResponse>, AdminError> {
    let user = db::find_user_by_id(&state.db, user_id)
        .await?
        .ok_or(AdminError::NotFound)?;
    Ok(Json(user.into()))
}
