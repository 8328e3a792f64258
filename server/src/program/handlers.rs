//! Download Handlers

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use tracing::debug;

use super::resolver::{resolve, DownloadError};
use super::types::{DownloadQuery, ProgramKey};
use crate::api::AppState;
use crate::db::ProgramFile;

/// GET /download/{type}?os=&arch=&branch=
///
/// A query string that cannot be parsed names no build and answers
/// Not Found like any other miss.
pub async fn download(
    State(state): State<AppState>,
    Path(program_type): Path<String>,
    query: Result<Query<DownloadQuery>, QueryRejection>,
) -> Result<Json<Vec<ProgramFile>>, DownloadError> {
    let Query(query) = query.map_err(|rejection| {
        debug!(%program_type, error = %rejection.body_text(), "Unparseable download query");
        DownloadError::NotFound
    })?;
    let key = ProgramKey::from_request(program_type, query);
    resolve(&state.db, &key).await.map(Json)
}
