//! Distribution resolver.
//!
//! A key either names exactly one published build, whose files are returned
//! in stored order, or nothing. Two rows for one key mean the catalog is
//! corrupt; that is reported as [`DownloadError::AmbiguousEntry`] and never
//! folded into a not-found answer.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sqlx::PgPool;
use tracing::{debug, error};

use super::types::ProgramKey;
use crate::api::error_response;
use crate::db::{self, ProgramEntry, ProgramFile};

/// Download resolution errors.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// No build is published under the key.
    #[error("Not Found")]
    NotFound,

    /// More than one build is published under the key.
    #[error("Catalog holds {count} entries for {key}")]
    AmbiguousEntry { key: ProgramKey, count: usize },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for DownloadError {
    fn into_response(self) -> Response {
        match &self {
            Self::NotFound => error_response(StatusCode::NOT_FOUND, "Not Found"),
            Self::AmbiguousEntry { key, count } => {
                error!(%key, count, "Program catalog has duplicate entries for key");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
            Self::Database(err) => {
                error!(%err, "Download endpoint database error");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        }
    }
}

/// Pick the files of the single entry matching `key`.
pub fn select_files(
    key: &ProgramKey,
    mut entries: Vec<ProgramEntry>,
) -> Result<Vec<ProgramFile>, DownloadError> {
    match entries.len() {
        0 => Err(DownloadError::NotFound),
        1 => Ok(entries.swap_remove(0).files.0),
        count => Err(DownloadError::AmbiguousEntry {
            key: key.clone(),
            count,
        }),
    }
}

/// Resolve the files to serve for `key`.
#[tracing::instrument(skip_all, fields(key = %key))]
pub async fn resolve(pool: &PgPool, key: &ProgramKey) -> Result<Vec<ProgramFile>, DownloadError> {
    let entries =
        db::find_program_entries(pool, &key.program_type, &key.os, &key.arch, &key.branch).await?;
    let files = select_files(key, entries)?;
    debug!(files = files.len(), "Resolved program files");
    Ok(files)
}
