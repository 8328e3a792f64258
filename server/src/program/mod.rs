//! Program Distribution
//!
//! Resolves which build files to serve for a product type, OS, CPU
//! architecture and release branch.

mod handlers;
pub mod resolver;
pub mod types;

use axum::{routing::get, Router};

use crate::api::AppState;

pub use resolver::{resolve, select_files, DownloadError};
pub use types::{DownloadQuery, ProgramKey};

/// Create the download router.
///
/// Routes:
/// - GET /{type}?os=&arch=&branch= - Files of the matching build
pub fn router() -> Router<AppState> {
    Router::new().route("/{program_type}", get(handlers::download))
}
