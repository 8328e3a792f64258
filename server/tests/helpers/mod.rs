//! Reusable test helpers for HTTP integration tests.
//!
//! Provides `TestApp` for sending requests through the full axum router,
//! plus utilities for seeding users and catalog entries and minting tokens.
//!
//! Tests take their pool from `#[sqlx::test]`, so every test runs against a
//! fresh, migrated database.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{self, header::AUTHORIZATION, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use launchpad_server::api::{create_router, AppState};
use launchpad_server::auth::jwt;
use launchpad_server::config::Config;
use launchpad_server::db::ProgramFile;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

// ============================================================================
// Test App
// ============================================================================

/// A test application wrapping the full axum router.
pub struct TestApp {
    pub router: Router,
    pub pool: PgPool,
    pub config: Arc<Config>,
}

impl TestApp {
    /// Create a test app with the default test config.
    pub fn new(pool: PgPool) -> Self {
        Self::with_config(pool, Config::default_for_test())
    }

    /// Create a test app with a custom config.
    pub fn with_config(pool: PgPool, config: Config) -> Self {
        let state = AppState::new(pool.clone(), config.clone());
        Self {
            router: create_router(state),
            pool,
            config: Arc::new(config),
        }
    }

    /// Build an HTTP request with the given method and URI.
    pub fn request(method: Method, uri: &str) -> http::request::Builder {
        Request::builder().method(method).uri(uri)
    }

    /// Send a request through the router via `tower::ServiceExt::oneshot`.
    pub async fn oneshot(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot request failed")
    }

    /// GET `uri` without credentials.
    pub async fn get(&self, uri: &str) -> Response<Body> {
        let req = Self::request(Method::GET, uri).body(Body::empty()).unwrap();
        self.oneshot(req).await
    }

    /// GET `uri` as `user_id`.
    pub async fn get_as(&self, uri: &str, user_id: Uuid) -> Response<Body> {
        let req = Self::request(Method::GET, uri)
            .header(AUTHORIZATION, format!("Bearer {}", self.token_for(user_id)))
            .body(Body::empty())
            .unwrap();
        self.oneshot(req).await
    }

    /// Mint an access token for `user_id`.
    pub fn token_for(&self, user_id: Uuid) -> String {
        jwt::issue_access_token(user_id, &self.config.jwt_secret, 900)
            .expect("Failed to issue token")
    }
}

// ============================================================================
// Response helpers
// ============================================================================

/// Read the whole body as a UTF-8 string.
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}

/// Read the whole body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).expect("Body is not JSON")
}

// ============================================================================
// Seeding helpers
// ============================================================================

/// Create a user holding `role_names` and return its ID.
pub async fn create_test_user(pool: &PgPool, role_names: &[&str]) -> Uuid {
    let test_id = Uuid::new_v4().to_string()[..8].to_string();
    sqlx::query_scalar(
        r"INSERT INTO users (discord_id, discord_refresh_token, email, role_names)
          VALUES ($1, 'refresh', $2, $3)
          RETURNING id",
    )
    .bind(format!("discord_{test_id}"))
    .bind(format!("{test_id}@example.com"))
    .bind(role_names.iter().map(|s| (*s).to_string()).collect::<Vec<_>>())
    .fetch_one(pool)
    .await
    .expect("Failed to create test user")
}

/// Publish a build under the given key.
pub async fn insert_program(
    pool: &PgPool,
    (program_type, os, arch, branch): (&str, &str, &str, &str),
    files: &[ProgramFile],
) {
    sqlx::query("INSERT INTO programs (type, os, arch, branch, files) VALUES ($1, $2, $3, $4, $5)")
        .bind(program_type)
        .bind(os)
        .bind(arch)
        .bind(branch)
        .bind(sqlx::types::Json(files))
        .execute(pool)
        .await
        .expect("Failed to insert program");
}

/// File descriptor pointing at the sample download.
pub fn sample_file(path: &str, hash: &str) -> ProgramFile {
    ProgramFile {
        path: path.into(),
        download_url: "https://buzkaaclicker.pl/sample".into(),
        hash: hash.into(),
    }
}
