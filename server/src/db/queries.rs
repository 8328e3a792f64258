//! Database Queries
//!
//! Runtime queries (no compile-time `DATABASE_URL` required).
//!
//! All query functions include error context logging to aid debugging.

use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use super::models::{Profile, ProgramEntry, User, UserRow, UserWithProfileRow};

/// Log and return a database error with context.
macro_rules! db_error {
    ($query:expr, $($field:tt)*) => {
        |e| {
            error!(query = $query, $($field)*, error = %e, "Database query failed");
            e
        }
    };
}

/// Columns selected for a user joined with its profile.
const USER_WITH_PROFILE: &str = r"
    SELECT u.id, u.created_at, u.role_names, u.discord_id, u.discord_refresh_token, u.email,
           p.name AS profile_name, p.avatar_url AS profile_avatar_url
    FROM users u
    LEFT JOIN profiles p ON p.user_id = u.id
";

// ============================================================================
// User Queries
// ============================================================================

/// Storage failure while reading or linking users.
///
/// Each variant names the step that failed; the sqlx error is its source.
#[derive(Debug, thiserror::Error)]
pub enum UserStoreError {
    #[error("begin transaction")]
    Begin(#[source] sqlx::Error),

    #[error("insert user")]
    InsertUser(#[source] sqlx::Error),

    #[error("insert profile")]
    InsertProfile(#[source] sqlx::Error),

    #[error("commit")]
    Commit(#[source] sqlx::Error),

    #[error("select user")]
    SelectUser(#[source] sqlx::Error),
}

/// Identity data received from the identity provider.
#[derive(Debug, Clone)]
pub struct LinkIdentity<'a> {
    pub discord_id: &'a str,
    pub refresh_token: &'a str,
    pub email: &'a str,
    pub display_name: &'a str,
    pub avatar_url: &'a str,
}

/// Find user by ID, with profile and decoded roles.
pub async fn find_user_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, UserStoreError> {
    sqlx::query_as::<_, UserWithProfileRow>(&format!("{USER_WITH_PROFILE} WHERE u.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
        .map(|row| row.map(UserWithProfileRow::into_user))
        .map_err(db_error!("find_user_by_id", user_id = %id))
        .map_err(UserStoreError::SelectUser)
}

/// Create or update the user owning a Discord identity, together with its
/// profile.
///
/// Both upserts run in one transaction keyed by `discord_id` and `user_id`,
/// so relinking the same identity updates email, refresh token, name and
/// avatar in place. Stored role names are left untouched. Any failure rolls
/// back the whole link.
pub async fn link_discord_identity(
    pool: &PgPool,
    identity: &LinkIdentity<'_>,
) -> Result<User, UserStoreError> {
    let mut tx = pool
        .begin()
        .await
        .map_err(db_error!("link_discord_identity", step = "begin"))
        .map_err(UserStoreError::Begin)?;

    let user = sqlx::query_as::<_, UserRow>(
        r"
        INSERT INTO users (discord_id, discord_refresh_token, email, role_names)
        VALUES ($1, $2, $3, '{}')
        ON CONFLICT (discord_id) DO UPDATE
            SET email = EXCLUDED.email,
                discord_refresh_token = EXCLUDED.discord_refresh_token
        RETURNING id, created_at, role_names, discord_id, discord_refresh_token, email
        ",
    )
    .bind(identity.discord_id)
    .bind(identity.refresh_token)
    .bind(identity.email)
    .fetch_one(&mut *tx)
    .await
    .map_err(db_error!("link_discord_identity", step = "insert user", discord_id = %identity.discord_id))
    .map_err(UserStoreError::InsertUser)?;

    let profile = sqlx::query_as::<_, Profile>(
        r"
        INSERT INTO profiles (user_id, name, avatar_url)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id) DO UPDATE
            SET name = EXCLUDED.name,
                avatar_url = EXCLUDED.avatar_url
        RETURNING user_id, name, avatar_url
        ",
    )
    .bind(user.id)
    .bind(identity.display_name)
    .bind(identity.avatar_url)
    .fetch_one(&mut *tx)
    .await
    .map_err(db_error!("link_discord_identity", step = "insert profile", user_id = %user.id))
    .map_err(UserStoreError::InsertProfile)?;

    tx.commit()
        .await
        .map_err(db_error!("link_discord_identity", step = "commit", user_id = %user.id))
        .map_err(UserStoreError::Commit)?;

    Ok(user.into_user(Some(profile)))
}

// ============================================================================
// Program Catalog Queries
// ============================================================================

/// Fetch catalog entries matching the key exactly (case-sensitive).
///
/// At most two rows are returned, ordered by primary key: enough to tell a
/// unique match from a duplicated key without reading the rest.
pub async fn find_program_entries(
    pool: &PgPool,
    program_type: &str,
    os: &str,
    arch: &str,
    branch: &str,
) -> sqlx::Result<Vec<ProgramEntry>> {
    sqlx::query_as::<_, ProgramEntry>(
        r"
        SELECT id, type, os, arch, branch, files, created_at
        FROM programs
        WHERE type = $1 AND os = $2 AND arch = $3 AND branch = $4
        ORDER BY id
        LIMIT 2
        ",
    )
    .bind(program_type)
    .bind(os)
    .bind(arch)
    .bind(branch)
    .fetch_all(pool)
    .await
    .map_err(db_error!(
        "find_program_entries",
        program_type = %program_type,
        os = %os,
        arch = %arch,
        branch = %branch
    ))
}
