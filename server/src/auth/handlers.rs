//! Authentication Handlers

use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    response::Redirect,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::discord::DiscordClient;
use super::error::{AuthError, AuthResult};
use super::jwt::issue_access_token;
use super::middleware::AuthUser;
use crate::api::AppState;
use crate::db::{link_discord_identity, LinkIdentity, Profile};
use crate::permissions::{Access, Permission};

/// Cookie holding the OAuth2 `state` between authorize and callback.
const STATE_COOKIE: &str = "discord_oauth_state";

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query string Discord sends back to the callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: String,
    pub state: String,
}

/// Access token issued after a successful sign-in.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

/// Current user with the verdict for every permission.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: Uuid,
    pub email: String,
    pub profile: Option<Profile>,
    pub roles: Vec<String>,
    pub permissions: BTreeMap<&'static str, Access>,
}

/// Verdict for a single permission.
#[derive(Debug, Serialize)]
pub struct AccessResponse {
    pub permission: String,
    pub access: Access,
}

// ============================================================================
// Discord Sign-in
// ============================================================================

fn discord(state: &AppState) -> AuthResult<&DiscordClient> {
    state.discord.as_deref().ok_or(AuthError::DiscordUnavailable)
}

/// GET /auth/discord/authorize
pub async fn discord_authorize(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AuthResult<(CookieJar, Redirect)> {
    let client = discord(&state)?;
    let oauth_state = DiscordClient::generate_state();
    let url = client
        .authorize_url(&oauth_state)
        .map_err(|e| AuthError::Provider(e.to_string()))?;

    let cookie = Cookie::build((STATE_COOKIE, oauth_state))
        .path("/auth/discord")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::minutes(10))
        .build();

    Ok((jar.add(cookie), Redirect::to(&url)))
}

/// GET /auth/discord/callback?code=&state=
///
/// Links the Discord account (creating or updating the user and profile)
/// and issues an access token.
#[tracing::instrument(skip_all)]
pub async fn discord_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> AuthResult<(CookieJar, Json<TokenResponse>)> {
    let client = discord(&state)?;

    let expected = jar
        .get(STATE_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or(AuthError::InvalidState)?;
    if expected != query.state {
        return Err(AuthError::InvalidState);
    }
    let jar = jar.remove(Cookie::build(STATE_COOKIE).path("/auth/discord"));

    let grant = client
        .exchange_code(&query.code)
        .await
        .map_err(|e| AuthError::Provider(e.to_string()))?;
    let dc_user = client
        .current_user(&grant.access_token)
        .await
        .map_err(|e| AuthError::Provider(e.to_string()))?;

    let email = dc_user
        .email
        .as_deref()
        .filter(|e| !e.is_empty())
        .ok_or(AuthError::EmailRequired)?;
    let avatar_url = dc_user.avatar_url(client.cdn_base());

    let user = link_discord_identity(
        &state.db,
        &LinkIdentity {
            discord_id: &dc_user.id,
            refresh_token: &grant.refresh_token,
            email,
            display_name: &dc_user.username,
            avatar_url: &avatar_url,
        },
    )
    .await?;
    info!(user_id = %user.id, discord_id = %user.discord_id, "Discord identity linked");

    let expires_in = state.config.jwt_access_expiry;
    let access_token = issue_access_token(user.id, &state.config.jwt_secret, expires_in)?;

    Ok((
        jar,
        Json(TokenResponse {
            access_token,
            token_type: "Bearer",
            expires_in,
        }),
    ))
}

// ============================================================================
// Current User
// ============================================================================

/// GET /api/me
pub async fn get_me(auth_user: AuthUser) -> Json<MeResponse> {
    let permissions = Permission::all()
        .iter()
        .map(|p| (p.name(), auth_user.roles.access(*p)))
        .collect();

    Json(MeResponse {
        id: auth_user.id,
        roles: auth_user.roles.ids().map(String::from).collect(),
        email: auth_user.email,
        profile: auth_user.profile,
        permissions,
    })
}

/// GET /api/me/access/{permission}
///
/// Unknown permission names answer `undefined` rather than an error.
pub async fn get_access(auth_user: AuthUser, Path(permission): Path<String>) -> Json<AccessResponse> {
    let access = auth_user.roles.access_by_name(&permission);
    Json(AccessResponse { permission, access })
}
