//! Discord OAuth2 Client
//!
//! Authorization-code flow against Discord's manual OAuth2 endpoints, plus
//! the `/users/@me` lookup and avatar URL derivation.

use anyhow::{anyhow, Context};
use rand::distributions::Alphanumeric;
use rand::Rng;
use reqwest::Url;
use serde::Deserialize;

use crate::config::Config;

/// Scopes requested from Discord.
pub const DISCORD_SCOPES: &str = "identify email";

/// Number of default avatars Discord rotates through.
const DEFAULT_AVATAR_COUNT: u64 = 6;

/// Discord account as returned by `/users/@me`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DiscordUser {
    /// Snowflake ID.
    pub id: String,
    pub username: String,
    /// Only present with the `email` scope.
    #[serde(default)]
    pub email: Option<String>,
    /// Avatar hash; `None` when the account uses a default avatar.
    #[serde(default, rename = "avatar")]
    pub avatar_hash: Option<String>,
}

impl DiscordUser {
    /// Public URL of the user's avatar on the Discord CDN.
    ///
    /// Animated avatars (hash prefixed with `a_`) are served as GIF. Accounts
    /// without a custom avatar get one of the default avatars, picked from the
    /// snowflake the way the Discord client does.
    ///
    /// # Examples
    ///
    /// ```
    /// use launchpad_server::auth::discord::DiscordUser;
    ///
    /// let user = DiscordUser {
    ///     id: "80351110224678912".into(),
    ///     username: "nelly".into(),
    ///     email: None,
    ///     avatar_hash: Some("8342729096ea3675442027381ff50dfe".into()),
    /// };
    /// assert_eq!(
    ///     user.avatar_url("https://cdn.discordapp.com"),
    ///     "https://cdn.discordapp.com/avatars/80351110224678912/8342729096ea3675442027381ff50dfe.png"
    /// );
    /// ```
    pub fn avatar_url(&self, cdn_base: &str) -> String {
        let cdn_base = cdn_base.trim_end_matches('/');
        match self.avatar_hash.as_deref().filter(|h| !h.is_empty()) {
            Some(hash) => {
                let ext = if hash.starts_with("a_") { "gif" } else { "png" };
                format!("{cdn_base}/avatars/{}/{hash}.{ext}", self.id)
            }
            None => {
                let index = self
                    .id
                    .parse::<u64>()
                    .map_or(0, |id| (id >> 22) % DEFAULT_AVATAR_COUNT);
                format!("{cdn_base}/embed/avatars/{index}.png")
            }
        }
    }
}

/// Tokens granted by the code exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: String,
}

/// Client for one Discord OAuth2 application.
#[derive(Debug, Clone)]
pub struct DiscordClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    api_base: String,
    cdn_base: String,
}

impl DiscordClient {
    /// Build a client from config; `None` when Discord is not configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        Some(Self {
            http: reqwest::Client::new(),
            client_id: config.discord_client_id.clone()?,
            client_secret: config.discord_client_secret.clone()?,
            redirect_uri: config.discord_redirect_uri.clone()?,
            api_base: config.discord_api_base.trim_end_matches('/').to_string(),
            cdn_base: config.discord_cdn_base.clone(),
        })
    }

    pub fn cdn_base(&self) -> &str {
        &self.cdn_base
    }

    /// Random value for the OAuth2 `state` parameter.
    pub fn generate_state() -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect()
    }

    /// URL the browser is sent to for consent.
    pub fn authorize_url(&self, state: &str) -> anyhow::Result<String> {
        let mut url = Url::parse(&format!("{}/oauth2/authorize", self.api_base))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", DISCORD_SCOPES)
            .append_pair("state", state)
            .append_pair("prompt", "none");
        Ok(url.to_string())
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(&self, code: &str) -> anyhow::Result<TokenGrant> {
        let resp = self
            .http
            .post(format!("{}/oauth2/token", self.api_base))
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header("Accept", "application/json")
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .send()
            .await
            .context("Token request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body: serde_json::Value = resp.json().await.unwrap_or_default();
            let err = body["error"].as_str().unwrap_or("unknown");
            let desc = body["error_description"].as_str().unwrap_or("");
            return Err(anyhow!("Token exchange failed ({status}): {err} {desc}"));
        }

        resp.json::<TokenGrant>()
            .await
            .context("Malformed token response")
    }

    /// Fetch the account the access token belongs to.
    pub async fn current_user(&self, access_token: &str) -> anyhow::Result<DiscordUser> {
        let resp = self
            .http
            .get(format!("{}/users/@me", self.api_base))
            .bearer_auth(access_token)
            .header("Accept", "application/json")
            .send()
            .await
            .context("User request failed")?
            .error_for_status()
            .context("Discord rejected user request")?;

        resp.json::<DiscordUser>()
            .await
            .context("Malformed user response")
    }
}
