//! Database Models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::permissions::{RoleRegistry, Roles, ROLE_REGISTRY};

/// Raw `users` row as stored.
///
/// Never handed to callers directly: every read goes through
/// [`UserRow::into_user`] so roles are always decoded.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub role_names: Vec<String>,
    pub discord_id: String,
    pub discord_refresh_token: String,
    pub email: String,
}

impl UserRow {
    /// Materialize a user, resolving stored role names against the
    /// process-wide registry.
    pub fn into_user(self, profile: Option<Profile>) -> User {
        self.into_user_with(&ROLE_REGISTRY, profile)
    }

    /// Same as [`UserRow::into_user`] with an explicit registry.
    pub fn into_user_with(self, registry: &RoleRegistry, profile: Option<Profile>) -> User {
        let roles = registry.decode(&self.role_names);
        User {
            id: self.id,
            created_at: self.created_at,
            role_names: self.role_names,
            discord_id: self.discord_id,
            discord_refresh_token: self.discord_refresh_token,
            email: self.email,
            roles,
            profile,
        }
    }
}

/// `users` row joined with its optional profile.
#[derive(Debug, Clone, FromRow)]
pub struct UserWithProfileRow {
    #[sqlx(flatten)]
    pub user: UserRow,
    pub profile_name: Option<String>,
    pub profile_avatar_url: Option<String>,
}

impl UserWithProfileRow {
    pub fn into_user(self) -> User {
        let profile = match (self.profile_name, self.profile_avatar_url) {
            (Some(name), Some(avatar_url)) => Some(Profile {
                user_id: self.user.id,
                name,
                avatar_url,
            }),
            _ => None,
        };
        self.user.into_user(profile)
    }
}

/// User with decoded roles and eagerly loaded profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Role identifiers as stored, including ones the registry no longer knows.
    pub role_names: Vec<String>,
    pub discord_id: String,
    pub discord_refresh_token: String,
    pub email: String,
    /// Known roles resolved from `role_names`.
    pub roles: Roles,
    pub profile: Option<Profile>,
}

/// Public profile, one per user.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Profile {
    #[serde(skip)]
    pub user_id: Uuid,
    pub name: String,
    pub avatar_url: String,
}

/// One downloadable file of a published build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramFile {
    /// Path relative to the install root.
    pub path: String,
    pub download_url: String,
    pub hash: String,
}

/// Published build keyed by (type, os, arch, branch).
#[derive(Debug, Clone, FromRow)]
pub struct ProgramEntry {
    pub id: i64,
    #[sqlx(rename = "type")]
    pub program_type: String,
    pub os: String,
    pub arch: String,
    pub branch: String,
    pub files: Json<Vec<ProgramFile>>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::{Access, Permission, Role, ROLE_PRO};

    fn row(role_names: &[&str]) -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            role_names: role_names.iter().map(|s| (*s).to_string()).collect(),
            discord_id: "123".into(),
            discord_refresh_token: "123".into(),
            email: "user@rol.es".into(),
        }
    }

    #[test]
    fn test_into_user_drops_unknown_roles() {
        let user = row(&[ROLE_PRO, "UNDEFINED role"]).into_user(None);

        assert_eq!(user.role_names.len(), 2);
        assert_eq!(user.roles.ids().collect::<Vec<_>>(), vec![ROLE_PRO]);
        assert_eq!(user.roles.access(Permission::DownloadPro), Access::Allowed);
        assert_eq!(
            user.roles.access(Permission::AdminDashboard),
            Access::Undefined
        );
    }

    #[test]
    fn test_into_user_with_custom_registry() {
        let registry = RoleRegistry::from_roles([Role::new("beta")]);
        let user = row(&[ROLE_PRO, "beta"]).into_user_with(&registry, None);
        assert_eq!(user.roles.ids().collect::<Vec<_>>(), vec!["beta"]);
    }

    #[test]
    fn test_joined_row_without_profile() {
        let joined = UserWithProfileRow {
            user: row(&[]),
            profile_name: None,
            profile_avatar_url: None,
        };
        let user = joined.into_user();
        assert!(user.profile.is_none());
        assert!(user.roles.is_empty());
    }

    #[test]
    fn test_joined_row_with_profile() {
        let base = row(&[]);
        let id = base.id;
        let joined = UserWithProfileRow {
            user: base,
            profile_name: Some("www_makin_cc".into()),
            profile_avatar_url: Some("https://cdn.example/a.png".into()),
        };
        let profile = joined.into_user().profile.unwrap();
        assert_eq!(profile.user_id, id);
        assert_eq!(profile.name, "www_makin_cc");
    }

    #[test]
    fn test_program_file_wire_shape() {
        let file = ProgramFile {
            path: "installer.pkg".into(),
            download_url: "https://buzkaaclicker.pl/sample".into(),
            hash: "499".into(),
        };
        assert_eq!(
            serde_json::to_string(&file).unwrap(),
            r#"{"path":"installer.pkg","download_url":"https://buzkaaclicker.pl/sample","hash":"499"}"#
        );
    }
}
