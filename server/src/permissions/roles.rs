//! Role registry and role sets.
//!
//! The registry is built once per process and never mutated. Users store
//! role identifiers as plain strings; identifiers the registry does not know
//! are dropped when a user is loaded, so retired roles never break reads.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::{Serialize, Serializer};

use super::access::Access;
use super::permission::Permission;

/// Identifier of the paid tier role.
pub const ROLE_PRO: &str = "pro";
/// Identifier of the administrator role.
pub const ROLE_ADMIN: &str = "admin";

/// Process-wide role registry.
pub static ROLE_REGISTRY: LazyLock<RoleRegistry> = LazyLock::new(RoleRegistry::builtin);

/// A named bundle of permission grants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    id: String,
    allows: Vec<Permission>,
    denies: Vec<Permission>,
}

impl Role {
    /// Create a role with no grants.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            allows: Vec::new(),
            denies: Vec::new(),
        }
    }

    /// Add an allow grant.
    #[must_use]
    pub fn allow(mut self, permission: Permission) -> Self {
        if !self.allows.contains(&permission) {
            self.allows.push(permission);
        }
        self
    }

    /// Add an explicit deny grant.
    #[must_use]
    pub fn deny(mut self, permission: Permission) -> Self {
        if !self.denies.contains(&permission) {
            self.denies.push(permission);
        }
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn allows(&self) -> &[Permission] {
        &self.allows
    }

    pub fn denies(&self) -> &[Permission] {
        &self.denies
    }

    /// What this single role says about a permission.
    #[must_use]
    pub fn access(&self, permission: Permission) -> Access {
        if self.allows.contains(&permission) {
            Access::Allowed
        } else if self.denies.contains(&permission) {
            Access::Denied
        } else {
            Access::Undefined
        }
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.id)
    }
}

/// Roles attached to one user, already resolved against a registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Roles(Vec<Role>);

impl Roles {
    /// Evaluate every role against `permission`.
    #[must_use]
    pub fn access(&self, permission: Permission) -> Access {
        Access::combine(self.0.iter().map(|role| role.access(permission)))
    }

    /// Evaluate a permission given by name; unknown names are `Undefined`.
    #[must_use]
    pub fn access_by_name(&self, permission: &str) -> Access {
        permission
            .parse::<Permission>()
            .map_or(Access::Undefined, |p| self.access(p))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(Role::id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Role> for Roles {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Catalog mapping role identifiers to role definitions.
#[derive(Debug, Clone, Default)]
pub struct RoleRegistry {
    roles: HashMap<String, Role>,
}

impl RoleRegistry {
    /// Registry with the roles this deployment ships.
    pub fn builtin() -> Self {
        Self::from_roles([
            Role::new(ROLE_PRO).allow(Permission::DownloadPro),
            Role::new(ROLE_ADMIN)
                .allow(Permission::AdminDashboard)
                .allow(Permission::DownloadPro),
        ])
    }

    /// Build a registry from role definitions. Later duplicates replace
    /// earlier ones.
    pub fn from_roles<I>(roles: I) -> Self
    where
        I: IntoIterator<Item = Role>,
    {
        Self {
            roles: roles
                .into_iter()
                .map(|role| (role.id.clone(), role))
                .collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Role> {
        self.roles.get(id)
    }

    /// Resolve stored identifiers, keeping their order and silently dropping
    /// unknown ones.
    pub fn decode<S: AsRef<str>>(&self, ids: &[S]) -> Roles {
        ids.iter()
            .filter_map(|id| {
                let role = self.get(id.as_ref());
                if role.is_none() {
                    tracing::debug!(role_id = %id.as_ref(), "Ignoring unknown role identifier");
                }
                role.cloned()
            })
            .collect()
    }
}
