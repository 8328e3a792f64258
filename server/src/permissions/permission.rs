//! Protectable actions.
//!
//! Permissions carry no hierarchy. Each role independently lists which ones
//! it allows or denies.

use std::fmt;
use std::str::FromStr;

/// An action gated by the access evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Download builds published on restricted branches.
    DownloadPro,
    /// Open the administrative dashboard and user lookup.
    AdminDashboard,
}

impl Permission {
    /// Returns the stable wire name of the permission.
    ///
    /// # Examples
    ///
    /// ```
    /// use launchpad_server::permissions::Permission;
    ///
    /// assert_eq!(Permission::DownloadPro.name(), "download_pro");
    /// ```
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::DownloadPro => "download_pro",
            Self::AdminDashboard => "admin_dashboard",
        }
    }

    /// Returns all permissions as a slice.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::DownloadPro, Self::AdminDashboard]
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string names no known permission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown permission: {0}")]
pub struct UnknownPermission(pub String);

impl FromStr for Permission {
    type Err = UnknownPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|p| p.name() == s)
            .ok_or_else(|| UnknownPermission(s.to_string()))
    }
}
