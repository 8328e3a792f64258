//! Permission system types and utilities.
//!
//! Roles are static bundles of permission grants. A user's role set is
//! evaluated against one permission at a time and yields a tri-state
//! [`Access`] verdict.

pub mod access;
pub mod middleware;
pub mod permission;
pub mod roles;

pub use access::Access;
pub use middleware::require_permission;
pub use permission::{Permission, UnknownPermission};
pub use roles::{Role, RoleRegistry, Roles, ROLE_ADMIN, ROLE_PRO, ROLE_REGISTRY};
