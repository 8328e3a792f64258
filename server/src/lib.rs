//! Launchpad Server
//!
//! Account roles and program distribution backend: evaluates role-based
//! permissions and resolves which build files to serve for a product type,
//! OS, CPU architecture and release branch.

pub mod admin;
pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod permissions;
pub mod program;
