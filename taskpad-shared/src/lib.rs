//! # Taskpad Shared Library
//!
//! Domain core of Taskpad: the todo model, its owner-scoped store, identity
//! resolution and the command handlers both HTTP fronts call into.
//!
//! ## Module Organization
//!
//! - `auth`: Session token validation and request identity resolution
//! - `commands`: List / create / get / update / delete handlers
//! - `db`: PostgreSQL pool and embedded migrations
//! - `models`: Database models
//! - `store`: `TodoStore` port with PostgreSQL and in-memory adapters
//! - `validation`: Content and ID checks
//! - `views`: View invalidation port and the dashboard cache

pub mod auth;
pub mod commands;
pub mod db;
pub mod models;
pub mod store;
pub mod validation;
pub mod views;

/// Current version of the Taskpad shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
