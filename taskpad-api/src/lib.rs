//! # Taskpad API Server Library
//!
//! HTTP fronts over the shared todo commands.
//!
//! ## Modules
//!
//! - `actions`: Server-rendered-form front (in-process functions and form routes)
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Session resolution and security headers
//! - `routes`: JSON, dashboard and health route handlers

pub mod actions;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
