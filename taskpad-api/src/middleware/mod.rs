/// Middleware modules for the API server
///
/// - Security headers
/// - Session resolution

pub mod security;
pub mod session;
