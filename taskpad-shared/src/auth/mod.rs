/// Authentication utilities
///
/// Identity is owned by an external provider. This module verifies the
/// session tokens it issues and exposes the caller as an [`session::AuthContext`].
///
/// # Modules
///
/// - [`jwt`]: HS256 session token validation (and minting for dev/tests)
/// - [`session`]: `IdentityResolver` port and the JWT-backed resolver

pub mod jwt;
pub mod session;
