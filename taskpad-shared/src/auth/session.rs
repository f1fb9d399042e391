/// Request-scoped identity resolution
///
/// The identity provider is external; this module only turns the credentials
/// carried by a request into an [`AuthContext`] (or "no session"). Commands
/// never look at request data themselves, and never trust a user ID supplied
/// by the client: the only source of identity is an [`IdentityResolver`].
///
/// # Credential Sources
///
/// Checked in order:
/// 1. `Authorization: Bearer <token>` (client-rendered pages, API clients)
/// 2. The session cookie, `__session` by default (server-rendered forms)
///
/// # Example
///
/// ```
/// use axum::http::{header, HeaderMap, HeaderValue};
/// use taskpad_shared::auth::jwt::{create_token, Claims};
/// use taskpad_shared::auth::session::{IdentityResolver, JwtIdentityResolver};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "your-secret-key-at-least-32-bytes-long";
/// let resolver = JwtIdentityResolver::new(secret, None);
///
/// let token = create_token(&Claims::new("user_2abc", None), secret)?;
/// let mut headers = HeaderMap::new();
/// headers.insert(header::AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", token))?);
///
/// let auth = resolver.resolve(&headers).await.expect("session");
/// assert_eq!(auth.user_id, "user_2abc");
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};

use super::jwt::validate_token;

/// Default cookie carrying the session token
pub const DEFAULT_SESSION_COOKIE: &str = "__session";

/// Authenticated caller
///
/// Added to request extensions by the API's session layer and passed
/// explicitly to every command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Stable user ID from the identity provider
    pub user_id: String,
}

impl AuthContext {
    /// Creates an auth context for a resolved user
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// Maps request credentials to an identity
///
/// Returning `None` means "no session"; callers must treat every reason for
/// that (no credentials, bad signature, expired token) the same way.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolves the caller from request headers
    async fn resolve(&self, headers: &HeaderMap) -> Option<AuthContext>;
}

/// Resolver for HS256 session tokens issued by the identity provider
#[derive(Debug, Clone)]
pub struct JwtIdentityResolver {
    secret: String,
    issuer: Option<String>,
    cookie_name: String,
}

impl JwtIdentityResolver {
    /// Creates a resolver that checks the signature with `secret` and,
    /// if given, the `iss` claim against `issuer`
    pub fn new(secret: impl Into<String>, issuer: Option<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer,
            cookie_name: DEFAULT_SESSION_COOKIE.to_string(),
        }
    }

    /// Overrides the session cookie name
    pub fn with_cookie_name(mut self, cookie_name: impl Into<String>) -> Self {
        self.cookie_name = cookie_name.into();
        self
    }

    fn token_from_headers<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        let bearer = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty());

        bearer.or_else(|| session_cookie(headers, &self.cookie_name))
    }
}

#[async_trait]
impl IdentityResolver for JwtIdentityResolver {
    async fn resolve(&self, headers: &HeaderMap) -> Option<AuthContext> {
        let token = self.token_from_headers(headers)?;

        match validate_token(token, &self.secret, self.issuer.as_deref()) {
            Ok(claims) => Some(AuthContext::new(claims.sub)),
            Err(e) => {
                tracing::debug!(error = %e, "Rejected session token");
                None
            }
        }
    }
}

/// Finds a cookie value by name across all `Cookie` headers
fn session_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}
