/// Session token verification (and minting, for development and tests)
///
/// Sessions are issued by the external identity provider as HS256-signed
/// JWTs. Taskpad only ever reads the `sub` claim (the provider's stable user
/// identifier) after the signature, expiry, not-before and issuer checks pass.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Validation**: Signature, expiration, not-before and optional issuer
/// - **Secret Management**: Secrets should be at least 32 bytes (256 bits)
///
/// # Example
///
/// ```
/// use taskpad_shared::auth::jwt::{create_token, validate_token, Claims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "your-secret-key-at-least-32-bytes-long";
///
/// let claims = Claims::new("user_2abc", None);
/// let token = create_token(&claims, secret)?;
///
/// let validated = validate_token(&token, secret, None)?;
/// assert_eq!(validated.sub, "user_2abc");
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Default lifetime of a minted session token
pub const DEFAULT_SESSION_LIFETIME_HOURS: i64 = 24;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token has an empty subject
    #[error("Token has no subject")]
    MissingSubject,

    /// Invalid issuer
    #[error("Invalid issuer: expected {expected}")]
    InvalidIssuer { expected: String },
}

/// Session claims
///
/// # Standard Claims
///
/// - `sub`: Subject (identity provider user ID, opaque string)
/// - `iss`: Issuer (optional, checked when configured)
/// - `iat`: Issued at timestamp
/// - `exp`: Expiration timestamp
/// - `nbf`: Not before timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user ID assigned by the identity provider
    pub sub: String,

    /// Issuer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,
}

impl Claims {
    /// Creates claims with the default session lifetime
    pub fn new(user_id: impl Into<String>, issuer: Option<&str>) -> Self {
        Self::with_expiration(
            user_id,
            issuer,
            Duration::hours(DEFAULT_SESSION_LIFETIME_HOURS),
        )
    }

    /// Creates claims with custom expiration
    ///
    /// # Example
    ///
    /// ```
    /// use taskpad_shared::auth::jwt::Claims;
    /// use chrono::Duration;
    ///
    /// let claims = Claims::with_expiration("user_2abc", Some("https://id.example"), Duration::hours(1));
    /// assert!(!claims.is_expired());
    /// ```
    pub fn with_expiration(
        user_id: impl Into<String>,
        issuer: Option<&str>,
        expires_in: Duration,
    ) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user_id.into(),
            iss: issuer.map(str::to_string),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
        }
    }

    /// Checks if token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Gets time until expiration
    pub fn time_until_expiration(&self) -> Option<Duration> {
        let now = Utc::now().timestamp();
        if self.exp > now {
            Some(Duration::seconds(self.exp - now))
        } else {
            None
        }
    }
}

/// Creates a signed session token from claims
///
/// Used by the development identity provider and the test suites; production
/// tokens come from the external provider.
///
/// # Errors
///
/// Returns `JwtError::CreateError` if token creation fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a session token and extracts claims
///
/// Verifies:
/// - Signature is valid
/// - Token hasn't expired
/// - Token is not used before nbf time
/// - Issuer matches `expected_issuer`, when one is given
/// - Subject is not empty
///
/// # Errors
///
/// Returns an error describing the first failed check.
pub fn validate_token(
    token: &str,
    secret: &str,
    expected_issuer: Option<&str>,
) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.leeway = 0;
    if let Some(issuer) = expected_issuer {
        validation.set_issuer(&[issuer]);
    }

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer {
            expected: expected_issuer.unwrap_or_default().to_string(),
        },
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    if token_data.claims.sub.trim().is_empty() {
        return Err(JwtError::MissingSubject);
    }

    Ok(token_data.claims)
}
