/// Configuration management for the API server
///
/// This module loads configuration from environment variables (and a `.env`
/// file, if present) into a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `CORS_ORIGINS`: Comma-separated allowed origins (default: `*`)
/// - `PRODUCTION`: Enables HSTS (default: false)
/// - `TODO_STORE`: `postgres` or `memory` (default: postgres)
/// - `DATABASE_URL`: PostgreSQL connection string (required for postgres)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `SESSION_SECRET`: Secret the identity provider signs sessions with (required)
/// - `SESSION_ISSUER`: Expected `iss` claim (optional)
/// - `SESSION_COOKIE`: Session cookie name (default: `__session`)
/// - `LOG_FORMAT`: `pretty` or `json` (default: pretty)
/// - `RUST_LOG`: Log filter
///
/// # Example
///
/// ```no_run
/// use taskpad_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::{env, str::FromStr};
use taskpad_shared::auth::session::DEFAULT_SESSION_COOKIE;

/// Minimum accepted length of the session secret
pub const MIN_SECRET_LEN: usize = 32;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Todo store configuration
    pub store: StoreConfig,

    /// Session verification configuration
    pub session: SessionConfig,

    /// Log output format
    pub log_format: LogFormat,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins (`*` = any)
    pub cors_origins: Vec<String>,

    /// Production mode (enables HSTS)
    pub production: bool,
}

/// Which store backs the todos
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// PostgreSQL via sqlx
    Postgres,

    /// In-process, non-persistent
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => anyhow::bail!("Unknown TODO_STORE '{}': expected 'postgres' or 'memory'", other),
        }
    }
}

/// Todo store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Selected backend
    pub backend: StoreBackend,

    /// PostgreSQL connection URL (required for the postgres backend)
    pub database_url: Option<String>,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// Session verification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Secret key the identity provider signs session tokens with
    ///
    /// IMPORTANT: This must be kept secret and should be at least 32 bytes.
    #[serde(skip_serializing)]
    pub secret: String,

    /// Expected issuer, if the provider sets one
    pub issuer: Option<String>,

    /// Cookie carrying the session for form submissions
    pub cookie_name: String,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable
    Pretty,

    /// One JSON object per line
    Json,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing
    /// - Environment variables have invalid values
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = var("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = var("API_PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("API_PORT is invalid: {}", e))?;

        let cors_origins = var("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let production = var("PRODUCTION")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let backend = var("TODO_STORE")
            .map(|v| v.parse::<StoreBackend>())
            .transpose()?
            .unwrap_or(StoreBackend::Postgres);

        let database_url = var("DATABASE_URL");
        if backend == StoreBackend::Postgres && database_url.is_none() {
            anyhow::bail!("DATABASE_URL environment variable is required for the postgres store");
        }

        let max_connections = var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse::<u32>()
            .map_err(|e| anyhow::anyhow!("DATABASE_MAX_CONNECTIONS is invalid: {}", e))?;

        let secret = var("SESSION_SECRET")
            .ok_or_else(|| anyhow::anyhow!("SESSION_SECRET environment variable is required"))?;

        if secret.len() < MIN_SECRET_LEN {
            anyhow::bail!("SESSION_SECRET must be at least {} characters long", MIN_SECRET_LEN);
        }

        let log_format = match var("LOG_FORMAT").as_deref().map(str::to_ascii_lowercase) {
            Some(ref f) if f == "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                cors_origins,
                production,
            },
            store: StoreConfig {
                backend,
                database_url,
                max_connections,
            },
            session: SessionConfig {
                secret,
                issuer: var("SESSION_ISSUER"),
                cookie_name: var("SESSION_COOKIE")
                    .unwrap_or_else(|| DEFAULT_SESSION_COOKIE.to_string()),
            },
            log_format,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Whether CORS allows any origin
    pub fn cors_permissive(&self) -> bool {
        self.api.cors_origins.iter().any(|origin| origin == "*")
    }
}
