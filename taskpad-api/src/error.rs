/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// JSON handlers return `Result<T, ApiError>`, which converts to the status
/// code and `{ "error", "code" }` body below.
///
/// # Response Body
///
/// ```json
/// { "error": "Todo not found", "code": "not_found" }
/// ```
///
/// # Example
///
/// ```
/// use taskpad_api::error::{ApiError, ApiResult};
/// use axum::Json;
/// use serde_json::json;
///
/// async fn handler(found: bool) -> ApiResult<Json<serde_json::Value>> {
///     if !found {
///         return Err(ApiError::NotFound("Todo not found".to_string()));
///     }
///     Ok(Json(json!({ "ok": true })))
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use taskpad_shared::commands::CommandError;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Not found (404)
    NotFound(String),

    /// Internal server error (500)
    ///
    /// The message is sent to the client, so it must not carry internals.
    InternalError(String),
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,

    /// Machine-readable error code (e.g., "bad_request", "unauthorized")
    pub code: String,
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::NotFound(_) => "not_found",
            ApiError::InternalError(_) => "internal_error",
        }
    }

    fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::InternalError(msg) => msg,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorResponse {
            error: self.message().to_string(),
            code: self.code().to_string(),
        });

        (status, body).into_response()
    }
}

/// Convert command errors to API errors
impl From<CommandError> for ApiError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Unauthorized => ApiError::Unauthorized("Unauthorized".to_string()),
            CommandError::InvalidInput(msg) => ApiError::BadRequest(msg),
            CommandError::NotFound => ApiError::NotFound("Todo not found".to_string()),
            CommandError::StoreFailure(msg) => ApiError::InternalError(msg),
        }
    }
}
