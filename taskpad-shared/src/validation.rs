/// Input validation for todo commands
///
/// Both fronts hand raw, possibly missing fields to the commands; this module
/// turns them into typed values or an `InvalidInput` message.
///
/// # Rules
///
/// - `content`: required, not blank after trimming, at most
///   [`MAX_CONTENT_CHARS`] characters. The stored value is the submitted
///   string, untouched. Create and update apply the same rule.
/// - `id`: must be a UUID, exactly as submitted (no trimming).

use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Upper bound on todo content length, in characters
pub const MAX_CONTENT_CHARS: u64 = 10_000;

/// Message for missing, empty or blank content
pub const CONTENT_REQUIRED: &str = "content required";

/// Message for content over the length limit
pub const CONTENT_TOO_LONG: &str = "content too long";

/// Message for an ID that is not a UUID
pub const MALFORMED_ID: &str = "malformed id";

/// Validated todo content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoContent(String);

impl TodoContent {
    /// Validated content as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper
    pub fn into_inner(self) -> String {
        self.0
    }
}

#[derive(Debug, Validate)]
struct ContentCheck {
    #[validate(custom(function = "check_content"))]
    content: String,
}

#[allow(clippy::ptr_arg)]
fn check_content(content: &String) -> Result<(), ValidationError> {
    if content.trim().is_empty() {
        return Err(ValidationError::new(CONTENT_REQUIRED));
    }
    if content.chars().count() as u64 > MAX_CONTENT_CHARS {
        return Err(ValidationError::new(CONTENT_TOO_LONG));
    }
    Ok(())
}

/// Validates raw content
///
/// Returns the error message on failure.
pub fn parse_content(raw: Option<String>) -> Result<TodoContent, &'static str> {
    let check = ContentCheck {
        content: raw.ok_or(CONTENT_REQUIRED)?,
    };

    if let Err(errors) = check.validate() {
        let too_long = errors
            .field_errors()
            .get("content")
            .and_then(|errs| errs.first())
            .is_some_and(|err| err.code == CONTENT_TOO_LONG);

        return Err(if too_long { CONTENT_TOO_LONG } else { CONTENT_REQUIRED });
    }

    Ok(TodoContent(check.content))
}

/// Parses a todo ID
pub fn parse_id(raw: &str) -> Result<Uuid, &'static str> {
    Uuid::parse_str(raw).map_err(|_| MALFORMED_ID)
}
