/// API route handlers
///
/// - `health`: Health check endpoint
/// - `todos`: JSON todo endpoints
/// - `dashboard`: Cached dashboard view

pub mod dashboard;
pub mod health;
pub mod todos;
