/// Database models for Taskpad
///
/// # Models
///
/// - `todo`: the single persisted to-do item and its owner-scoped queries

pub mod todo;
