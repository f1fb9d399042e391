/// Todo persistence port
///
/// Commands talk to storage only through [`TodoStore`]. Every single-row
/// operation takes the owner and must fold it into the match predicate:
/// implementations report "no row" both when the ID does not exist and when
/// it belongs to another owner.
///
/// # Adapters
///
/// - [`postgres::PgTodoStore`]: the production store (sqlx)
/// - [`memory::MemoryTodoStore`]: in-process store for development and tests

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::todo::{CreateTodo, Todo};

pub use memory::MemoryTodoStore;
pub use postgres::PgTodoStore;

/// Error raised by a store adapter
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database driver error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Store cannot serve requests
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence operations on todos, all scoped to one owner
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Short adapter name for logs and health output
    fn kind(&self) -> &'static str;

    /// All todos of `owner_id`, newest first
    async fn list(&self, owner_id: &str) -> StoreResult<Vec<Todo>>;

    /// Inserts a todo and returns it with its generated ID and timestamp
    async fn insert(&self, data: CreateTodo) -> StoreResult<Todo>;

    /// The todo with `id` if it belongs to `owner_id`
    async fn find(&self, id: Uuid, owner_id: &str) -> StoreResult<Option<Todo>>;

    /// Sets the content of the todo with `id` if it belongs to `owner_id`
    async fn update_content(
        &self,
        id: Uuid,
        owner_id: &str,
        content: &str,
    ) -> StoreResult<Option<Todo>>;

    /// Deletes the todo with `id` if it belongs to `owner_id`; `false` if nothing matched
    async fn delete(&self, id: Uuid, owner_id: &str) -> StoreResult<bool>;

    /// Checks that the store can serve requests
    async fn ping(&self) -> StoreResult<()>;
}
