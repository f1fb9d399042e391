/// PostgreSQL todo store
///
/// Thin adapter from [`TodoStore`] onto the queries in [`crate::models::todo`].

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{StoreResult, TodoStore};
use crate::db::pool;
use crate::models::todo::{CreateTodo, Todo};

/// Store backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgTodoStore {
    pool: PgPool,
}

impl PgTodoStore {
    /// Wraps an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool, for shutdown
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl TodoStore for PgTodoStore {
    fn kind(&self) -> &'static str {
        "postgres"
    }

    async fn list(&self, owner_id: &str) -> StoreResult<Vec<Todo>> {
        Ok(Todo::list_by_owner(&self.pool, owner_id).await?)
    }

    async fn insert(&self, data: CreateTodo) -> StoreResult<Todo> {
        Ok(Todo::create(&self.pool, data).await?)
    }

    async fn find(&self, id: Uuid, owner_id: &str) -> StoreResult<Option<Todo>> {
        Ok(Todo::find_by_id_and_owner(&self.pool, id, owner_id).await?)
    }

    async fn update_content(
        &self,
        id: Uuid,
        owner_id: &str,
        content: &str,
    ) -> StoreResult<Option<Todo>> {
        Ok(Todo::update_content(&self.pool, id, owner_id, content).await?)
    }

    async fn delete(&self, id: Uuid, owner_id: &str) -> StoreResult<bool> {
        Ok(Todo::delete(&self.pool, id, owner_id).await?)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(pool::health_check(&self.pool).await?)
    }
}
