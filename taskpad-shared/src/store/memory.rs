/// In-process todo store
///
/// Keeps todos in insertion order behind a `tokio::sync::RwLock`. Each
/// operation takes the lock once, so single-row writes are atomic just like
/// the PostgreSQL statements they stand in for. Data is lost on restart.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StoreResult, TodoStore};
use crate::models::todo::{CreateTodo, Todo};

/// Store keeping todos in memory
#[derive(Debug, Default)]
pub struct MemoryTodoStore {
    todos: RwLock<Vec<Todo>>,
}

impl MemoryTodoStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of todos across all owners
    pub async fn len(&self) -> usize {
        self.todos.read().await.len()
    }

    /// Whether the store holds no todos at all
    pub async fn is_empty(&self) -> bool {
        self.todos.read().await.is_empty()
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    fn kind(&self) -> &'static str {
        "memory"
    }

    async fn list(&self, owner_id: &str) -> StoreResult<Vec<Todo>> {
        let todos = self.todos.read().await;

        // Newest insert first, then a stable sort keeps that order for equal timestamps
        let mut owned: Vec<Todo> = todos
            .iter()
            .rev()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(owned)
    }

    async fn insert(&self, data: CreateTodo) -> StoreResult<Todo> {
        let todo = Todo {
            id: Uuid::new_v4(),
            content: data.content,
            owner_id: data.owner_id,
            created_at: Utc::now(),
        };

        self.todos.write().await.push(todo.clone());
        Ok(todo)
    }

    async fn find(&self, id: Uuid, owner_id: &str) -> StoreResult<Option<Todo>> {
        let todos = self.todos.read().await;
        Ok(todos
            .iter()
            .find(|t| t.id == id && t.owner_id == owner_id)
            .cloned())
    }

    async fn update_content(
        &self,
        id: Uuid,
        owner_id: &str,
        content: &str,
    ) -> StoreResult<Option<Todo>> {
        let mut todos = self.todos.write().await;
        Ok(todos
            .iter_mut()
            .find(|t| t.id == id && t.owner_id == owner_id)
            .map(|t| {
                t.content = content.to_string();
                t.clone()
            }))
    }

    async fn delete(&self, id: Uuid, owner_id: &str) -> StoreResult<bool> {
        let mut todos = self.todos.write().await;
        let before = todos.len();
        todos.retain(|t| !(t.id == id && t.owner_id == owner_id));
        Ok(todos.len() < before)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
