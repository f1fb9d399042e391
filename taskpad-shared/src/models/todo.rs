/// Todo model and database operations
///
/// A todo is a short piece of text owned by exactly one user. Every query
/// that targets a single row carries the owner in its `WHERE` clause, so a
/// row belonging to somebody else is indistinguishable from a missing row.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     owner_id TEXT NOT NULL,
///     content TEXT NOT NULL CHECK (length(btrim(content, E' \t\n\r\f\x0B')) > 0),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskpad_shared::models::todo::{CreateTodo, Todo};
/// use taskpad_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let todo = Todo::create(&pool, CreateTodo {
///     owner_id: "user_2abc".to_string(),
///     content: "Water the plants".to_string(),
/// }).await?;
///
/// let todos = Todo::list_by_owner(&pool, "user_2abc").await?;
/// assert_eq!(todos[0].id, todo.id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A single to-do item
///
/// Serializes as `{ "id", "content", "createdAt" }`; the owner never leaves
/// the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Unique todo ID
    pub id: Uuid,

    /// Task description
    pub content: String,

    /// Identity provider user ID of the creator
    #[serde(skip_serializing, default)]
    pub owner_id: String,

    /// When the todo was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new todo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodo {
    /// Owner (always the resolved caller)
    pub owner_id: String,

    /// Validated content
    pub content: String,
}

impl Todo {
    /// Inserts a new todo owned by `data.owner_id`
    pub async fn create(pool: &PgPool, data: CreateTodo) -> Result<Self, sqlx::Error> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO tasks (owner_id, content)
            VALUES ($1, $2)
            RETURNING id, content, owner_id, created_at
            "#,
        )
        .bind(data.owner_id)
        .bind(data.content)
        .fetch_one(pool)
        .await?;

        Ok(todo)
    }

    /// Lists all todos of an owner, newest first
    pub async fn list_by_owner(pool: &PgPool, owner_id: &str) -> Result<Vec<Self>, sqlx::Error> {
        let todos = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, content, owner_id, created_at
            FROM tasks
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(todos)
    }

    /// Finds a todo by ID with owner isolation
    pub async fn find_by_id_and_owner(
        pool: &PgPool,
        id: Uuid,
        owner_id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, content, owner_id, created_at
            FROM tasks
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(todo)
    }

    /// Replaces the content of an owner's todo
    ///
    /// Returns `None` when no row matches both ID and owner.
    pub async fn update_content(
        pool: &PgPool,
        id: Uuid,
        owner_id: &str,
        content: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            UPDATE tasks
            SET content = $3
            WHERE id = $1 AND owner_id = $2
            RETURNING id, content, owner_id, created_at
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(content)
        .fetch_optional(pool)
        .await?;

        Ok(todo)
    }

    /// Deletes an owner's todo
    ///
    /// Returns `false` when no row matches both ID and owner.
    pub async fn delete(pool: &PgPool, id: Uuid, owner_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
