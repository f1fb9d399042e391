/// Todo command handlers
///
/// One method per operation, shared by the JSON API and the form front.
/// Every command runs the same pipeline:
///
/// ```text
/// session ──> Unauthorized if absent
///    └─> validate input ──> InvalidInput
///          └─> one owner-scoped store call ──> NotFound / StoreFailure
///                └─> invalidate dashboard (mutations only)
/// ```
///
/// Ownership is never checked after a fetch: the caller's ID is part of the
/// store predicate, so another owner's todo simply does not match.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use taskpad_shared::auth::session::AuthContext;
/// use taskpad_shared::commands::TodoCommands;
/// use taskpad_shared::store::MemoryTodoStore;
/// use taskpad_shared::views::NoopInvalidator;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let commands = TodoCommands::new(Arc::new(MemoryTodoStore::new()), Arc::new(NoopInvalidator));
/// let alice = AuthContext::new("user_alice");
///
/// let todo = commands.create(Some(&alice), Some("Water the plants".to_string())).await?;
/// let fetched = commands.get(Some(&alice), &todo.id.to_string()).await?;
/// assert_eq!(fetched.content, "Water the plants");
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;

use crate::auth::session::AuthContext;
use crate::models::todo::{CreateTodo, Todo};
use crate::store::{StoreError, TodoStore};
use crate::validation::{parse_content, parse_id};
use crate::views::{ViewInvalidator, DASHBOARD_VIEW};

/// Failure of a todo command
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// No resolvable identity
    #[error("Unauthorized")]
    Unauthorized,

    /// Field validation failed
    #[error("{0}")]
    InvalidInput(String),

    /// No todo with this ID for the caller
    #[error("Todo not found")]
    NotFound,

    /// Store call failed; carries a client-safe message only
    #[error("{0}")]
    StoreFailure(String),
}

/// Result type for todo commands
pub type CommandResult<T> = Result<T, CommandError>;

/// Todo command handlers bound to a store and a view invalidator
///
/// Cheap to clone; holds no mutable state of its own.
#[derive(Clone)]
pub struct TodoCommands {
    store: Arc<dyn TodoStore>,
    views: Arc<dyn ViewInvalidator>,
}

impl TodoCommands {
    /// Creates command handlers
    pub fn new(store: Arc<dyn TodoStore>, views: Arc<dyn ViewInvalidator>) -> Self {
        Self { store, views }
    }

    /// Lists the caller's todos, newest first
    pub async fn list(&self, session: Option<&AuthContext>) -> CommandResult<Vec<Todo>> {
        let owner = caller(session)?;
        tracing::debug!(owner_id = %owner, "Listing todos");

        self.store
            .list(owner)
            .await
            .map_err(|e| store_failure(e, "Failed to fetch todos"))
    }

    /// Creates a todo owned by the caller
    pub async fn create(
        &self,
        session: Option<&AuthContext>,
        content: Option<String>,
    ) -> CommandResult<Todo> {
        let owner = caller(session)?;
        let content = parse_content(content).map_err(invalid)?;

        let todo = self
            .store
            .insert(CreateTodo {
                owner_id: owner.to_string(),
                content: content.into_inner(),
            })
            .await
            .map_err(|e| store_failure(e, "Failed to create todo"))?;

        tracing::info!(owner_id = %owner, todo_id = %todo.id, "Todo created");
        self.views.invalidate(owner, DASHBOARD_VIEW).await;

        Ok(todo)
    }

    /// Fetches one of the caller's todos
    pub async fn get(&self, session: Option<&AuthContext>, id: &str) -> CommandResult<Todo> {
        let owner = caller(session)?;
        let id = parse_id(id).map_err(invalid)?;
        tracing::debug!(owner_id = %owner, todo_id = %id, "Getting todo");

        self.store
            .find(id, owner)
            .await
            .map_err(|e| store_failure(e, "Failed to fetch todo"))?
            .ok_or_else(|| not_found(owner, id))
    }

    /// Replaces the content of one of the caller's todos
    pub async fn update(
        &self,
        session: Option<&AuthContext>,
        id: &str,
        content: Option<String>,
    ) -> CommandResult<Todo> {
        let owner = caller(session)?;
        let id = parse_id(id).map_err(invalid)?;
        let content = parse_content(content).map_err(invalid)?;

        let todo = self
            .store
            .update_content(id, owner, content.as_str())
            .await
            .map_err(|e| store_failure(e, "Failed to update todo"))?
            .ok_or_else(|| not_found(owner, id))?;

        tracing::info!(owner_id = %owner, todo_id = %id, "Todo updated");
        self.views.invalidate(owner, DASHBOARD_VIEW).await;

        Ok(todo)
    }

    /// Deletes one of the caller's todos
    pub async fn delete(&self, session: Option<&AuthContext>, id: &str) -> CommandResult<()> {
        let owner = caller(session)?;
        let id = parse_id(id).map_err(invalid)?;

        let deleted = self
            .store
            .delete(id, owner)
            .await
            .map_err(|e| store_failure(e, "Failed to delete todo"))?;

        if !deleted {
            return Err(not_found(owner, id));
        }

        tracing::info!(owner_id = %owner, todo_id = %id, "Todo deleted");
        self.views.invalidate(owner, DASHBOARD_VIEW).await;

        Ok(())
    }
}

fn caller(session: Option<&AuthContext>) -> CommandResult<&str> {
    session
        .map(|auth| auth.user_id.as_str())
        .ok_or(CommandError::Unauthorized)
}

fn invalid(message: &'static str) -> CommandError {
    CommandError::InvalidInput(message.to_string())
}

fn not_found(owner: &str, id: uuid::Uuid) -> CommandError {
    tracing::debug!(owner_id = %owner, todo_id = %id, "Todo not found or not owned by caller");
    CommandError::NotFound
}

fn store_failure(err: StoreError, message: &str) -> CommandError {
    tracing::error!(error = %err, "{}", message);
    CommandError::StoreFailure(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryTodoStore;
    use crate::views::NoopInvalidator;
    use async_trait::async_trait;
    use tokio::sync::Mutex;
    use uuid::Uuid;

    /// Records every invalidation signal
    #[derive(Default)]
    struct RecordingInvalidator {
        calls: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl ViewInvalidator for RecordingInvalidator {
        async fn invalidate(&self, owner_id: &str, view: &str) {
            self.calls
                .lock()
                .await
                .push((owner_id.to_string(), view.to_string()));
        }
    }

    fn setup() -> (TodoCommands, Arc<MemoryTodoStore>, Arc<RecordingInvalidator>) {
        let store = Arc::new(MemoryTodoStore::new());
        let views = Arc::new(RecordingInvalidator::default());
        let commands = TodoCommands::new(store.clone(), views.clone());
        (commands, store, views)
    }

    fn alice() -> AuthContext {
        AuthContext::new("user_alice")
    }

    fn bob() -> AuthContext {
        AuthContext::new("user_bob")
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let (commands, store, _) = setup();

        let created = commands
            .create(Some(&alice()), Some("Buy milk".to_string()))
            .await
            .unwrap();
        let fetched = commands
            .get(Some(&alice()), &created.id.to_string())
            .await
            .unwrap();

        assert_eq!(fetched.content, "Buy milk");
        assert_eq!(fetched.owner_id, "user_alice");
        assert_eq!(fetched, created);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_no_session_is_unauthorized_everywhere() {
        let (commands, store, views) = setup();
        let existing = commands
            .create(Some(&alice()), Some("keep".to_string()))
            .await
            .unwrap();
        views.calls.lock().await.clear();
        let id = existing.id.to_string();

        assert_eq!(commands.list(None).await, Err(CommandError::Unauthorized));
        assert_eq!(
            commands.create(None, Some("x".to_string())).await,
            Err(CommandError::Unauthorized)
        );
        assert_eq!(commands.get(None, &id).await, Err(CommandError::Unauthorized));
        assert_eq!(
            commands.update(None, &id, Some("y".to_string())).await,
            Err(CommandError::Unauthorized)
        );
        assert_eq!(commands.delete(None, &id).await, Err(CommandError::Unauthorized));

        // Identity is checked before the input
        assert_eq!(commands.get(None, "garbage").await, Err(CommandError::Unauthorized));
        assert_eq!(commands.create(None, None).await, Err(CommandError::Unauthorized));

        assert_eq!(store.len().await, 1);
        let unchanged = commands.get(Some(&alice()), &id).await.unwrap();
        assert_eq!(unchanged.content, "keep");
        assert!(views.calls.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_content_rejected() {
        let (commands, _, views) = setup();
        let todo = commands
            .create(Some(&alice()), Some("original".to_string()))
            .await
            .unwrap();
        views.calls.lock().await.clear();

        for bad in [None, Some(String::new()), Some("   ".to_string())] {
            assert_eq!(
                commands.create(Some(&alice()), bad.clone()).await,
                Err(CommandError::InvalidInput("content required".to_string()))
            );
            assert_eq!(
                commands
                    .update(Some(&alice()), &todo.id.to_string(), bad)
                    .await,
                Err(CommandError::InvalidInput("content required".to_string()))
            );
        }

        let todos = commands.list(Some(&alice())).await.unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].content, "original");
        assert!(views.calls.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_id_rejected_before_store() {
        let (commands, _, _) = setup();
        let malformed = Err(CommandError::InvalidInput("malformed id".to_string()));

        assert_eq!(
            commands.get(Some(&alice()), "123").await.map(|_| ()),
            malformed
        );
        assert_eq!(
            commands
                .update(Some(&alice()), "123", Some("x".to_string()))
                .await
                .map(|_| ()),
            malformed
        );
        assert_eq!(commands.delete(Some(&alice()), "123").await, malformed);
    }

    #[tokio::test]
    async fn test_owner_isolation() {
        let (commands, _, _) = setup();
        let todo = commands
            .create(Some(&alice()), Some("alice's".to_string()))
            .await
            .unwrap();
        let id = todo.id.to_string();

        assert!(commands.list(Some(&bob())).await.unwrap().is_empty());
        assert_eq!(
            commands.get(Some(&bob()), &id).await,
            Err(CommandError::NotFound)
        );
        assert_eq!(
            commands
                .update(Some(&bob()), &id, Some("bob's now".to_string()))
                .await,
            Err(CommandError::NotFound)
        );
        assert_eq!(
            commands.delete(Some(&bob()), &id).await,
            Err(CommandError::NotFound)
        );

        let still_alice = commands.get(Some(&alice()), &id).await.unwrap();
        assert_eq!(still_alice.content, "alice's");
        assert_eq!(commands.list(Some(&alice())).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let (commands, _, _) = setup();
        let todo = commands
            .create(Some(&alice()), Some("short-lived".to_string()))
            .await
            .unwrap();
        let id = todo.id.to_string();

        assert_eq!(commands.delete(Some(&alice()), &id).await, Ok(()));
        assert_eq!(
            commands.delete(Some(&alice()), &id).await,
            Err(CommandError::NotFound)
        );
        assert_eq!(
            commands
                .delete(Some(&alice()), &Uuid::new_v4().to_string())
                .await,
            Err(CommandError::NotFound)
        );
        assert_eq!(
            commands.get(Some(&alice()), &id).await,
            Err(CommandError::NotFound)
        );
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let (commands, _, _) = setup();
        let mut created = Vec::new();
        for content in ["t1", "t2", "t3"] {
            created.push(
                commands
                    .create(Some(&alice()), Some(content.to_string()))
                    .await
                    .unwrap(),
            );
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        let contents: Vec<String> = commands
            .list(Some(&alice()))
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.content)
            .collect();
        assert_eq!(contents, vec!["t3", "t2", "t1"]);
    }

    #[tokio::test]
    async fn test_update_round_trip() {
        let (commands, _, _) = setup();
        let created = commands
            .create(Some(&alice()), Some("a".to_string()))
            .await
            .unwrap();
        let id = created.id.to_string();

        let updated = commands
            .update(Some(&alice()), &id, Some("b".to_string()))
            .await
            .unwrap();
        let fetched = commands.get(Some(&alice()), &id).await.unwrap();

        assert_eq!(updated, fetched);
        assert_eq!(fetched.content, "b");
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_mutations_invalidate_dashboard() {
        let (commands, _, views) = setup();

        let todo = commands
            .create(Some(&alice()), Some("a".to_string()))
            .await
            .unwrap();
        let id = todo.id.to_string();
        commands
            .update(Some(&alice()), &id, Some("b".to_string()))
            .await
            .unwrap();
        commands.list(Some(&alice())).await.unwrap();
        commands.get(Some(&alice()), &id).await.unwrap();
        commands.delete(Some(&alice()), &id).await.unwrap();

        let calls = views.calls.lock().await.clone();
        let expected = ("user_alice".to_string(), DASHBOARD_VIEW.to_string());
        assert_eq!(calls, vec![expected.clone(), expected.clone(), expected]);
    }

    #[tokio::test]
    async fn test_failed_mutation_does_not_invalidate() {
        let (commands, _, views) = setup();

        let _ = commands
            .delete(Some(&alice()), &Uuid::new_v4().to_string())
            .await;
        let _ = commands
            .update(Some(&alice()), &Uuid::new_v4().to_string(), Some("x".to_string()))
            .await;

        assert!(views.calls.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_deletes_one_wins() {
        let (commands, store, views) = setup();
        let owner = alice();
        let todo = commands
            .create(Some(&owner), Some("once".to_string()))
            .await
            .unwrap();
        let id = todo.id.to_string();

        let (first, second) = tokio::join!(
            commands.delete(Some(&owner), &id),
            commands.delete(Some(&owner), &id),
        );

        let outcomes = [first, second];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(outcomes.contains(&Err(CommandError::NotFound)));
        assert!(store.is_empty().await);
        // create + the one successful delete
        assert_eq!(views.calls.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_updates_last_write_wins() {
        let (commands, _, _) = setup();
        let owner = alice();
        let todo = commands
            .create(Some(&owner), Some("start".to_string()))
            .await
            .unwrap();
        let id = todo.id.to_string();

        let (left, right) = tokio::join!(
            commands.update(Some(&owner), &id, Some("left".to_string())),
            commands.update(Some(&owner), &id, Some("right".to_string())),
        );
        let left = left.unwrap();
        let right = right.unwrap();

        let stored = commands.get(Some(&owner), &id).await.unwrap();
        assert!(stored.content == "left" || stored.content == "right");
        assert!(stored == left || stored == right);
        assert_eq!(stored.created_at, todo.created_at);
        assert_eq!(commands.list(Some(&owner)).await.unwrap().len(), 1);
    }

    /// Store whose every call fails
    struct BrokenStore;

    #[async_trait]
    impl TodoStore for BrokenStore {
        fn kind(&self) -> &'static str {
            "broken"
        }

        async fn list(&self, _: &str) -> crate::store::StoreResult<Vec<Todo>> {
            Err(StoreError::Unavailable("down".to_string()))
        }

        async fn insert(&self, _: CreateTodo) -> crate::store::StoreResult<Todo> {
            Err(StoreError::Unavailable("down".to_string()))
        }

        async fn find(&self, _: Uuid, _: &str) -> crate::store::StoreResult<Option<Todo>> {
            Err(StoreError::Unavailable("down".to_string()))
        }

        async fn update_content(
            &self,
            _: Uuid,
            _: &str,
            _: &str,
        ) -> crate::store::StoreResult<Option<Todo>> {
            Err(StoreError::Unavailable("down".to_string()))
        }

        async fn delete(&self, _: Uuid, _: &str) -> crate::store::StoreResult<bool> {
            Err(StoreError::Unavailable("down".to_string()))
        }

        async fn ping(&self) -> crate::store::StoreResult<()> {
            Err(StoreError::Unavailable("down".to_string()))
        }
    }

    #[tokio::test]
    async fn test_store_errors_become_generic_failures() {
        let commands = TodoCommands::new(Arc::new(BrokenStore), Arc::new(NoopInvalidator));
        let id = Uuid::new_v4().to_string();

        assert_eq!(
            commands.list(Some(&alice())).await,
            Err(CommandError::StoreFailure("Failed to fetch todos".to_string()))
        );
        assert_eq!(
            commands.create(Some(&alice()), Some("x".to_string())).await,
            Err(CommandError::StoreFailure("Failed to create todo".to_string()))
        );
        assert_eq!(
            commands.get(Some(&alice()), &id).await,
            Err(CommandError::StoreFailure("Failed to fetch todo".to_string()))
        );
        assert_eq!(
            commands
                .update(Some(&alice()), &id, Some("x".to_string()))
                .await,
            Err(CommandError::StoreFailure("Failed to update todo".to_string()))
        );
        assert_eq!(
            commands.delete(Some(&alice()), &id).await,
            Err(CommandError::StoreFailure("Failed to delete todo".to_string()))
        );
    }
}
