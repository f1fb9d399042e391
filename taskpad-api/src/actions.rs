/// Server-rendered-form front
///
/// The same commands as the JSON front, reported through a single
/// `{ success, todo?, todos?, error? }` envelope instead of HTTP statuses,
/// and wired to the [`DashboardCache`](taskpad_shared::views::DashboardCache)
/// so every successful mutation evicts the caller's cached dashboard.
///
/// The functions are callable in-process by a page renderer, and are also
/// mounted as form routes:
///
/// ```text
/// GET  /actions/todos          -> get_todos
/// POST /actions/todos/create   -> create_todo   (content)
/// POST /actions/todos/update   -> update_todo   (id, content)
/// POST /actions/todos/delete   -> delete_todo   (id)
/// ```

use crate::{app::AppState, middleware::session::Session};
use axum::{
    extract::{rejection::FormRejection, State},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use taskpad_shared::{
    auth::session::AuthContext,
    commands::{CommandError, CommandResult, TodoCommands},
    models::todo::Todo,
};

/// Submitted form fields
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodoForm {
    pub id: Option<String>,
    pub content: Option<String>,
}

/// Outcome of a form action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub todo: Option<Todo>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub todos: Option<Vec<Todo>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionResponse {
    fn ok() -> Self {
        Self {
            success: true,
            todo: None,
            todos: None,
            error: None,
        }
    }

    fn failed(err: CommandError) -> Self {
        Self {
            success: false,
            todo: None,
            todos: None,
            error: Some(err.to_string()),
        }
    }

    fn from_result<T>(result: CommandResult<T>, fill: impl FnOnce(&mut Self, T)) -> Self {
        match result {
            Ok(value) => {
                let mut response = Self::ok();
                fill(&mut response, value);
                response
            }
            Err(err) => Self::failed(err),
        }
    }
}

/// Lists the caller's todos
pub async fn get_todos(commands: &TodoCommands, session: Option<&AuthContext>) -> ActionResponse {
    ActionResponse::from_result(commands.list(session).await, |r, todos| {
        r.todos = Some(todos)
    })
}

/// Creates a todo from the `content` field
pub async fn create_todo(
    commands: &TodoCommands,
    session: Option<&AuthContext>,
    form: TodoForm,
) -> ActionResponse {
    ActionResponse::from_result(commands.create(session, form.content).await, |r, todo| {
        r.todo = Some(todo)
    })
}

/// Replaces the content of the todo named by the `id` field
pub async fn update_todo(
    commands: &TodoCommands,
    session: Option<&AuthContext>,
    form: TodoForm,
) -> ActionResponse {
    let id = form.id.unwrap_or_default();
    ActionResponse::from_result(
        commands.update(session, &id, form.content).await,
        |r, todo| r.todo = Some(todo),
    )
}

/// Deletes the todo named by the `id` field
pub async fn delete_todo(
    commands: &TodoCommands,
    session: Option<&AuthContext>,
    form: TodoForm,
) -> ActionResponse {
    let id = form.id.unwrap_or_default();
    ActionResponse::from_result(commands.delete(session, &id).await, |_, ()| {})
}

/// Form fields, or none if the body could not be read
fn form_fields(form: Result<Form<TodoForm>, FormRejection>) -> TodoForm {
    match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable form body");
            TodoForm::default()
        }
    }
}

/// `GET /actions/todos`
pub async fn list_action(State(state): State<AppState>, session: Session) -> Json<ActionResponse> {
    Json(get_todos(&state.commands, session.auth()).await)
}

/// `POST /actions/todos/create`
pub async fn create_action(
    State(state): State<AppState>,
    session: Session,
    form: Result<Form<TodoForm>, FormRejection>,
) -> Json<ActionResponse> {
    Json(create_todo(&state.commands, session.auth(), form_fields(form)).await)
}

/// `POST /actions/todos/update`
pub async fn update_action(
    State(state): State<AppState>,
    session: Session,
    form: Result<Form<TodoForm>, FormRejection>,
) -> Json<ActionResponse> {
    Json(update_todo(&state.commands, session.auth(), form_fields(form)).await)
}

/// `POST /actions/todos/delete`
pub async fn delete_action(
    State(state): State<AppState>,
    session: Session,
    form: Result<Form<TodoForm>, FormRejection>,
) -> Json<ActionResponse> {
    Json(delete_todo(&state.commands, session.auth(), form_fields(form)).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use taskpad_shared::{
        store::MemoryTodoStore,
        views::{DashboardCache, DashboardView},
    };

    struct Fixture {
        commands: TodoCommands,
        cache: Arc<DashboardCache>,
    }

    fn fixture() -> Fixture {
        let cache = Arc::new(DashboardCache::new());
        Fixture {
            commands: TodoCommands::new(Arc::new(MemoryTodoStore::new()), cache.clone()),
            cache,
        }
    }

    async fn warm(cache: &DashboardCache, owner: &str) {
        let generation = cache.begin_render().await;
        let view = DashboardView {
            todos: Vec::new(),
            rendered_at: chrono::Utc::now(),
        };
        assert!(cache.store(owner, generation, view).await);
    }

    fn content(text: &str) -> TodoForm {
        TodoForm {
            id: None,
            content: Some(text.to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let f = fixture();
        let alice = AuthContext::new("alice");

        let created = create_todo(&f.commands, Some(&alice), content("buy milk")).await;
        assert!(created.success);
        assert_eq!(created.todo.as_ref().unwrap().content, "buy milk");

        let listed = get_todos(&f.commands, Some(&alice)).await;
        assert!(listed.success);
        assert_eq!(listed.todos.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_mutation_evicts_dashboard() {
        let f = fixture();
        let alice = AuthContext::new("alice");

        warm(&f.cache, "alice").await;
        let created = create_todo(&f.commands, Some(&alice), content("a")).await;
        assert!(f.cache.get("alice").await.is_none());

        let id = created.todo.unwrap().id.to_string();

        warm(&f.cache, "alice").await;
        let form = TodoForm {
            id: Some(id.clone()),
            content: Some("b".to_string()),
        };
        assert!(update_todo(&f.commands, Some(&alice), form).await.success);
        assert!(f.cache.get("alice").await.is_none());

        warm(&f.cache, "alice").await;
        let form = TodoForm {
            id: Some(id),
            content: None,
        };
        assert!(delete_todo(&f.commands, Some(&alice), form).await.success);
        assert!(f.cache.get("alice").await.is_none());
    }

    #[tokio::test]
    async fn test_failure_keeps_dashboard() {
        let f = fixture();
        let alice = AuthContext::new("alice");

        warm(&f.cache, "alice").await;

        let blank = create_todo(&f.commands, Some(&alice), content("   ")).await;
        assert!(!blank.success);
        assert_eq!(blank.error.as_deref(), Some("content required"));

        let missing = delete_todo(&f.commands, Some(&alice), TodoForm::default()).await;
        assert!(!missing.success);
        assert_eq!(missing.error.as_deref(), Some("malformed id"));

        assert!(f.cache.get("alice").await.is_some());
    }

    #[tokio::test]
    async fn test_no_session_is_unauthorized() {
        let f = fixture();

        let response = create_todo(&f.commands, None, content("x")).await;
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("Unauthorized"));

        let response = get_todos(&f.commands, None).await;
        assert_eq!(response.error.as_deref(), Some("Unauthorized"));
        assert!(response.todos.is_none());
    }

    #[tokio::test]
    async fn test_other_owner_not_found() {
        let f = fixture();
        let alice = AuthContext::new("alice");
        let bob = AuthContext::new("bob");

        let todo = create_todo(&f.commands, Some(&alice), content("private"))
            .await
            .todo
            .unwrap();

        let form = TodoForm {
            id: Some(todo.id.to_string()),
            content: None,
        };
        let response = delete_todo(&f.commands, Some(&bob), form).await;
        assert_eq!(response.error.as_deref(), Some("Todo not found"));
    }

    #[test]
    fn test_envelope_omits_empty_fields() {
        let json = serde_json::to_value(ActionResponse::ok()).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true }));
    }
}
