/// JSON todo endpoints
///
/// Thin adapters over [`TodoCommands`](taskpad_shared::commands::TodoCommands):
/// extract the session, path and body, call one command, shape the response.
///
/// # Endpoints
///
/// ```text
/// GET    /todos       -> { "todos": [...] }
/// POST   /todos       -> { "todo": {...} }
/// GET    /todos/:id   -> { "todo": {...} }
/// PUT    /todos/:id   -> { "todo": {...} }
/// DELETE /todos/:id   -> { "success": true }
/// ```
///
/// Failures use the [`ApiError`](crate::error::ApiError) envelope.

use crate::{app::AppState, error::ApiResult, middleware::session::Session};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use taskpad_shared::models::todo::Todo;

/// Request body for create and update
#[derive(Debug, Default, Deserialize)]
pub struct TodoBody {
    pub content: Option<String>,
}

/// `{ "todos": [...] }`
#[derive(Debug, Serialize, Deserialize)]
pub struct TodoListResponse {
    pub todos: Vec<Todo>,
}

/// `{ "todo": {...} }`
#[derive(Debug, Serialize, Deserialize)]
pub struct TodoResponse {
    pub todo: Todo,
}

/// `{ "success": true }`
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Content from a JSON body; an unreadable body counts as no content
fn body_content(body: Result<Json<TodoBody>, JsonRejection>) -> Option<String> {
    match body {
        Ok(Json(body)) => body.content,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable todo body");
            None
        }
    }
}

/// List the caller's todos, newest first
pub async fn list_todos(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<TodoListResponse>> {
    let todos = state.commands.list(session.auth()).await?;
    Ok(Json(TodoListResponse { todos }))
}

/// Create a todo
pub async fn create_todo(
    State(state): State<AppState>,
    session: Session,
    body: Result<Json<TodoBody>, JsonRejection>,
) -> ApiResult<Json<TodoResponse>> {
    let todo = state.commands.create(session.auth(), body_content(body)).await?;
    Ok(Json(TodoResponse { todo }))
}

/// Get one todo
pub async fn get_todo(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> ApiResult<Json<TodoResponse>> {
    let todo = state.commands.get(session.auth(), &id).await?;
    Ok(Json(TodoResponse { todo }))
}

/// Replace a todo's content
pub async fn update_todo(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    body: Result<Json<TodoBody>, JsonRejection>,
) -> ApiResult<Json<TodoResponse>> {
    let todo = state
        .commands
        .update(session.auth(), &id, body_content(body))
        .await?;
    Ok(Json(TodoResponse { todo }))
}

/// Delete a todo
pub async fn delete_todo(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    state.commands.delete(session.auth(), &id).await?;
    Ok(Json(DeleteResponse { success: true }))
}
