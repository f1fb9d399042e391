/// Dashboard view endpoint
///
/// Serves the caller's todo list from the [`DashboardCache`] when fresh and
/// renders (then caches) it otherwise. Mutations from either front
/// invalidate the cached entry, so the next request re-renders.
///
/// [`DashboardCache`]: taskpad_shared::views::DashboardCache
///
/// # Endpoint
///
/// ```text
/// GET /dashboard -> { "todos": [...], "renderedAt": "..." }
/// ```

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::session::Session,
};
use axum::{extract::State, Json};
use chrono::Utc;
use taskpad_shared::views::DashboardView;

/// Dashboard handler
pub async fn dashboard(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<DashboardView>> {
    let owner = session
        .auth()
        .map(|auth| auth.user_id.clone())
        .ok_or_else(|| ApiError::Unauthorized("Unauthorized".to_string()))?;

    if let Some(view) = state.dashboard.get(&owner).await {
        tracing::debug!(owner_id = %owner, "Dashboard cache hit");
        return Ok(Json(view));
    }

    let generation = state.dashboard.begin_render().await;
    let todos = state.commands.list(session.auth()).await?;
    let view = DashboardView {
        todos,
        rendered_at: Utc::now(),
    };

    state.dashboard.store(&owner, generation, view.clone()).await;

    Ok(Json(view))
}
