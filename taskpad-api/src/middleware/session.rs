/// Session resolution middleware
///
/// Runs the configured [`IdentityResolver`] once per request and stores the
/// outcome in request extensions. Handlers read it back through the
/// [`Session`] extractor, which never rejects: "no session" is a value the
/// commands decide on, so both fronts report it the same way.

use crate::app::AppState;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;
use taskpad_shared::auth::session::AuthContext;

/// Resolves the caller and inserts an [`AuthContext`] when there is one
pub async fn resolve_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Some(auth) = state.identity.resolve(req.headers()).await {
        tracing::debug!(user_id = %auth.user_id, "Session resolved");
        req.extensions_mut().insert(auth);
    }

    next.run(req).await
}

/// The caller's session, if [`resolve_session`] found one
#[derive(Debug, Clone)]
pub struct Session(pub Option<AuthContext>);

impl Session {
    /// Borrowed form the command handlers take
    pub fn auth(&self) -> Option<&AuthContext> {
        self.0.as_ref()
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Session(parts.extensions.get::<AuthContext>().cloned()))
    }
}
