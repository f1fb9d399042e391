/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskpad_api::{app::AppState, config::Config};
/// use taskpad_shared::store::MemoryTodoStore;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(Arc::new(MemoryTodoStore::new()), config);
/// let app = taskpad_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{security::SecurityHeadersLayer, session::resolve_session},
};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use taskpad_shared::{
    auth::session::{IdentityResolver, JwtIdentityResolver},
    commands::TodoCommands,
    store::TodoStore,
    views::DashboardCache,
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Todo store shared by both fronts
    pub store: Arc<dyn TodoStore>,

    /// Cached dashboard views, invalidated by every successful mutation
    pub dashboard: Arc<DashboardCache>,

    /// Maps request credentials to a caller
    pub identity: Arc<dyn IdentityResolver>,

    /// Commands shared by the JSON and form fronts
    pub commands: TodoCommands,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates application state with the session resolver built from `config`
    pub fn new(store: Arc<dyn TodoStore>, config: Config) -> Self {
        let identity = JwtIdentityResolver::new(
            config.session.secret.clone(),
            config.session.issuer.clone(),
        )
        .with_cookie_name(config.session.cookie_name.clone());

        Self::with_identity(store, Arc::new(identity), config)
    }

    /// Creates application state with a caller-supplied identity resolver
    pub fn with_identity(
        store: Arc<dyn TodoStore>,
        identity: Arc<dyn IdentityResolver>,
        config: Config,
    ) -> Self {
        let dashboard = Arc::new(DashboardCache::new());

        Self {
            commands: TodoCommands::new(store.clone(), dashboard.clone()),
            store,
            dashboard,
            identity,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                     # Health check (public)
/// ├── /todos                      # JSON front (session)
/// │   ├── GET    /
/// │   ├── POST   /
/// │   ├── GET    /:id
/// │   ├── PUT    /:id
/// │   └── DELETE /:id
/// ├── /actions/todos              # Form front (session)
/// │   ├── GET    /
/// │   ├── POST   /create
/// │   ├── POST   /update
/// │   └── POST   /delete
/// └── /dashboard                  # Cached dashboard view (session)
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Session resolution (everything except `/health`)
/// 2. Logging (tower-http TraceLayer)
/// 3. CORS (tower-http CorsLayer)
/// 4. Response compression
/// 5. Security headers
pub fn build_router(state: AppState) -> Router {
    use crate::{actions, routes};

    // Health check (public, no session)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let todo_routes = Router::new()
        .route(
            "/",
            get(routes::todos::list_todos).post(routes::todos::create_todo),
        )
        .route(
            "/:id",
            get(routes::todos::get_todo)
                .put(routes::todos::update_todo)
                .delete(routes::todos::delete_todo),
        );

    let action_routes = Router::new()
        .route("/", get(actions::list_action))
        .route("/create", post(actions::create_action))
        .route("/update", post(actions::update_action))
        .route("/delete", post(actions::delete_action));

    let session_routes = Router::new()
        .nest("/todos", todo_routes)
        .nest("/actions/todos", action_routes)
        .route("/dashboard", get(routes::dashboard::dashboard))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            resolve_session,
        ));

    // Configure CORS based on environment
    let cors = if state.config.cors_permissive() {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    let production = state.config.api.production;

    Router::new()
        .merge(health_routes)
        .merge(session_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(SecurityHeadersLayer::new(production))
        .with_state(state)
}
