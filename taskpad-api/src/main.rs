//! # Taskpad API Server
//!
//! Serves the JSON todo API, the form-action routes and the cached
//! dashboard view for authenticated users.
//!
//! ## Usage
//!
//! ```bash
//! TODO_STORE=memory SESSION_SECRET=... cargo run -p taskpad-api
//! ```

use std::sync::Arc;
use taskpad_api::{
    app::{build_router, AppState},
    config::{Config, LogFormat, StoreBackend},
};
use taskpad_shared::{
    db::{
        migrations::run_migrations,
        pool::{close_pool, create_pool, DatabaseConfig},
    },
    store::{MemoryTodoStore, PgTodoStore, TodoStore},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    init_tracing(config.log_format);

    tracing::info!(
        "Taskpad API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let mut pool = None;
    let store: Arc<dyn TodoStore> = match config.store.backend {
        StoreBackend::Postgres => {
            let url = config
                .store
                .database_url
                .clone()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is required for the postgres store"))?;

            let db = create_pool(DatabaseConfig {
                url,
                max_connections: config.store.max_connections,
                ..DatabaseConfig::default()
            })
            .await?;

            run_migrations(&db).await?;
            pool = Some(db.clone());

            Arc::new(PgTodoStore::new(db))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; todos are lost on restart");
            Arc::new(MemoryTodoStore::new())
        }
    };

    let address = config.bind_address();
    let app = build_router(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(db) = pool {
        close_pool(db).await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "taskpad_api=debug,taskpad_shared=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections...");
}
