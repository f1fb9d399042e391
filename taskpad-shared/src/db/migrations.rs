/// Embedded database migrations
///
/// Migrations live in `taskpad-shared/migrations/` and are compiled into the
/// binary with `sqlx::migrate!`, so a deployed server can bring its schema
/// up to date on startup without shipping SQL files.
///
/// # Example
///
/// ```no_run
/// use taskpad_shared::db::pool::{create_pool, DatabaseConfig};
/// use taskpad_shared::db::migrations::run_migrations;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::{migrate::Migrator, postgres::PgPool};
use tracing::{info, warn};

/// Migrations compiled into the binary
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Runs all pending migrations
///
/// # Errors
///
/// Returns an error if a migration fails to apply or a previously applied
/// migration was modified.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!(
        available = MIGRATOR.iter().count(),
        "Starting database migrations"
    );

    match MIGRATOR.run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}
