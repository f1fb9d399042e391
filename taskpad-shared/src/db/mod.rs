/// Database layer for Taskpad
///
/// - `pool`: PostgreSQL connection pool with a startup health check
/// - `migrations`: embedded schema migrations
///
/// Row-level queries live in [`crate::models`]; the [`crate::store`] module
/// exposes them behind the `TodoStore` port.

pub mod migrations;
pub mod pool;
