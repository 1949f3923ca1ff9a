//! Database plumbing for LightBnB.
//!
//! Provides the SQLite connection pool (via `r2d2`) and the embedded,
//! versioned schema migrations that create the `users`, `properties`,
//! `reservations` and `property_reviews` tables. Query code lives in
//! `lightbnb-store`; this crate only opens and prepares the database.
//!
//! The pool is an ordinary value. The process entry point builds it once with
//! [`open_database`] and hands it to whatever needs the store.

mod migrations;
mod pool;

pub use migrations::{run_migrations, MigrationError};
pub use pool::{create_pool, open_database, DbPool, DbRuntimeSettings, PoolError};
