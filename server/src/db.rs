use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../migrations");

pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;

pub fn create_pool(database_url: &str) -> DbPool {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = r2d2::Pool::builder()
        .build(manager)
        .expect("Failed to create database pool");

    // Run pending migrations on startup
    let mut conn = pool
        .get()
        .expect("Failed to get DB connection for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Failed to run database migrations");

    pool
}

/// Check a connection out of the pool, or return a 500 from the enclosing handler.
#[macro_export]
macro_rules! get_conn {
    ($pool:expr) => {
        match $pool.get() {
            Ok(c) => c,
            Err(e) => {
                tracing::error!("Failed to get DB connection: {}", e);
                return $crate::api::error_response(
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Database connection failed",
                );
            }
        }
    };
}

/// A pool that never connects until asked. Tests use it for routes that must
/// not touch the database.
#[cfg(test)]
pub fn lazy_pool(database_url: &str) -> DbPool {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    r2d2::Pool::builder()
        .min_idle(Some(0))
        .connection_timeout(std::time::Duration::from_millis(200))
        .build_unchecked(manager)
}

#[cfg(test)]
mod tests {
    const CREATE_RECIPES: &str =
        include_str!("../../migrations/2025-06-01-000002_create_recipes/up.sql");

    #[test]
    fn test_recipe_arrays_reject_null_elements() {
        // schema.rs maps these columns to `Array<Text>`.
        for column in ["ingredients", "steps"] {
            assert!(
                CREATE_RECIPES.contains(&format!("CHECK (array_position({column}, NULL) IS NULL)")),
                "{column} accepts NULL elements"
            );
        }
    }
}
