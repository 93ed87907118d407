use std::time::Duration;

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::config::DatabaseSettings;
use crate::error::PersistenceError;

pub type PgPool = Pool<ConnectionManager<PgConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub fn build_pool(settings: &DatabaseSettings) -> Result<PgPool, PersistenceError> {
    let manager = ConnectionManager::<PgConnection>::new(settings.url.as_str());
    let pool = Pool::builder()
        .max_size(settings.pool_size)
        .connection_timeout(Duration::from_secs(settings.timeout_seconds))
        .build(manager)?;
    Ok(pool)
}

/// Applies every embedded migration the database has not seen yet.
pub fn run_migrations(pool: &PgPool) -> Result<usize, PersistenceError> {
    let mut conn = pool.get()?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| PersistenceError::Migration(err.to_string()))?;
    for version in &applied {
        tracing::info!(%version, "applied migration");
    }
    Ok(applied.len())
}
