use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::info;

use crate::error::{TodoError, TodoResult};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const MEMORY_URL: &str = ":memory:";
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

#[derive(Debug)]
struct ConnectionOptions {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {};",
            self.busy_timeout.as_millis()
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Builds the connection pool for `database_url`.
///
/// Every `:memory:` connection is its own database, so an in-memory pool is
/// pinned to a single connection that is never recycled.
pub fn establish_pool(database_url: &str, max_size: u32) -> TodoResult<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let builder = Pool::builder().connection_customizer(Box::new(ConnectionOptions {
        busy_timeout: BUSY_TIMEOUT,
    }));

    let builder = if database_url == MEMORY_URL {
        builder.max_size(1).max_lifetime(None).idle_timeout(None)
    } else {
        builder.max_size(max_size)
    };

    Ok(builder.build(manager)?)
}

pub fn run_migrations(pool: &DbPool) -> TodoResult<()> {
    let mut conn = pool.get()?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| TodoError::Migration(e.to_string()))?;
    for version in &applied {
        info!("applied migration {}", version);
    }
    Ok(())
}

/// Fresh in-memory pool with the schema applied.
pub fn memory_pool() -> TodoResult<DbPool> {
    let pool = establish_pool(MEMORY_URL, 1)?;
    run_migrations(&pool)?;
    Ok(pool)
}
