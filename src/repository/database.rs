use std::time::Duration;

use diesel::r2d2::{self, ConnectionManager, CustomizeConnection, PoolError};
use diesel::{PgConnection, RunQueryDsl};
use dotenvy::dotenv;

type DBPool = r2d2::Pool<ConnectionManager<PgConnection>>;
type DBConnection = r2d2::PooledConnection<ConnectionManager<PgConnection>>;

const CHECKOUT_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared connection pool. Constructed once at startup and handed to every
/// repository call; tests build their own against an isolated database.
#[derive(Clone)]
pub struct Database {
    pool: DBPool,
}

impl Database {
    pub fn new() -> Result<Self, PoolError> {
        dotenv().ok();
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        Self::from_url(&database_url)
    }

    pub fn from_url(database_url: &str) -> Result<Self, PoolError> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool: DBPool = r2d2::Pool::builder()
            .connection_timeout(CHECKOUT_TIMEOUT)
            .connection_customizer(Box::new(StatementTimeout))
            .build(manager)?;
        Ok(Database { pool })
    }

    pub fn get_connection(&self) -> Result<DBConnection, PoolError> {
        self.pool.get()
    }
}

/// Bounds every statement server-side so a wedged query aborts instead of
/// holding a pooled connection for the rest of the process lifetime.
#[derive(Debug)]
struct StatementTimeout;

impl CustomizeConnection<PgConnection, diesel::r2d2::Error> for StatementTimeout {
    fn on_acquire(&self, connection: &mut PgConnection) -> Result<(), diesel::r2d2::Error> {
        diesel::sql_query("SET statement_timeout = '30s'")
            .execute(connection)
            .map(|_| ())
            .map_err(diesel::r2d2::Error::QueryError)
    }
}
