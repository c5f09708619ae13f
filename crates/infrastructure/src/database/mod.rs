use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};

pub mod schema;
pub use schema::*;

pub type SqlitePool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub fn new(database_path: &str) -> Self {
        let manager = ConnectionManager::<SqliteConnection>::new(database_path);
        let pool = r2d2::Pool::builder()
            .build(manager)
            .expect("Failed to create SQLite connection pool");

        run_migrations(&pool).expect("Failed to run database migrations");

        Database { pool }
    }

    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Create the users table if it does not exist yet.
pub fn run_migrations(pool: &SqlitePool) -> Result<(), diesel::result::Error> {
    let mut conn = pool.get().expect("Failed to get SQLite connection");
    diesel::sql_query(
        "CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            email TEXT NOT NULL
        )",
    )
    .execute(&mut conn)?;
    Ok(())
}
