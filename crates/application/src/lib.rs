use domain::{UserRepository, UserService};
use infrastructure::{Database, MemoryUserRepository, SqliteUserRepository};
use std::sync::Arc;

/// User Application - composition root wiring a store into the service.
pub struct UserApp {
    pub user_service: UserService,
}

impl UserApp {
    /// Durable SQLite backend.
    pub fn new(database_path: &str) -> Self {
        let database = Database::new(database_path);
        let pool = database.get_pool().clone();

        let repository: Arc<dyn UserRepository> = Arc::new(SqliteUserRepository::new(pool));
        Self::with_repository(repository)
    }

    /// Fresh, isolated in-memory backend. Used by the test suites.
    pub fn in_memory() -> Self {
        Self::with_repository(Arc::new(MemoryUserRepository::new()))
    }

    pub fn with_repository(repository: Arc<dyn UserRepository>) -> Self {
        Self {
            user_service: UserService::new(repository),
        }
    }
}
