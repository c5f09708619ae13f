use async_trait::async_trait;
use domain::{DomainError, User, UserRepository};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, RwLock};
use uuid::Uuid;

#[derive(Debug)]
enum PendingOp {
    Add(User),
    Update(User),
    Remove(User),
}

/// In-memory store, fresh and isolated per instance. Swappable for the
/// SQLite repository without changing service logic; the test suites run
/// against it.
#[derive(Default)]
pub struct MemoryUserRepository {
    committed: RwLock<HashMap<Uuid, User>>,
    pending: Mutex<Vec<PendingOp>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn pending(&self) -> Result<MutexGuard<'_, Vec<PendingOp>>, DomainError> {
        self.pending
            .lock()
            .map_err(|_| DomainError::RepositoryError("staging buffer lock poisoned".to_string()))
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn add(&self, user: User) -> Result<(), DomainError> {
        self.pending()?.push(PendingOp::Add(user));
        Ok(())
    }

    async fn update(&self, user: User) -> Result<(), DomainError> {
        self.pending()?.push(PendingOp::Update(user));
        Ok(())
    }

    async fn remove(&self, user: User) -> Result<(), DomainError> {
        self.pending()?.push(PendingOp::Remove(user));
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        let committed = self
            .committed
            .read()
            .map_err(|_| DomainError::RepositoryError("store lock poisoned".to_string()))?;
        Ok(committed.values().cloned().collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let committed = self
            .committed
            .read()
            .map_err(|_| DomainError::RepositoryError("store lock poisoned".to_string()))?;
        Ok(committed.get(&id).cloned())
    }

    async fn save(&self) -> Result<usize, DomainError> {
        // Drain first so tracking state is gone even if an operation fails.
        let ops = std::mem::take(&mut *self.pending()?);

        let mut committed = self
            .committed
            .write()
            .map_err(|_| DomainError::RepositoryError("store lock poisoned".to_string()))?;
        let mut affected = 0;

        for op in ops {
            match op {
                PendingOp::Add(user) => {
                    // Mirror the unique-constraint behavior of the durable store.
                    if committed.contains_key(&user.id) {
                        return Err(DomainError::RepositoryError(format!(
                            "UNIQUE constraint failed: users.id ({})",
                            user.id
                        )));
                    }
                    committed.insert(user.id, user);
                    affected += 1;
                }
                PendingOp::Update(user) => {
                    if let Some(existing) = committed.get_mut(&user.id) {
                        *existing = user;
                        affected += 1;
                    }
                }
                PendingOp::Remove(user) => {
                    if committed.remove(&user.id).is_some() {
                        affected += 1;
                    }
                }
            }
        }

        Ok(affected)
    }
}
