use crate::entities::User;
use crate::errors::DomainError;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository trait - defines what we need from the persistence layer.
/// This is a PORT in hexagonal architecture.
///
/// Mutations are staged and become durable only on `save`; queries always
/// read committed state, never the staged operations.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stage an insert of a new record.
    async fn add(&self, user: User) -> Result<(), DomainError>;

    /// Stage a full-record replace of an existing record.
    async fn update(&self, user: User) -> Result<(), DomainError>;

    /// Stage removal of a record.
    async fn remove(&self, user: User) -> Result<(), DomainError>;

    /// All committed records, no order guarantee.
    async fn find_all(&self) -> Result<Vec<User>, DomainError>;

    /// The committed record with this id, if any.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Commit all staged operations, returning the number of affected rows.
    /// The staging buffer is cleared whether or not the commit succeeds.
    async fn save(&self) -> Result<usize, DomainError>;
}
