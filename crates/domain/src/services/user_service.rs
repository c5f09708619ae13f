use crate::entities::User;
use crate::errors::DomainError;
use crate::repositories::UserRepository;
use std::sync::Arc;
use uuid::Uuid;

/// User Service - contains the business logic for user management.
/// This is the APPLICATION LAYER in clean architecture.
pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Get all users. Empty vec when the store is empty.
    pub async fn get_all_users(&self) -> Result<Vec<User>, DomainError> {
        self.repository.find_all().await
    }

    /// Get a user by their unique identifier.
    pub async fn get_user_by_id(&self, id: Uuid) -> Result<User, DomainError> {
        match self.repository.find_by_id(id).await? {
            Some(user) => Ok(user),
            None => Err(DomainError::UserNotFound(id)),
        }
    }

    /// Create a new user. Returns the number of rows committed (1 on success).
    ///
    /// No duplicate-id precheck is performed; a colliding id surfaces as the
    /// store's constraint failure.
    pub async fn create_user(&self, user: Option<User>) -> Result<usize, DomainError> {
        let user = Self::require_payload(user)?;

        self.repository.add(user).await?;
        self.repository.save().await
    }

    /// Fully replace an existing user's fields. Returns rows committed.
    pub async fn update_user(&self, user: Option<User>) -> Result<usize, DomainError> {
        let user = Self::require_payload(user)?;

        if self.repository.find_by_id(user.id).await?.is_none() {
            return Err(DomainError::UserNotFound(user.id));
        }

        self.repository.update(user).await?;
        self.repository.save().await
    }

    /// Delete a user by id. Returns rows committed.
    pub async fn delete_user(&self, id: Uuid) -> Result<usize, DomainError> {
        let user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(DomainError::UserNotFound(id))?;

        self.repository.remove(user).await?;
        self.repository.save().await
    }

    /// An absent payload, or the empty-default record with a nil id, is
    /// rejected before any store access.
    fn require_payload(user: Option<User>) -> Result<User, DomainError> {
        match user {
            Some(user) if !user.id.is_nil() => Ok(user),
            Some(_) => Err(DomainError::InvalidArgument(
                "user id must be a non-nil UUID".to_string(),
            )),
            None => Err(DomainError::InvalidArgument(
                "user payload is required".to_string(),
            )),
        }
    }
}
