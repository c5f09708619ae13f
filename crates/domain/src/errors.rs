use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("User with ID {0} not found.")]
    UserNotFound(Uuid),

    #[error("Repository error: {0}")]
    RepositoryError(String),
}
