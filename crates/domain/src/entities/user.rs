use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Core User entity - represents the business domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl User {
    /// The id is assigned by the caller, never by the store.
    pub fn new(id: Uuid, name: String, email: String) -> Self {
        Self { id, name, email }
    }
}
