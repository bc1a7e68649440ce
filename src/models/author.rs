//! Author model
//!
//! Authors write news items and authenticate against the backend. The email
//! address is the registration key: the author service rejects a second
//! registration with an email that is already taken.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Author {
    /// Unique identifier
    pub id: i64,
    /// Display name, used to resolve news references
    pub name: String,
    /// Email address, unique per registered author
    pub email: String,
    /// Stored credential, treated as an opaque string
    #[serde(skip_serializing)]
    pub password: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Author {
    /// Create a new Author.
    ///
    /// The ID will be set to 0 and should be assigned by the database.
    pub fn new(name: String, email: String, password: String) -> Self {
        Self {
            id: 0, // Will be set by the database
            name,
            email,
            password,
            created_at: Utc::now(),
        }
    }
}

/// Input for registering a new author
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterAuthorInput {
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Credential to store
    pub password: String,
}
