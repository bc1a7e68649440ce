//! Tag model
//!
//! Tags are free-form labels shared across news items. The tag name is the
//! natural key: resolution by name either finds the existing row or creates
//! a new one, never both.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tag entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    /// Unique identifier
    pub id: i64,
    /// Tag name, unique among all tags
    pub name: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Tag {
    /// Create a new Tag with the given name.
    ///
    /// The ID will be set to 0 and should be assigned by the database.
    pub fn new(name: String) -> Self {
        Self {
            id: 0, // Will be set by the database
            name,
            created_at: Utc::now(),
        }
    }
}
