//! Rubric model
//!
//! A rubric is the section a news item is filed under. News items reference
//! rubrics by id and are mapped to and from the rubric name at the transfer
//! boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rubric entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rubric {
    /// Unique identifier
    pub id: i64,
    /// Rubric name
    pub name: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Rubric {
    /// Create a new Rubric with the given name.
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
