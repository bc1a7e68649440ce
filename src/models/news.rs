//! News model
//!
//! A news item is stored normalized: the row carries foreign keys to its
//! author and rubric, and its tag set is materialized through the `news_tags`
//! join table. External callers exchange the flat [`NewsTransfer`] shape
//! instead, with names in place of ids; the news mapper converts between the
//! two.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Tag;

/// News entity as persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct News {
    /// Unique identifier
    pub id: i64,
    /// Headline
    pub title: String,
    /// Article body
    pub body: String,
    /// Publication timestamp
    pub date: DateTime<Utc>,
    /// Foreign key to the author
    pub author_id: i64,
    /// Foreign key to the rubric
    pub rubric_id: i64,
}

/// One news-to-tag association.
///
/// A join row has no identity of its own beyond the pair; rows are created
/// and destroyed only as a side effect of saving a news item, never directly
/// by a caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsTag {
    /// News id side of the association
    pub news_id: i64,
    /// Tag id side of the association
    pub tag_id: i64,
}

/// News aggregate: a news row together with its resolved tag set.
///
/// Produced by the mapper when converting from the transfer shape. The tags
/// are in memory only at that point; join rows are persisted by whoever
/// saves the aggregate, once the news row has an id.
#[derive(Debug, Clone)]
pub struct NewsWithTags {
    /// The news row
    pub news: News,
    /// Resolved tags, one per requested tag name
    pub tags: Vec<Tag>,
}

/// Flat news representation exchanged with external callers.
///
/// Author, rubric and tags are carried by name; the mapper resolves them
/// against the store in both directions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewsTransfer {
    /// Unique identifier (0 for a not-yet-persisted item)
    pub id: i64,
    /// Headline
    pub title: String,
    /// Article body
    pub body: String,
    /// Tag names, possibly empty
    pub tags: Vec<String>,
    /// Publication timestamp
    pub date: DateTime<Utc>,
    /// Author display name
    pub author_name: String,
    /// Rubric name
    pub rubric_name: String,
}
