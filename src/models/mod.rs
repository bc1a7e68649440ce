//! Data models
//!
//! This module contains all data structures used throughout the news backend.
//! Models represent:
//! - Database entities (Author, News, Rubric, Tag, and the NewsTag join row)
//! - The flat transfer shape exchanged with external callers
//! - Service input types

mod author;
mod news;
mod rubric;
mod tag;

pub use author::{Author, RegisterAuthorInput};
pub use news::{News, NewsTag, NewsTransfer, NewsWithTags};
pub use rubric::Rubric;
pub use tag::Tag;
