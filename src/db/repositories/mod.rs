//! Repositories
//!
//! Data access for the news backend. Each entity gets a repository trait
//! plus a SQLx implementation bound to a unit of work's open transaction:
//! every read sees the transaction's staged writes, and nothing reaches the
//! store until the unit of work commits.

mod author;
mod news;
mod news_tag;
mod rubric;
mod tag;

pub use author::{AuthorRepository, SqlxAuthorRepository};
pub use news::{NewsRepository, SqlxNewsRepository};
pub use news_tag::{NewsTagRepository, SqlxNewsTagRepository};
pub use rubric::{RubricRepository, SqlxRubricRepository};
pub use tag::{SqlxTagRepository, TagRepository};
