//! Services
//!
//! Business logic for the news backend. Each service runs one unit of work
//! per operation: lookups and staged writes share a transaction, and
//! mutating operations commit exactly once at the end.

pub mod auth;
pub mod author;
pub mod news;
pub mod news_mapper;
pub mod rubric;
pub mod tag;
pub mod tag_resolver;

pub use auth::{AuthService, Claims};
pub use author::AuthorService;
pub use news::NewsService;
pub use news_mapper::NewsMapper;
pub use rubric::RubricService;
pub use tag::TagService;
pub use tag_resolver::TagResolver;

/// Error types for service operations.
///
/// Every failure is a single attempt: nothing here is retried internally.
/// The boundary layer translates variants into client-visible responses.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// An id or name lookup yielded no entity
    #[error("Not found: {0}")]
    NotFound(String),

    /// A uniqueness pre-check failed (duplicate registration email)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Invalid input (blank tag name and similar)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
