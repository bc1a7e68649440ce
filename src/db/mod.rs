//! Database layer
//!
//! SQLite persistence for the news backend:
//! - connection pool creation (`pool`)
//! - embedded code-based migrations (`migrations`)
//! - entity repositories (`repositories`)
//! - the per-request unit of work tying them into one transaction
//!   (`unit_of_work`)

pub mod migrations;
pub mod pool;
pub mod repositories;
pub mod unit_of_work;

pub use pool::{create_pool, create_test_pool};
pub use unit_of_work::UnitOfWork;
