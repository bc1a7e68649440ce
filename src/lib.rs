//! Newsdesk - news publishing backend core
//!
//! This library provides the persistence and business-logic core for a news
//! publishing backend: authors, rubrics, tags and news items, the unit of
//! work coordinating them into atomic saves, and bearer-token issuance for
//! authenticated authors. An HTTP layer is expected to sit on top and
//! translate [`services::ServiceError`] variants into responses.

pub mod config;
pub mod db;
pub mod models;
pub mod services;
