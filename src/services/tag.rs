//! Tag service
//!
//! Direct CRUD over tags. Name-based resolution for news mapping lives in
//! the tag resolver; this service is the administrative surface.

use anyhow::Context;
use sqlx::SqlitePool;

use crate::db::UnitOfWork;
use crate::models::Tag;

use super::ServiceError;

/// Tag service for managing tags
pub struct TagService {
    pool: SqlitePool,
}

impl TagService {
    /// Create a new tag service on the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get all tags.
    pub async fn get_all(&self) -> Result<Vec<Tag>, ServiceError> {
        let uow = UnitOfWork::begin(&self.pool).await?;
        uow.tags
            .get_all()
            .await
            .context("Failed to list tags")
            .map_err(Into::into)
    }

    /// Get one tag by id.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no tag has the given id
    pub async fn get_by_id(&self, id: i64) -> Result<Tag, ServiceError> {
        let uow = UnitOfWork::begin(&self.pool).await?;
        uow.tags
            .get_by_id(id)
            .await
            .context("Failed to get tag")?
            .ok_or_else(|| ServiceError::NotFound(format!("Tag with id {} not found", id)))
    }

    /// Create a tag.
    ///
    /// Reuses an existing row when the trimmed name is already taken, so
    /// direct creation can never duplicate what the resolver maintains.
    ///
    /// # Errors
    ///
    /// - `Validation` if the name is blank
    pub async fn add(&self, name: &str) -> Result<Tag, ServiceError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ServiceError::Validation(
                "Tag name cannot be empty".to_string(),
            ));
        }

        let uow = UnitOfWork::begin(&self.pool).await?;
        if let Some(existing) = uow
            .tags
            .get_by_name(trimmed)
            .await
            .context("Failed to check existing tag")?
        {
            return Ok(existing);
        }

        let tag = uow
            .tags
            .add(&Tag::new(trimmed.to_string()))
            .await
            .context("Failed to create tag")?;
        uow.save_changes().await?;

        Ok(tag)
    }

    /// Rename an existing tag.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no tag has the given id
    /// - `Validation` if the new name is blank
    pub async fn update(&self, id: i64, name: &str) -> Result<Tag, ServiceError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ServiceError::Validation(
                "Tag name cannot be empty".to_string(),
            ));
        }

        let uow = UnitOfWork::begin(&self.pool).await?;
        let mut tag = uow
            .tags
            .get_by_id(id)
            .await
            .context("Failed to get tag")?
            .ok_or_else(|| ServiceError::NotFound(format!("Tag with id {} not found", id)))?;

        tag.name = trimmed.to_string();
        uow.tags.update(&tag).await.context("Failed to update tag")?;
        uow.save_changes().await?;

        Ok(tag)
    }

    /// Delete a tag and, via cascade, its news associations.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no tag has the given id
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let uow = UnitOfWork::begin(&self.pool).await?;
        uow.tags
            .get_by_id(id)
            .await
            .context("Failed to get tag")?
            .ok_or_else(|| ServiceError::NotFound(format!("Tag with id {} not found", id)))?;

        uow.tags.delete(id).await.context("Failed to delete tag")?;
        uow.save_changes().await?;

        Ok(())
    }
}
