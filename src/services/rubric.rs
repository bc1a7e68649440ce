//! Rubric service

use anyhow::Context;
use sqlx::SqlitePool;

use crate::db::UnitOfWork;
use crate::models::Rubric;

use super::ServiceError;

/// Rubric service for managing news sections
pub struct RubricService {
    pool: SqlitePool,
}

impl RubricService {
    /// Create a new rubric service on the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get all rubrics.
    pub async fn get_all(&self) -> Result<Vec<Rubric>, ServiceError> {
        let uow = UnitOfWork::begin(&self.pool).await?;
        uow.rubrics
            .get_all()
            .await
            .context("Failed to list rubrics")
            .map_err(Into::into)
    }

    /// Get one rubric by id.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no rubric has the given id
    pub async fn get_by_id(&self, id: i64) -> Result<Rubric, ServiceError> {
        let uow = UnitOfWork::begin(&self.pool).await?;
        uow.rubrics
            .get_by_id(id)
            .await
            .context("Failed to get rubric")?
            .ok_or_else(|| ServiceError::NotFound(format!("Rubric with id {} not found", id)))
    }

    /// Create a rubric.
    pub async fn add(&self, name: &str) -> Result<Rubric, ServiceError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ServiceError::Validation(
                "Rubric name cannot be empty".to_string(),
            ));
        }

        let uow = UnitOfWork::begin(&self.pool).await?;
        let rubric = uow
            .rubrics
            .add(&Rubric::new(trimmed.to_string()))
            .await
            .context("Failed to create rubric")?;
        uow.save_changes().await?;

        Ok(rubric)
    }

    /// Rename an existing rubric.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no rubric has the given id
    pub async fn update(&self, id: i64, name: &str) -> Result<Rubric, ServiceError> {
        let uow = UnitOfWork::begin(&self.pool).await?;
        let mut rubric = uow
            .rubrics
            .get_by_id(id)
            .await
            .context("Failed to get rubric")?
            .ok_or_else(|| ServiceError::NotFound(format!("Rubric with id {} not found", id)))?;

        rubric.name = name.trim().to_string();
        uow.rubrics
            .update(&rubric)
            .await
            .context("Failed to update rubric")?;
        uow.save_changes().await?;

        Ok(rubric)
    }

    /// Delete a rubric.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no rubric has the given id
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let uow = UnitOfWork::begin(&self.pool).await?;
        uow.rubrics
            .get_by_id(id)
            .await
            .context("Failed to get rubric")?
            .ok_or_else(|| ServiceError::NotFound(format!("Rubric with id {} not found", id)))?;

        uow.rubrics
            .delete(id)
            .await
            .context("Failed to delete rubric")?;
        uow.save_changes().await?;

        Ok(())
    }
}
