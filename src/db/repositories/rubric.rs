//! Rubric repository

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

use crate::db::unit_of_work::SharedTx;
use crate::models::Rubric;

/// Rubric repository trait
#[async_trait]
pub trait RubricRepository: Send + Sync {
    /// Get rubric by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Rubric>>;

    /// Get rubric by exact name
    async fn get_by_name(&self, name: &str) -> Result<Option<Rubric>>;

    /// List all rubrics ordered by name
    async fn get_all(&self) -> Result<Vec<Rubric>>;

    /// Insert a new rubric, returning it with its assigned id
    async fn add(&self, rubric: &Rubric) -> Result<Rubric>;

    /// Update an existing rubric
    async fn update(&self, rubric: &Rubric) -> Result<()>;

    /// Delete a rubric
    async fn delete(&self, id: i64) -> Result<()>;
}

/// SQLx-based rubric repository bound to a unit of work transaction.
pub struct SqlxRubricRepository {
    tx: SharedTx,
}

impl SqlxRubricRepository {
    pub(crate) fn new(tx: SharedTx) -> Self {
        Self { tx }
    }

    pub(crate) fn shared(tx: SharedTx) -> Arc<dyn RubricRepository> {
        Arc::new(Self::new(tx))
    }
}

#[async_trait]
impl RubricRepository for SqlxRubricRepository {
    async fn get_by_id(&self, id: i64) -> Result<Option<Rubric>> {
        let mut state = self.tx.lock().await;
        let row = sqlx::query("SELECT id, name, created_at FROM rubrics WHERE id = ?")
            .bind(id)
            .fetch_optional(state.conn()?)
            .await
            .context("Failed to get rubric by ID")?;

        row.map(|row| row_to_rubric(&row)).transpose()
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Rubric>> {
        let mut state = self.tx.lock().await;
        let row = sqlx::query("SELECT id, name, created_at FROM rubrics WHERE name = ?")
            .bind(name)
            .fetch_optional(state.conn()?)
            .await
            .context("Failed to get rubric by name")?;

        row.map(|row| row_to_rubric(&row)).transpose()
    }

    async fn get_all(&self) -> Result<Vec<Rubric>> {
        let mut state = self.tx.lock().await;
        let rows = sqlx::query("SELECT id, name, created_at FROM rubrics ORDER BY name")
            .fetch_all(state.conn()?)
            .await
            .context("Failed to list rubrics")?;

        rows.iter().map(row_to_rubric).collect()
    }

    async fn add(&self, rubric: &Rubric) -> Result<Rubric> {
        let mut state = self.tx.lock().await;
        let now = Utc::now();

        let result = sqlx::query("INSERT INTO rubrics (name, created_at) VALUES (?, ?)")
            .bind(&rubric.name)
            .bind(now)
            .execute(state.conn()?)
            .await
            .context("Failed to create rubric")?;
        state.record_rows(result.rows_affected());

        Ok(Rubric {
            id: result.last_insert_rowid(),
            name: rubric.name.clone(),
            created_at: now,
        })
    }

    async fn update(&self, rubric: &Rubric) -> Result<()> {
        let mut state = self.tx.lock().await;
        let result = sqlx::query("UPDATE rubrics SET name = ? WHERE id = ?")
            .bind(&rubric.name)
            .bind(rubric.id)
            .execute(state.conn()?)
            .await
            .context("Failed to update rubric")?;
        state.record_rows(result.rows_affected());

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut state = self.tx.lock().await;
        let result = sqlx::query("DELETE FROM rubrics WHERE id = ?")
            .bind(id)
            .execute(state.conn()?)
            .await
            .context("Failed to delete rubric")?;
        state.record_rows(result.rows_affected());

        Ok(())
    }
}

fn row_to_rubric(row: &sqlx::sqlite::SqliteRow) -> Result<Rubric> {
    Ok(Rubric {
        id: row.get("id"),
        name: row.get("name"),
        created_at: row.get("created_at"),
    })
}
