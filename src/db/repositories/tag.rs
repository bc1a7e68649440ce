//! Tag repository
//!
//! Database operations for tags. Lookup by name is the hot path: the tag
//! resolver uses it to reuse existing rows instead of creating duplicates.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

use crate::db::unit_of_work::SharedTx;
use crate::models::Tag;

/// Tag repository trait
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Get tag by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Tag>>;

    /// Get tag by exact name
    async fn get_by_name(&self, name: &str) -> Result<Option<Tag>>;

    /// List all tags ordered by name
    async fn get_all(&self) -> Result<Vec<Tag>>;

    /// Insert a new tag, returning it with its assigned id
    async fn add(&self, tag: &Tag) -> Result<Tag>;

    /// Update an existing tag
    async fn update(&self, tag: &Tag) -> Result<()>;

    /// Delete a tag
    async fn delete(&self, id: i64) -> Result<()>;
}

/// SQLx-based tag repository bound to a unit of work transaction.
pub struct SqlxTagRepository {
    tx: SharedTx,
}

impl SqlxTagRepository {
    pub(crate) fn new(tx: SharedTx) -> Self {
        Self { tx }
    }

    pub(crate) fn shared(tx: SharedTx) -> Arc<dyn TagRepository> {
        Arc::new(Self::new(tx))
    }
}

#[async_trait]
impl TagRepository for SqlxTagRepository {
    async fn get_by_id(&self, id: i64) -> Result<Option<Tag>> {
        let mut state = self.tx.lock().await;
        let row = sqlx::query("SELECT id, name, created_at FROM tags WHERE id = ?")
            .bind(id)
            .fetch_optional(state.conn()?)
            .await
            .context("Failed to get tag by ID")?;

        row.map(|row| row_to_tag(&row)).transpose()
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Tag>> {
        let mut state = self.tx.lock().await;
        let row = sqlx::query("SELECT id, name, created_at FROM tags WHERE name = ?")
            .bind(name)
            .fetch_optional(state.conn()?)
            .await
            .context("Failed to get tag by name")?;

        row.map(|row| row_to_tag(&row)).transpose()
    }

    async fn get_all(&self) -> Result<Vec<Tag>> {
        let mut state = self.tx.lock().await;
        let rows = sqlx::query("SELECT id, name, created_at FROM tags ORDER BY name")
            .fetch_all(state.conn()?)
            .await
            .context("Failed to list tags")?;

        rows.iter().map(row_to_tag).collect()
    }

    async fn add(&self, tag: &Tag) -> Result<Tag> {
        let mut state = self.tx.lock().await;
        let now = Utc::now();

        let result = sqlx::query("INSERT INTO tags (name, created_at) VALUES (?, ?)")
            .bind(&tag.name)
            .bind(now)
            .execute(state.conn()?)
            .await
            .context("Failed to create tag")?;
        state.record_rows(result.rows_affected());

        Ok(Tag {
            id: result.last_insert_rowid(),
            name: tag.name.clone(),
            created_at: now,
        })
    }

    async fn update(&self, tag: &Tag) -> Result<()> {
        let mut state = self.tx.lock().await;
        let result = sqlx::query("UPDATE tags SET name = ? WHERE id = ?")
            .bind(&tag.name)
            .bind(tag.id)
            .execute(state.conn()?)
            .await
            .context("Failed to update tag")?;
        state.record_rows(result.rows_affected());

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        // news_tags entries go automatically via ON DELETE CASCADE
        let mut state = self.tx.lock().await;
        let result = sqlx::query("DELETE FROM tags WHERE id = ?")
            .bind(id)
            .execute(state.conn()?)
            .await
            .context("Failed to delete tag")?;
        state.record_rows(result.rows_affected());

        Ok(())
    }
}

fn row_to_tag(row: &sqlx::sqlite::SqliteRow) -> Result<Tag> {
    Ok(Tag {
        id: row.get("id"),
        name: row.get("name"),
        created_at: row.get("created_at"),
    })
}

#[cfg(test)]
mod tests {
    use crate::db::{create_test_pool, migrations, UnitOfWork};
    use crate::models::Tag;

    async fn setup() -> sqlx::SqlitePool {
        let pool = create_test_pool().await.expect("Failed to create pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        pool
    }

    #[tokio::test]
    async fn test_add_and_get_by_id() {
        let pool = setup().await;
        let uow = UnitOfWork::begin(&pool).await.unwrap();

        let created = uow.tags.add(&Tag::new("rust".to_string())).await.unwrap();
        assert!(created.id > 0);

        let found = uow.tags.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.name, "rust");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let pool = setup().await;
        let uow = UnitOfWork::begin(&pool).await.unwrap();

        let found = uow.tags.get_by_id(99999).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_get_by_name_is_exact() {
        let pool = setup().await;
        let uow = UnitOfWork::begin(&pool).await.unwrap();

        uow.tags.add(&Tag::new("Economy".to_string())).await.unwrap();

        let found = uow.tags.get_by_name("Economy").await.unwrap();
        assert!(found.is_some());

        let miss = uow.tags.get_by_name("economy").await.unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn test_get_all_ordered_by_name() {
        let pool = setup().await;
        let uow = UnitOfWork::begin(&pool).await.unwrap();

        uow.tags.add(&Tag::new("zebra".to_string())).await.unwrap();
        uow.tags.add(&Tag::new("apple".to_string())).await.unwrap();
        uow.tags.add(&Tag::new("mango".to_string())).await.unwrap();

        let tags = uow.tags.get_all().await.unwrap();
        let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["apple", "mango", "zebra"]);
    }

    #[tokio::test]
    async fn test_update_renames_tag() {
        let pool = setup().await;
        let uow = UnitOfWork::begin(&pool).await.unwrap();

        let mut tag = uow.tags.add(&Tag::new("old".to_string())).await.unwrap();
        tag.name = "new".to_string();
        uow.tags.update(&tag).await.unwrap();

        let found = uow.tags.get_by_id(tag.id).await.unwrap().unwrap();
        assert_eq!(found.name, "new");
    }

    #[tokio::test]
    async fn test_delete_removes_tag() {
        let pool = setup().await;
        let uow = UnitOfWork::begin(&pool).await.unwrap();

        let tag = uow.tags.add(&Tag::new("gone".to_string())).await.unwrap();
        uow.tags.delete(tag.id).await.unwrap();

        let found = uow.tags.get_by_id(tag.id).await.unwrap();
        assert!(found.is_none());
    }
}
