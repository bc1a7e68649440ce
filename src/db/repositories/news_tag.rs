//! News-to-tag join repository
//!
//! Join rows have no identity beyond the (news_id, tag_id) pair. They are
//! written only while saving a news aggregate; callers never manage them
//! directly.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::Row;

use crate::db::unit_of_work::SharedTx;
use crate::models::NewsTag;

/// News-to-tag join repository trait
#[async_trait]
pub trait NewsTagRepository: Send + Sync {
    /// Get all join rows for a news item
    async fn get_by_news_id(&self, news_id: i64) -> Result<Vec<NewsTag>>;

    /// Insert a join row; inserting the same pair twice is a no-op
    async fn add(&self, news_tag: &NewsTag) -> Result<()>;

    /// Delete a join row
    async fn delete(&self, news_tag: &NewsTag) -> Result<()>;
}

/// SQLx-based join repository bound to a unit of work transaction.
pub struct SqlxNewsTagRepository {
    tx: SharedTx,
}

impl SqlxNewsTagRepository {
    pub(crate) fn new(tx: SharedTx) -> Self {
        Self { tx }
    }

    pub(crate) fn shared(tx: SharedTx) -> Arc<dyn NewsTagRepository> {
        Arc::new(Self::new(tx))
    }
}

#[async_trait]
impl NewsTagRepository for SqlxNewsTagRepository {
    async fn get_by_news_id(&self, news_id: i64) -> Result<Vec<NewsTag>> {
        let mut state = self.tx.lock().await;
        let rows = sqlx::query(
            "SELECT news_id, tag_id FROM news_tags WHERE news_id = ? ORDER BY tag_id",
        )
        .bind(news_id)
        .fetch_all(state.conn()?)
        .await
        .context("Failed to get news tags by news ID")?;

        Ok(rows
            .iter()
            .map(|row| NewsTag {
                news_id: row.get("news_id"),
                tag_id: row.get("tag_id"),
            })
            .collect())
    }

    async fn add(&self, news_tag: &NewsTag) -> Result<()> {
        let mut state = self.tx.lock().await;
        let result = sqlx::query("INSERT OR IGNORE INTO news_tags (news_id, tag_id) VALUES (?, ?)")
            .bind(news_tag.news_id)
            .bind(news_tag.tag_id)
            .execute(state.conn()?)
            .await
            .context("Failed to add news tag")?;
        state.record_rows(result.rows_affected());

        Ok(())
    }

    async fn delete(&self, news_tag: &NewsTag) -> Result<()> {
        let mut state = self.tx.lock().await;
        let result = sqlx::query("DELETE FROM news_tags WHERE news_id = ? AND tag_id = ?")
            .bind(news_tag.news_id)
            .bind(news_tag.tag_id)
            .execute(state.conn()?)
            .await
            .context("Failed to delete news tag")?;
        state.record_rows(result.rows_affected());

        Ok(())
    }
}
