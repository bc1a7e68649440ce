//! News repository
//!
//! Database operations for news rows. Tag associations live in the join
//! repository; this one only handles the row itself plus the filtered
//! listings (by rubric, author, or tag).

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::Row;

use crate::db::unit_of_work::SharedTx;
use crate::models::News;

/// News repository trait
#[async_trait]
pub trait NewsRepository: Send + Sync {
    /// Get news by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<News>>;

    /// List all news ordered by date, newest first
    async fn get_all(&self) -> Result<Vec<News>>;

    /// List all news in a rubric
    async fn get_all_by_rubric_id(&self, rubric_id: i64) -> Result<Vec<News>>;

    /// List all news by an author
    async fn get_all_by_author_id(&self, author_id: i64) -> Result<Vec<News>>;

    /// List all news carrying a tag
    async fn get_all_by_tag_id(&self, tag_id: i64) -> Result<Vec<News>>;

    /// Insert a new news row, returning it with its assigned id
    async fn add(&self, news: &News) -> Result<News>;

    /// Update an existing news row
    async fn update(&self, news: &News) -> Result<()>;

    /// Delete a news row; join rows go with it via cascade
    async fn delete(&self, id: i64) -> Result<()>;
}

/// SQLx-based news repository bound to a unit of work transaction.
pub struct SqlxNewsRepository {
    tx: SharedTx,
}

impl SqlxNewsRepository {
    pub(crate) fn new(tx: SharedTx) -> Self {
        Self { tx }
    }

    pub(crate) fn shared(tx: SharedTx) -> Arc<dyn NewsRepository> {
        Arc::new(Self::new(tx))
    }
}

#[async_trait]
impl NewsRepository for SqlxNewsRepository {
    async fn get_by_id(&self, id: i64) -> Result<Option<News>> {
        let mut state = self.tx.lock().await;
        let row = sqlx::query(
            "SELECT id, title, body, date, author_id, rubric_id FROM news WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(state.conn()?)
        .await
        .context("Failed to get news by ID")?;

        row.map(|row| row_to_news(&row)).transpose()
    }

    async fn get_all(&self) -> Result<Vec<News>> {
        let mut state = self.tx.lock().await;
        let rows = sqlx::query(
            "SELECT id, title, body, date, author_id, rubric_id FROM news ORDER BY date DESC, id DESC",
        )
        .fetch_all(state.conn()?)
        .await
        .context("Failed to list news")?;

        rows.iter().map(row_to_news).collect()
    }

    async fn get_all_by_rubric_id(&self, rubric_id: i64) -> Result<Vec<News>> {
        let mut state = self.tx.lock().await;
        let rows = sqlx::query(
            r#"
            SELECT id, title, body, date, author_id, rubric_id
            FROM news
            WHERE rubric_id = ?
            ORDER BY date DESC, id DESC
            "#,
        )
        .bind(rubric_id)
        .fetch_all(state.conn()?)
        .await
        .context("Failed to list news by rubric")?;

        rows.iter().map(row_to_news).collect()
    }

    async fn get_all_by_author_id(&self, author_id: i64) -> Result<Vec<News>> {
        let mut state = self.tx.lock().await;
        let rows = sqlx::query(
            r#"
            SELECT id, title, body, date, author_id, rubric_id
            FROM news
            WHERE author_id = ?
            ORDER BY date DESC, id DESC
            "#,
        )
        .bind(author_id)
        .fetch_all(state.conn()?)
        .await
        .context("Failed to list news by author")?;

        rows.iter().map(row_to_news).collect()
    }

    async fn get_all_by_tag_id(&self, tag_id: i64) -> Result<Vec<News>> {
        let mut state = self.tx.lock().await;
        let rows = sqlx::query(
            r#"
            SELECT n.id, n.title, n.body, n.date, n.author_id, n.rubric_id
            FROM news n
            INNER JOIN news_tags nt ON n.id = nt.news_id
            WHERE nt.tag_id = ?
            ORDER BY n.date DESC, n.id DESC
            "#,
        )
        .bind(tag_id)
        .fetch_all(state.conn()?)
        .await
        .context("Failed to list news by tag")?;

        rows.iter().map(row_to_news).collect()
    }

    async fn add(&self, news: &News) -> Result<News> {
        let mut state = self.tx.lock().await;
        let result = sqlx::query(
            "INSERT INTO news (title, body, date, author_id, rubric_id) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&news.title)
        .bind(&news.body)
        .bind(news.date)
        .bind(news.author_id)
        .bind(news.rubric_id)
        .execute(state.conn()?)
        .await
        .context("Failed to create news")?;
        state.record_rows(result.rows_affected());

        Ok(News {
            id: result.last_insert_rowid(),
            title: news.title.clone(),
            body: news.body.clone(),
            date: news.date,
            author_id: news.author_id,
            rubric_id: news.rubric_id,
        })
    }

    async fn update(&self, news: &News) -> Result<()> {
        let mut state = self.tx.lock().await;
        let result = sqlx::query(
            "UPDATE news SET title = ?, body = ?, date = ?, author_id = ?, rubric_id = ? WHERE id = ?",
        )
        .bind(&news.title)
        .bind(&news.body)
        .bind(news.date)
        .bind(news.author_id)
        .bind(news.rubric_id)
        .bind(news.id)
        .execute(state.conn()?)
        .await
        .context("Failed to update news")?;
        state.record_rows(result.rows_affected());

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut state = self.tx.lock().await;
        let result = sqlx::query("DELETE FROM news WHERE id = ?")
            .bind(id)
            .execute(state.conn()?)
            .await
            .context("Failed to delete news")?;
        state.record_rows(result.rows_affected());

        Ok(())
    }
}

fn row_to_news(row: &sqlx::sqlite::SqliteRow) -> Result<News> {
    Ok(News {
        id: row.get("id"),
        title: row.get("title"),
        body: row.get("body"),
        date: row.get("date"),
        author_id: row.get("author_id"),
        rubric_id: row.get("rubric_id"),
    })
}
