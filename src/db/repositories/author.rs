//! Author repository
//!
//! Database operations for authors. Besides the usual CRUD surface this
//! exposes the credential lookup the auth service authenticates through.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

use crate::db::unit_of_work::SharedTx;
use crate::models::Author;

/// Author repository trait
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    /// Get author by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Author>>;

    /// Get author by exact display name
    async fn get_by_name(&self, name: &str) -> Result<Option<Author>>;

    /// Get the author matching both email and stored credential
    async fn get_by_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Author>>;

    /// List all authors
    async fn get_all(&self) -> Result<Vec<Author>>;

    /// Insert a new author, returning it with its assigned id
    async fn add(&self, author: &Author) -> Result<Author>;

    /// Update an existing author
    async fn update(&self, author: &Author) -> Result<()>;

    /// Delete an author
    async fn delete(&self, id: i64) -> Result<()>;
}

/// SQLx-based author repository bound to a unit of work transaction.
pub struct SqlxAuthorRepository {
    tx: SharedTx,
}

impl SqlxAuthorRepository {
    pub(crate) fn new(tx: SharedTx) -> Self {
        Self { tx }
    }

    pub(crate) fn shared(tx: SharedTx) -> Arc<dyn AuthorRepository> {
        Arc::new(Self::new(tx))
    }
}

#[async_trait]
impl AuthorRepository for SqlxAuthorRepository {
    async fn get_by_id(&self, id: i64) -> Result<Option<Author>> {
        let mut state = self.tx.lock().await;
        let row = sqlx::query("SELECT id, name, email, password, created_at FROM authors WHERE id = ?")
            .bind(id)
            .fetch_optional(state.conn()?)
            .await
            .context("Failed to get author by ID")?;

        row.map(|row| row_to_author(&row)).transpose()
    }

    async fn get_by_name(&self, name: &str) -> Result<Option<Author>> {
        let mut state = self.tx.lock().await;
        let row = sqlx::query("SELECT id, name, email, password, created_at FROM authors WHERE name = ?")
            .bind(name)
            .fetch_optional(state.conn()?)
            .await
            .context("Failed to get author by name")?;

        row.map(|row| row_to_author(&row)).transpose()
    }

    async fn get_by_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Author>> {
        let mut state = self.tx.lock().await;
        let row = sqlx::query(
            "SELECT id, name, email, password, created_at FROM authors WHERE email = ? AND password = ?",
        )
        .bind(email)
        .bind(password)
        .fetch_optional(state.conn()?)
        .await
        .context("Failed to get author by credentials")?;

        row.map(|row| row_to_author(&row)).transpose()
    }

    async fn get_all(&self) -> Result<Vec<Author>> {
        let mut state = self.tx.lock().await;
        let rows = sqlx::query("SELECT id, name, email, password, created_at FROM authors ORDER BY id")
            .fetch_all(state.conn()?)
            .await
            .context("Failed to list authors")?;

        rows.iter().map(row_to_author).collect()
    }

    async fn add(&self, author: &Author) -> Result<Author> {
        let mut state = self.tx.lock().await;
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO authors (name, email, password, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&author.name)
        .bind(&author.email)
        .bind(&author.password)
        .bind(now)
        .execute(state.conn()?)
        .await
        .context("Failed to create author")?;
        state.record_rows(result.rows_affected());

        Ok(Author {
            id: result.last_insert_rowid(),
            name: author.name.clone(),
            email: author.email.clone(),
            password: author.password.clone(),
            created_at: now,
        })
    }

    async fn update(&self, author: &Author) -> Result<()> {
        let mut state = self.tx.lock().await;
        let result = sqlx::query("UPDATE authors SET name = ?, email = ?, password = ? WHERE id = ?")
            .bind(&author.name)
            .bind(&author.email)
            .bind(&author.password)
            .bind(author.id)
            .execute(state.conn()?)
            .await
            .context("Failed to update author")?;
        state.record_rows(result.rows_affected());

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut state = self.tx.lock().await;
        let result = sqlx::query("DELETE FROM authors WHERE id = ?")
            .bind(id)
            .execute(state.conn()?)
            .await
            .context("Failed to delete author")?;
        state.record_rows(result.rows_affected());

        Ok(())
    }
}

fn row_to_author(row: &sqlx::sqlite::SqliteRow) -> Result<Author> {
    Ok(Author {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        password: row.get("password"),
        created_at: row.get("created_at"),
    })
}
