//! Unit of work
//!
//! One `UnitOfWork` spans one logical request: it opens a single SQLite
//! transaction, hands out one repository per entity type bound to that
//! transaction, and commits everything with a single [`UnitOfWork::save_changes`]
//! call. Work staged through the repositories is invisible to other
//! connections until the commit; dropping an uncommitted unit of work rolls
//! everything back.

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use tokio::sync::Mutex;

use super::repositories::{
    AuthorRepository, NewsRepository, NewsTagRepository, RubricRepository, SqlxAuthorRepository,
    SqlxNewsRepository, SqlxNewsTagRepository, SqlxRubricRepository, SqlxTagRepository,
    TagRepository,
};

/// Transaction state shared by the repositories of one unit of work.
pub(crate) struct TxState {
    tx: Option<Transaction<'static, Sqlite>>,
    rows_affected: u64,
}

impl TxState {
    /// Borrow the open transaction's connection.
    ///
    /// Fails once the unit of work has been committed; repositories held
    /// past the commit are unusable.
    pub(crate) fn conn(&mut self) -> Result<&mut SqliteConnection> {
        self.tx
            .as_deref_mut()
            .ok_or_else(|| anyhow!("Unit of work has already been committed"))
    }

    /// Record rows touched by a staged write.
    pub(crate) fn record_rows(&mut self, rows: u64) {
        self.rows_affected += rows;
    }
}

/// Shared handle to the transaction state.
pub(crate) type SharedTx = Arc<Mutex<TxState>>;

/// Unit of work over the news store.
///
/// Owns one repository per entity type, all bound to the same transaction.
/// Constructed per request scope; not shared across requests.
pub struct UnitOfWork {
    state: SharedTx,
    /// Author repository
    pub authors: Arc<dyn AuthorRepository>,
    /// Rubric repository
    pub rubrics: Arc<dyn RubricRepository>,
    /// Tag repository
    pub tags: Arc<dyn TagRepository>,
    /// News repository
    pub news: Arc<dyn NewsRepository>,
    /// News-to-tag join repository
    pub news_tags: Arc<dyn NewsTagRepository>,
}

impl UnitOfWork {
    /// Begin a new unit of work on the given pool.
    pub async fn begin(pool: &SqlitePool) -> Result<Self> {
        let tx = pool
            .begin()
            .await
            .context("Failed to begin unit of work transaction")?;
        let state: SharedTx = Arc::new(Mutex::new(TxState {
            tx: Some(tx),
            rows_affected: 0,
        }));

        Ok(Self {
            authors: SqlxAuthorRepository::shared(state.clone()),
            rubrics: SqlxRubricRepository::shared(state.clone()),
            tags: SqlxTagRepository::shared(state.clone()),
            news: SqlxNewsRepository::shared(state.clone()),
            news_tags: SqlxNewsTagRepository::shared(state.clone()),
            state,
        })
    }

    /// Commit all staged changes.
    ///
    /// Consumes the unit of work so a logical request commits exactly once.
    /// Returns the number of rows affected by the writes staged through the
    /// repositories.
    pub async fn save_changes(self) -> Result<u64> {
        let mut state = self.state.lock().await;
        let tx = state
            .tx
            .take()
            .ok_or_else(|| anyhow!("Unit of work has already been committed"))?;
        tx.commit()
            .await
            .context("Failed to commit unit of work")?;
        Ok(state.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};
    use crate::models::{Author, Rubric};

    async fn setup_pool() -> SqlitePool {
        let pool = create_test_pool().await.expect("Failed to create pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        pool
    }

    #[tokio::test]
    async fn test_save_changes_reports_affected_rows() {
        let pool = setup_pool().await;
        let uow = UnitOfWork::begin(&pool).await.expect("begin failed");

        uow.authors
            .add(&Author::new(
                "Jane".to_string(),
                "jane@example.com".to_string(),
                "secret".to_string(),
            ))
            .await
            .expect("add author failed");
        uow.rubrics
            .add(&Rubric::new("World".to_string()))
            .await
            .expect("add rubric failed");

        let affected = uow.save_changes().await.expect("commit failed");
        assert_eq!(affected, 2);
    }

    #[tokio::test]
    async fn test_dropped_unit_of_work_rolls_back() {
        let pool = setup_pool().await;

        {
            let uow = UnitOfWork::begin(&pool).await.expect("begin failed");
            uow.rubrics
                .add(&Rubric::new("Discarded".to_string()))
                .await
                .expect("add rubric failed");
            // No save_changes: the transaction is dropped here.
        }

        let uow = UnitOfWork::begin(&pool).await.expect("begin failed");
        let rubrics = uow.rubrics.get_all().await.expect("get_all failed");
        assert!(rubrics.is_empty());
    }

    #[tokio::test]
    async fn test_changes_visible_after_commit() {
        let pool = setup_pool().await;

        let uow = UnitOfWork::begin(&pool).await.expect("begin failed");
        uow.rubrics
            .add(&Rubric::new("Kept".to_string()))
            .await
            .expect("add rubric failed");
        uow.save_changes().await.expect("commit failed");

        let uow = UnitOfWork::begin(&pool).await.expect("begin failed");
        let rubrics = uow.rubrics.get_all().await.expect("get_all failed");
        assert_eq!(rubrics.len(), 1);
        assert_eq!(rubrics[0].name, "Kept");
    }

    #[tokio::test]
    async fn test_repository_fails_after_commit() {
        let pool = setup_pool().await;

        let uow = UnitOfWork::begin(&pool).await.expect("begin failed");
        let rubrics = uow.rubrics.clone();
        uow.save_changes().await.expect("commit failed");

        let result = rubrics.get_all().await;
        assert!(result.is_err());
    }
}
