//! News service
//!
//! CRUD over the news aggregate. Every operation runs its own unit of work;
//! creates and updates stage the news row, the resolved tags, and the join
//! rows, then commit once. The join table is only ever written here, so the
//! tag set a caller sends is the tag set that ends up materialized.

use std::collections::HashSet;

use anyhow::Context;
use sqlx::SqlitePool;

use crate::db::UnitOfWork;
use crate::models::{NewsTag, NewsTransfer, Tag};

use super::{NewsMapper, ServiceError, TagResolver};

/// News service for managing news items
pub struct NewsService {
    pool: SqlitePool,
}

impl NewsService {
    /// Create a new news service on the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get all news items, newest first.
    pub async fn get_all(&self) -> Result<Vec<NewsTransfer>, ServiceError> {
        let uow = UnitOfWork::begin(&self.pool).await?;
        let rows = uow.news.get_all().await.context("Failed to list news")?;
        NewsMapper::new(&uow).to_transfer_many(&rows).await
    }

    /// Get one news item by id.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no news item has the given id
    pub async fn get_by_id(&self, id: i64) -> Result<NewsTransfer, ServiceError> {
        let uow = UnitOfWork::begin(&self.pool).await?;
        let news = uow
            .news
            .get_by_id(id)
            .await
            .context("Failed to get news")?
            .ok_or_else(|| ServiceError::NotFound(format!("News with id {} not found", id)))?;
        NewsMapper::new(&uow).to_transfer(&news).await
    }

    /// Get all news items in a rubric, newest first.
    pub async fn get_all_by_rubric_id(
        &self,
        rubric_id: i64,
    ) -> Result<Vec<NewsTransfer>, ServiceError> {
        let uow = UnitOfWork::begin(&self.pool).await?;
        let rows = uow
            .news
            .get_all_by_rubric_id(rubric_id)
            .await
            .context("Failed to list news by rubric")?;
        NewsMapper::new(&uow).to_transfer_many(&rows).await
    }

    /// Get all news items by an author, newest first.
    pub async fn get_all_by_author_id(
        &self,
        author_id: i64,
    ) -> Result<Vec<NewsTransfer>, ServiceError> {
        let uow = UnitOfWork::begin(&self.pool).await?;
        let rows = uow
            .news
            .get_all_by_author_id(author_id)
            .await
            .context("Failed to list news by author")?;
        NewsMapper::new(&uow).to_transfer_many(&rows).await
    }

    /// Get all news items carrying a tag, newest first.
    pub async fn get_all_by_tag_id(
        &self,
        tag_id: i64,
    ) -> Result<Vec<NewsTransfer>, ServiceError> {
        let uow = UnitOfWork::begin(&self.pool).await?;
        let rows = uow
            .news
            .get_all_by_tag_id(tag_id)
            .await
            .context("Failed to list news by tag")?;
        NewsMapper::new(&uow).to_transfer_many(&rows).await
    }

    /// Create a news item from its flat representation.
    ///
    /// The author and rubric must already exist by name; tags are created on
    /// demand. The news row, any new tags, and the join rows are committed
    /// together.
    ///
    /// Returns the persisted item with its assigned id.
    pub async fn create(&self, input: &NewsTransfer) -> Result<NewsTransfer, ServiceError> {
        let uow = UnitOfWork::begin(&self.pool).await?;
        let mapper = NewsMapper::new(&uow);

        let aggregate = mapper.from_transfer(input).await?;
        let created = uow
            .news
            .add(&aggregate.news)
            .await
            .context("Failed to create news")?;
        attach_tags(&uow, created.id, &aggregate.tags).await?;

        let transfer = mapper.to_transfer(&created).await?;
        uow.save_changes().await?;

        tracing::info!(news_id = created.id, "created news item");
        Ok(transfer)
    }

    /// Update a news item from its flat representation.
    ///
    /// The existing tag associations are replaced wholesale: delete the old
    /// set, resolve the new one, re-attach. All of it, together with the row
    /// update, is one commit.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no news item has the given id, or the author/rubric
    ///   name does not resolve
    pub async fn update(&self, id: i64, input: &NewsTransfer) -> Result<NewsTransfer, ServiceError> {
        let uow = UnitOfWork::begin(&self.pool).await?;
        uow.news
            .get_by_id(id)
            .await
            .context("Failed to get news")?
            .ok_or_else(|| ServiceError::NotFound(format!("News with id {} not found", id)))?;

        let resolver = TagResolver::new(&uow);
        resolver.replace_for_news(id, &input.tags).await?;

        let mapper = NewsMapper::new(&uow);
        let aggregate = mapper.from_transfer(input).await?;
        let updated = crate::models::News {
            id,
            ..aggregate.news
        };
        uow.news
            .update(&updated)
            .await
            .context("Failed to update news")?;
        attach_tags(&uow, id, &aggregate.tags).await?;

        let transfer = mapper.to_transfer(&updated).await?;
        uow.save_changes().await?;

        tracing::info!(news_id = id, "updated news item");
        Ok(transfer)
    }

    /// Delete a news item.
    ///
    /// Join rows go with the row via cascade; tag rows stay.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no news item has the given id
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let uow = UnitOfWork::begin(&self.pool).await?;
        uow.news
            .get_by_id(id)
            .await
            .context("Failed to get news")?
            .ok_or_else(|| ServiceError::NotFound(format!("News with id {} not found", id)))?;

        uow.news.delete(id).await.context("Failed to delete news")?;
        uow.save_changes().await?;

        tracing::info!(news_id = id, "deleted news item");
        Ok(())
    }
}

/// Stage join rows for the given tags, skipping duplicate tag ids.
async fn attach_tags(uow: &UnitOfWork, news_id: i64, tags: &[Tag]) -> Result<(), ServiceError> {
    let mut seen = HashSet::new();
    for tag in tags {
        if seen.insert(tag.id) {
            uow.news_tags
                .add(&NewsTag {
                    news_id,
                    tag_id: tag.id,
                })
                .await
                .context("Failed to attach tag to news")?;
        }
    }
    Ok(())
}
