//! News mapper
//!
//! Converts between the persisted news aggregate and the flat transfer
//! shape exchanged with external callers. Outbound, ids are resolved to
//! author/rubric names and the tag set is collected through the join table.
//! Inbound, names are resolved back to ids: author and rubric must already
//! exist by exact name, while tags are created on demand through the tag
//! resolver.
//!
//! All lookups run in a fixed sequence on the mapper's unit of work: author,
//! then rubric, then tags. Nothing is committed here; the calling service
//! owns the commit.

use anyhow::Context;

use crate::db::UnitOfWork;
use crate::models::{News, NewsTransfer, NewsWithTags, Tag};

use super::{ServiceError, TagResolver};

/// Maps news aggregates to and from the flat transfer shape within one unit
/// of work.
pub struct NewsMapper<'a> {
    uow: &'a UnitOfWork,
}

impl<'a> NewsMapper<'a> {
    /// Create a mapper bound to the given unit of work.
    pub fn new(uow: &'a UnitOfWork) -> Self {
        Self { uow }
    }

    /// Map a persisted news row to its flat representation.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the author or rubric foreign key does not resolve, or
    ///   a join row points at a missing tag. Both mean the store itself is
    ///   inconsistent, so they are also logged at error level.
    pub async fn to_transfer(&self, news: &News) -> Result<NewsTransfer, ServiceError> {
        let author = self
            .uow
            .authors
            .get_by_id(news.author_id)
            .await
            .context("Failed to load news author")?
            .ok_or_else(|| {
                tracing::error!(
                    news_id = news.id,
                    author_id = news.author_id,
                    "news row references a missing author"
                );
                ServiceError::NotFound(format!(
                    "Author with id {} referenced by news {} not found",
                    news.author_id, news.id
                ))
            })?;

        let rubric = self
            .uow
            .rubrics
            .get_by_id(news.rubric_id)
            .await
            .context("Failed to load news rubric")?
            .ok_or_else(|| {
                tracing::error!(
                    news_id = news.id,
                    rubric_id = news.rubric_id,
                    "news row references a missing rubric"
                );
                ServiceError::NotFound(format!(
                    "Rubric with id {} referenced by news {} not found",
                    news.rubric_id, news.id
                ))
            })?;

        let associations = self
            .uow
            .news_tags
            .get_by_news_id(news.id)
            .await
            .context("Failed to load news tag associations")?;

        let mut tags = Vec::with_capacity(associations.len());
        for association in &associations {
            let tag = self
                .uow
                .tags
                .get_by_id(association.tag_id)
                .await
                .context("Failed to load news tag")?
                .ok_or_else(|| {
                    tracing::error!(
                        news_id = news.id,
                        tag_id = association.tag_id,
                        "news tag association references a missing tag"
                    );
                    ServiceError::NotFound(format!(
                        "Tag with id {} referenced by news {} not found",
                        association.tag_id, news.id
                    ))
                })?;
            tags.push(tag);
        }

        Ok(NewsTransfer {
            id: news.id,
            title: news.title.clone(),
            body: news.body.clone(),
            tags: Self::tag_names(&tags),
            date: news.date,
            author_name: author.name,
            rubric_name: rubric.name,
        })
    }

    /// Map a list of news rows, preserving input order.
    ///
    /// Fails on the first item that cannot be mapped; there is no
    /// partial-success mode.
    pub async fn to_transfer_many(
        &self,
        list: &[News],
    ) -> Result<Vec<NewsTransfer>, ServiceError> {
        let mut transfers = Vec::with_capacity(list.len());
        for news in list {
            transfers.push(self.to_transfer(news).await?);
        }
        Ok(transfers)
    }

    /// Map a flat representation to a news aggregate.
    ///
    /// The author and rubric must already exist under the transfer's exact
    /// (trimmed) names. Tags are resolved through the tag resolver, creating
    /// missing ones; the returned aggregate carries them in memory only, and
    /// no join rows are persisted here.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the author or rubric name does not resolve. The
    ///   failure happens before any tag is created, so a bad reference
    ///   stages no writes at all.
    pub async fn from_transfer(
        &self,
        transfer: &NewsTransfer,
    ) -> Result<NewsWithTags, ServiceError> {
        let author_name = transfer.author_name.trim();
        let author = self
            .uow
            .authors
            .get_by_name(author_name)
            .await
            .context("Failed to look up author by name")?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Author '{}' not found", author_name))
            })?;

        let rubric_name = transfer.rubric_name.trim();
        let rubric = self
            .uow
            .rubrics
            .get_by_name(rubric_name)
            .await
            .context("Failed to look up rubric by name")?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Rubric '{}' not found", rubric_name))
            })?;

        let resolver = TagResolver::new(self.uow);
        let tags = resolver.resolve_or_create(&transfer.tags).await?;

        Ok(NewsWithTags {
            news: News {
                id: transfer.id,
                title: transfer.title.clone(),
                body: transfer.body.clone(),
                date: transfer.date,
                author_id: author.id,
                rubric_id: rubric.id,
            },
            tags,
        })
    }

    /// Project tags to their names, preserving order. Pure; no lookups.
    pub fn tag_names(tags: &[Tag]) -> Vec<String> {
        tags.iter().map(|tag| tag.name.clone()).collect()
    }
}
