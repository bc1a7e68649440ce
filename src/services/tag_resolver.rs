//! Tag resolver
//!
//! Resolves tag names against the store: an existing tag is reused, a
//! missing one is created, and no name ever produces two rows. Names are
//! trimmed before matching; the match itself is exact and case-sensitive.
//!
//! The resolver also replaces a news item's entire tag association set.
//! The deletions and whatever the caller stages afterwards ride the same
//! unit of work, so a single commit covers the full replacement.

use anyhow::Context;

use crate::db::UnitOfWork;
use crate::models::Tag;

use super::ServiceError;

/// Resolves tag names to tag entities within one unit of work.
pub struct TagResolver<'a> {
    uow: &'a UnitOfWork,
}

impl<'a> TagResolver<'a> {
    /// Create a resolver bound to the given unit of work.
    pub fn new(uow: &'a UnitOfWork) -> Self {
        Self { uow }
    }

    /// Resolve each name to a tag, creating tags that do not exist yet.
    ///
    /// Returns one tag per input name, in input order. A name that appears
    /// twice resolves to the same tag both times; the second pass finds the
    /// row the first pass created.
    ///
    /// # Errors
    ///
    /// - `Validation` if a name is empty after trimming
    pub async fn resolve_or_create(&self, names: &[String]) -> Result<Vec<Tag>, ServiceError> {
        let mut tags = Vec::with_capacity(names.len());

        for name in names {
            let trimmed = name.trim();
            if trimmed.is_empty() {
                return Err(ServiceError::Validation(
                    "Tag name cannot be empty".to_string(),
                ));
            }

            let tag = match self
                .uow
                .tags
                .get_by_name(trimmed)
                .await
                .context("Failed to look up tag by name")?
            {
                Some(existing) => existing,
                None => {
                    tracing::debug!(name = trimmed, "creating tag");
                    self.uow
                        .tags
                        .add(&Tag::new(trimmed.to_string()))
                        .await
                        .context("Failed to create tag")?
                }
            };
            tags.push(tag);
        }

        Ok(tags)
    }

    /// Replace the tag set of a news item.
    ///
    /// Deletes every existing association for the news id, then resolves the
    /// new name set and returns it. The replacement association rows are not
    /// created here: whoever saves the news aggregate persists join rows
    /// matching the returned tags.
    pub async fn replace_for_news(
        &self,
        news_id: i64,
        names: &[String],
    ) -> Result<Vec<Tag>, ServiceError> {
        let existing = self
            .uow
            .news_tags
            .get_by_news_id(news_id)
            .await
            .context("Failed to load news tag associations")?;

        for association in &existing {
            self.uow
                .news_tags
                .delete(association)
                .await
                .context("Failed to delete news tag association")?;
        }

        self.resolve_or_create(names).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::db::{create_test_pool, migrations, UnitOfWork};
    use crate::models::{Author, News, NewsTag, Rubric};

    async fn setup() -> sqlx::SqlitePool {
        let pool = create_test_pool().await.expect("Failed to create pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        pool
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_resolve_creates_missing_tags() {
        let pool = setup().await;
        let uow = UnitOfWork::begin(&pool).await.unwrap();
        let resolver = TagResolver::new(&uow);

        let tags = resolver
            .resolve_or_create(&names(&["politics", "economy"]))
            .await
            .unwrap();

        assert_eq!(tags.len(), 2);
        assert!(tags.iter().all(|t| t.id > 0));
        assert_eq!(tags[0].name, "politics");
        assert_eq!(tags[1].name, "economy");
    }

    #[tokio::test]
    async fn test_resolve_reuses_existing_tags() {
        let pool = setup().await;
        let uow = UnitOfWork::begin(&pool).await.unwrap();
        let resolver = TagResolver::new(&uow);

        let first = resolver.resolve_or_create(&names(&["shared"])).await.unwrap();
        let second = resolver
            .resolve_or_create(&names(&["shared", "fresh"]))
            .await
            .unwrap();

        assert_eq!(second[0].id, first[0].id);

        let all = uow.tags.get_all().await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_resolve_deduplicates_within_one_call() {
        let pool = setup().await;
        let uow = UnitOfWork::begin(&pool).await.unwrap();
        let resolver = TagResolver::new(&uow);

        let tags = resolver
            .resolve_or_create(&names(&["twice", "twice"]))
            .await
            .unwrap();

        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].id, tags[1].id);

        let all = uow.tags.get_all().await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_resolve_trims_names() {
        let pool = setup().await;
        let uow = UnitOfWork::begin(&pool).await.unwrap();
        let resolver = TagResolver::new(&uow);

        let tags = resolver
            .resolve_or_create(&names(&["  spaced  "]))
            .await
            .unwrap();
        assert_eq!(tags[0].name, "spaced");

        // A later resolution of the bare name reuses the trimmed row.
        let again = resolver.resolve_or_create(&names(&["spaced"])).await.unwrap();
        assert_eq!(again[0].id, tags[0].id);
    }

    #[tokio::test]
    async fn test_resolve_rejects_blank_name() {
        let pool = setup().await;
        let uow = UnitOfWork::begin(&pool).await.unwrap();
        let resolver = TagResolver::new(&uow);

        let result = resolver.resolve_or_create(&names(&["ok", "   "])).await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_resolve_is_case_sensitive() {
        let pool = setup().await;
        let uow = UnitOfWork::begin(&pool).await.unwrap();
        let resolver = TagResolver::new(&uow);

        let lower = resolver.resolve_or_create(&names(&["rust"])).await.unwrap();
        let upper = resolver.resolve_or_create(&names(&["Rust"])).await.unwrap();

        assert_ne!(lower[0].id, upper[0].id);
    }

    #[tokio::test]
    async fn test_empty_name_list_resolves_to_empty() {
        let pool = setup().await;
        let uow = UnitOfWork::begin(&pool).await.unwrap();
        let resolver = TagResolver::new(&uow);

        let tags = resolver.resolve_or_create(&[]).await.unwrap();
        assert!(tags.is_empty());
    }

    async fn seed_news(uow: &UnitOfWork) -> i64 {
        let author = uow
            .authors
            .add(&Author::new(
                "Jane".to_string(),
                "jane@example.com".to_string(),
                "secret".to_string(),
            ))
            .await
            .unwrap();
        let rubric = uow.rubrics.add(&Rubric::new("World".to_string())).await.unwrap();
        let news = uow
            .news
            .add(&News {
                id: 0,
                title: "Title".to_string(),
                body: "Body".to_string(),
                date: Utc::now(),
                author_id: author.id,
                rubric_id: rubric.id,
            })
            .await
            .unwrap();
        news.id
    }

    #[tokio::test]
    async fn test_replace_for_news_swaps_associations() {
        let pool = setup().await;
        let uow = UnitOfWork::begin(&pool).await.unwrap();
        let resolver = TagResolver::new(&uow);
        let news_id = seed_news(&uow).await;

        // Start with {a, b} attached.
        let initial = resolver.resolve_or_create(&names(&["a", "b"])).await.unwrap();
        for tag in &initial {
            uow.news_tags
                .add(&NewsTag {
                    news_id,
                    tag_id: tag.id,
                })
                .await
                .unwrap();
        }

        // Replace with {b, c} and re-attach what the resolver returns.
        let replacement = resolver
            .replace_for_news(news_id, &names(&["b", "c"]))
            .await
            .unwrap();
        for tag in &replacement {
            uow.news_tags
                .add(&NewsTag {
                    news_id,
                    tag_id: tag.id,
                })
                .await
                .unwrap();
        }

        let joins = uow.news_tags.get_by_news_id(news_id).await.unwrap();
        assert_eq!(joins.len(), 2);

        let b = uow.tags.get_by_name("b").await.unwrap().unwrap();
        let c = uow.tags.get_by_name("c").await.unwrap().unwrap();
        let mut tag_ids: Vec<i64> = joins.iter().map(|j| j.tag_id).collect();
        tag_ids.sort_unstable();
        let mut expected = vec![b.id, c.id];
        expected.sort_unstable();
        assert_eq!(tag_ids, expected);

        // The old "a" tag row survives; only its association is gone.
        assert!(uow.tags.get_by_name("a").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_replace_for_news_with_empty_list_clears_associations() {
        let pool = setup().await;
        let uow = UnitOfWork::begin(&pool).await.unwrap();
        let resolver = TagResolver::new(&uow);
        let news_id = seed_news(&uow).await;

        let initial = resolver.resolve_or_create(&names(&["a"])).await.unwrap();
        uow.news_tags
            .add(&NewsTag {
                news_id,
                tag_id: initial[0].id,
            })
            .await
            .unwrap();

        let replacement = resolver.replace_for_news(news_id, &[]).await.unwrap();
        assert!(replacement.is_empty());

        let joins = uow.news_tags.get_by_news_id(news_id).await.unwrap();
        assert!(joins.is_empty());
    }

    // Property: resolving the same name any number of times yields one row.
    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(16))]

            #[test]
            fn property_resolution_never_duplicates(
                name in "[a-zA-Z][a-zA-Z0-9]{2,12}",
                calls in 2..6usize,
            ) {
                let rt = tokio::runtime::Runtime::new().unwrap();
                let result: Result<(), TestCaseError> = rt.block_on(async {
                    let pool = setup().await;
                    let uow = UnitOfWork::begin(&pool).await.unwrap();
                    let resolver = TagResolver::new(&uow);

                    let mut ids = Vec::new();
                    for _ in 0..calls {
                        let tags = resolver
                            .resolve_or_create(&[name.clone()])
                            .await
                            .expect("resolve_or_create should succeed");
                        ids.push(tags[0].id);
                    }

                    let first = ids[0];
                    for id in &ids {
                        prop_assert_eq!(*id, first);
                    }

                    let matching = uow
                        .tags
                        .get_all()
                        .await
                        .expect("get_all should succeed")
                        .into_iter()
                        .filter(|t| t.name == name)
                        .count();
                    prop_assert_eq!(matching, 1);

                    Ok(())
                });
                result?;
            }
        }
    }
}
