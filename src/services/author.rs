//! Author service
//!
//! Registration and CRUD for authors. Registration pre-checks the email
//! against every stored author and refuses duplicates; the store itself
//! carries no uniqueness constraint, so the pre-check is the only guard.

use anyhow::Context;
use sqlx::SqlitePool;

use crate::db::UnitOfWork;
use crate::models::{Author, RegisterAuthorInput};

use super::ServiceError;

/// Author service for managing registered authors
pub struct AuthorService {
    pool: SqlitePool,
}

impl AuthorService {
    /// Create a new author service on the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a new author.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the email is already registered
    pub async fn register(&self, input: RegisterAuthorInput) -> Result<Author, ServiceError> {
        let uow = UnitOfWork::begin(&self.pool).await?;

        // Linear scan; the author table stays small enough for this.
        let existing = uow
            .authors
            .get_all()
            .await
            .context("Failed to check registered emails")?;
        if existing.iter().any(|author| author.email == input.email) {
            return Err(ServiceError::Conflict(format!(
                "Email '{}' is already registered",
                input.email
            )));
        }

        let author = uow
            .authors
            .add(&Author::new(input.name, input.email, input.password))
            .await
            .context("Failed to create author")?;
        uow.save_changes().await?;

        tracing::info!(author_id = author.id, "registered author");
        Ok(author)
    }

    /// Get all authors.
    pub async fn get_all(&self) -> Result<Vec<Author>, ServiceError> {
        let uow = UnitOfWork::begin(&self.pool).await?;
        uow.authors
            .get_all()
            .await
            .context("Failed to list authors")
            .map_err(Into::into)
    }

    /// Get one author by id.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no author has the given id
    pub async fn get_by_id(&self, id: i64) -> Result<Author, ServiceError> {
        let uow = UnitOfWork::begin(&self.pool).await?;
        uow.authors
            .get_by_id(id)
            .await
            .context("Failed to get author")?
            .ok_or_else(|| ServiceError::NotFound(format!("Author with id {} not found", id)))
    }

    /// Get the author matching the given credentials.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no author matches; the boundary translates this into
    ///   an authentication failure
    pub async fn get_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Author, ServiceError> {
        let uow = UnitOfWork::begin(&self.pool).await?;
        uow.authors
            .get_by_email_and_password(email, password)
            .await
            .context("Failed to look up author by credentials")?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("No author matches credentials for '{}'", email))
            })
    }

    /// Update an existing author.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no author has the given id
    pub async fn update(&self, id: i64, input: RegisterAuthorInput) -> Result<Author, ServiceError> {
        let uow = UnitOfWork::begin(&self.pool).await?;
        let mut author = uow
            .authors
            .get_by_id(id)
            .await
            .context("Failed to get author")?
            .ok_or_else(|| ServiceError::NotFound(format!("Author with id {} not found", id)))?;

        author.name = input.name;
        author.email = input.email;
        author.password = input.password;
        uow.authors
            .update(&author)
            .await
            .context("Failed to update author")?;
        uow.save_changes().await?;

        Ok(author)
    }

    /// Delete an author.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no author has the given id
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let uow = UnitOfWork::begin(&self.pool).await?;
        uow.authors
            .get_by_id(id)
            .await
            .context("Failed to get author")?
            .ok_or_else(|| ServiceError::NotFound(format!("Author with id {} not found", id)))?;

        uow.authors
            .delete(id)
            .await
            .context("Failed to delete author")?;
        uow.save_changes().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> SqlitePool {
        let pool = create_test_pool().await.expect("Failed to create pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        pool
    }

    fn registration(name: &str, email: &str) -> RegisterAuthorInput {
        RegisterAuthorInput {
            name: name.to_string(),
            email: email.to_string(),
            password: "secret".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_creates_author() {
        let pool = setup().await;
        let service = AuthorService::new(pool);

        let author = service
            .register(registration("Jane", "jane@example.com"))
            .await
            .unwrap();

        assert!(author.id > 0);
        assert_eq!(author.email, "jane@example.com");
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let pool = setup().await;
        let service = AuthorService::new(pool);

        service
            .register(registration("Jane", "jane@example.com"))
            .await
            .unwrap();

        let result = service
            .register(registration("Impostor", "jane@example.com"))
            .await;
        assert!(matches!(result, Err(ServiceError::Conflict(_))));

        // The failed registration left nothing behind.
        let all = service.get_all().await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn test_get_by_credentials() {
        let pool = setup().await;
        let service = AuthorService::new(pool);

        service
            .register(registration("Jane", "jane@example.com"))
            .await
            .unwrap();

        let author = service
            .get_by_credentials("jane@example.com", "secret")
            .await
            .unwrap();
        assert_eq!(author.name, "Jane");

        let wrong = service
            .get_by_credentials("jane@example.com", "nope")
            .await;
        assert!(matches!(wrong, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let pool = setup().await;
        let service = AuthorService::new(pool);

        let result = service.get_by_id(999).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_rewrites_fields() {
        let pool = setup().await;
        let service = AuthorService::new(pool);

        let author = service
            .register(registration("Jane", "jane@example.com"))
            .await
            .unwrap();

        let updated = service
            .update(author.id, registration("Jane Doe", "doe@example.com"))
            .await
            .unwrap();
        assert_eq!(updated.name, "Jane Doe");

        let fetched = service.get_by_id(author.id).await.unwrap();
        assert_eq!(fetched.email, "doe@example.com");
    }

    #[tokio::test]
    async fn test_update_missing_author_is_not_found() {
        let pool = setup().await;
        let service = AuthorService::new(pool);

        let result = service
            .update(999, registration("Ghost", "ghost@example.com"))
            .await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_author() {
        let pool = setup().await;
        let service = AuthorService::new(pool);

        let author = service
            .register(registration("Jane", "jane@example.com"))
            .await
            .unwrap();
        service.delete(author.id).await.unwrap();

        let result = service.get_by_id(author.id).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }
}
