//! Auth service
//!
//! Issues signed bearer tokens for authenticated authors. The token carries
//! the author's id and email; verifying and consuming it on requests is the
//! HTTP layer's job, though `verify_token` is provided for it and for tests.

use anyhow::Context;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::config::AuthConfig;
use crate::models::Author;

use super::{AuthorService, ServiceError};

/// Claims carried by an issued token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Author id
    pub sub: String,
    /// Author email
    pub email: String,
    /// Issued-at, unix seconds
    pub iat: i64,
    /// Expiration, unix seconds
    pub exp: i64,
}

/// Auth service issuing bearer tokens
pub struct AuthService {
    authors: AuthorService,
    secret: String,
    token_expiration_hours: i64,
}

impl AuthService {
    /// Create a new auth service.
    pub fn new(pool: SqlitePool, config: &AuthConfig) -> Self {
        Self {
            authors: AuthorService::new(pool),
            secret: config.jwt_secret.clone(),
            token_expiration_hours: config.token_expiration_hours,
        }
    }

    /// Authenticate with email and password, returning a signed token.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no author matches the credentials
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ServiceError> {
        let author = self.authors.get_by_credentials(email, password).await?;
        tracing::info!(author_id = author.id, "issuing token");
        self.create_token(&author)
    }

    /// Create a signed token for an already-authenticated author.
    pub fn create_token(&self, author: &Author) -> Result<String, ServiceError> {
        let now = Utc::now();
        let expiration = now + Duration::hours(self.token_expiration_hours);

        let claims = Claims {
            sub: author.id.to_string(),
            email: author.email.clone(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
        .context("Failed to sign token")?;

        Ok(token)
    }

    /// Verify a token and return its claims.
    pub fn verify_token(&self, token: &str) -> Result<Claims, ServiceError> {
        let validation = Validation::default();
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &validation,
        )
        .context("Failed to verify token")?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};
    use crate::models::RegisterAuthorInput;

    fn auth_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            token_expiration_hours: 2,
        }
    }

    async fn setup() -> SqlitePool {
        let pool = create_test_pool().await.expect("Failed to create pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        pool
    }

    async fn register_author(pool: &SqlitePool) -> Author {
        AuthorService::new(pool.clone())
            .register(RegisterAuthorInput {
                name: "Jane".to_string(),
                email: "jane@example.com".to_string(),
                password: "secret".to_string(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_login_issues_verifiable_token() {
        let pool = setup().await;
        let author = register_author(&pool).await;
        let service = AuthService::new(pool, &auth_config());

        let token = service.login("jane@example.com", "secret").await.unwrap();
        let claims = service.verify_token(&token).unwrap();

        assert_eq!(claims.sub, author.id.to_string());
        assert_eq!(claims.email, "jane@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn test_login_with_bad_credentials_fails() {
        let pool = setup().await;
        register_author(&pool).await;
        let service = AuthService::new(pool, &auth_config());

        let result = service.login("jane@example.com", "wrong").await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_token_from_other_secret_is_rejected() {
        let pool = setup().await;
        let author = register_author(&pool).await;

        let issuer = AuthService::new(pool.clone(), &auth_config());
        let token = issuer.create_token(&author).unwrap();

        let other = AuthService::new(
            pool,
            &AuthConfig {
                jwt_secret: "different-secret".to_string(),
                token_expiration_hours: 2,
            },
        );
        assert!(other.verify_token(&token).is_err());
    }

    #[tokio::test]
    async fn test_tampered_token_is_rejected() {
        let pool = setup().await;
        let author = register_author(&pool).await;
        let service = AuthService::new(pool, &auth_config());

        let mut token = service.create_token(&author).unwrap();
        token.push('x');
        assert!(service.verify_token(&token).is_err());
    }
}
