//! MySQL implementation of the AuthorizationRepository trait.
//!
//! This module persists the service-token cache. Rows are append-only:
//! the provider inserts superseding entries and only the reaper deletes
//! them, so no UPDATE statements exist here.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};

use tk_core::domain::entities::authorization::Authorization;
use tk_core::errors::{DomainError, DomainResult};
use tk_core::repositories::AuthorizationRepository;

/// MySQL implementation of AuthorizationRepository
pub struct MySqlAuthorizationRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlAuthorizationRepository {
    /// Create a new MySQL authorization repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to an Authorization entity
    fn row_to_authorization(row: &sqlx::mysql::MySqlRow) -> DomainResult<Authorization> {
        Ok(Authorization {
            jti: row.try_get("jti").map_err(|e| DomainError::Persistence {
                message: format!("Failed to get jti: {}", e),
            })?,
            client_id: row
                .try_get("client_id")
                .map_err(|e| DomainError::Persistence {
                    message: format!("Failed to get client_id: {}", e),
                })?,
            service_token: row
                .try_get("service_token")
                .map_err(|e| DomainError::Persistence {
                    message: format!("Failed to get service_token: {}", e),
                })?,
            token_expires: row
                .try_get::<DateTime<Utc>, _>("token_expires")
                .map_err(|e| DomainError::Persistence {
                    message: format!("Failed to get token_expires: {}", e),
                })?,
            refresh_token: row
                .try_get("refresh_token")
                .map_err(|e| DomainError::Persistence {
                    message: format!("Failed to get refresh_token: {}", e),
                })?,
            refresh_expires: row
                .try_get::<DateTime<Utc>, _>("refresh_expires")
                .map_err(|e| DomainError::Persistence {
                    message: format!("Failed to get refresh_expires: {}", e),
                })?,
        })
    }
}

#[async_trait]
impl AuthorizationRepository for MySqlAuthorizationRepository {
    async fn save(&self, authorization: Authorization) -> DomainResult<Authorization> {
        let query = r#"
            INSERT INTO authorizations (
                jti, client_id, service_token, token_expires, refresh_token, refresh_expires
            ) VALUES (?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(&authorization.jti)
            .bind(&authorization.client_id)
            .bind(&authorization.service_token)
            .bind(authorization.token_expires)
            .bind(&authorization.refresh_token)
            .bind(authorization.refresh_expires)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Persistence {
                message: format!("Failed to save authorization: {}", e),
            })?;

        Ok(authorization)
    }

    async fn find_active(
        &self,
        client_id: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Vec<Authorization>> {
        let query = r#"
            SELECT jti, client_id, service_token, token_expires, refresh_token, refresh_expires
            FROM authorizations
            WHERE client_id = ? AND refresh_expires > ?
        "#;

        let rows = sqlx::query(query)
            .bind(client_id)
            .bind(now)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Persistence {
                message: format!("Failed to find active authorizations: {}", e),
            })?;

        let mut authorizations = Vec::with_capacity(rows.len());
        for row in &rows {
            authorizations.push(Self::row_to_authorization(row)?);
        }

        Ok(authorizations)
    }

    async fn delete_refresh_expired(&self, now: DateTime<Utc>) -> DomainResult<usize> {
        let query = "DELETE FROM authorizations WHERE refresh_expires <= ?";

        let result = sqlx::query(query)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Persistence {
                message: format!("Failed to delete expired authorizations: {}", e),
            })?;

        Ok(result.rows_affected() as usize)
    }
}
