//! MySQL implementation of the AuthCodeRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;

use tk_core::errors::{DomainError, DomainResult};
use tk_core::repositories::AuthCodeRepository;

/// MySQL implementation of AuthCodeRepository
pub struct MySqlAuthCodeRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlAuthCodeRepository {
    /// Create a new MySQL auth code repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthCodeRepository for MySqlAuthCodeRepository {
    async fn delete_account_xrefs_for_expired(
        &self,
        cutoff: DateTime<Utc>,
    ) -> DomainResult<usize> {
        let query = r#"
            DELETE x FROM auth_code_account_xrefs x
            INNER JOIN auth_codes c ON c.id = x.code_id
            WHERE c.created_at <= ?
        "#;

        let result = sqlx::query(query)
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Persistence {
                message: format!("Failed to delete auth code xrefs: {}", e),
            })?;

        Ok(result.rows_affected() as usize)
    }

    async fn delete_expired_codes(&self, cutoff: DateTime<Utc>) -> DomainResult<usize> {
        let result = sqlx::query("DELETE FROM auth_codes WHERE created_at <= ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Persistence {
                message: format!("Failed to delete expired auth codes: {}", e),
            })?;

        Ok(result.rows_affected() as usize)
    }
}
