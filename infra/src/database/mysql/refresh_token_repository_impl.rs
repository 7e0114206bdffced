//! MySQL implementation of the RefreshTokenRepository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use tk_core::domain::entities::refresh::RefreshRecord;
use tk_core::errors::{DomainError, DomainResult};
use tk_core::repositories::RefreshTokenRepository;

/// MySQL implementation of RefreshTokenRepository
///
/// Rows carry no expiry column; readers derive expiry from `created_at`,
/// and the reaper deletes by a creation-time cutoff.
pub struct MySqlRefreshTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlRefreshTokenRepository {
    /// Create a new MySQL refresh token repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert a database row to a RefreshRecord entity
    fn row_to_record(row: &sqlx::mysql::MySqlRow) -> DomainResult<RefreshRecord> {
        let id: String = row.try_get("id").map_err(|e| DomainError::Persistence {
            message: format!("Failed to get id: {}", e),
        })?;

        Ok(RefreshRecord {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Persistence {
                message: format!("Invalid record UUID: {}", e),
            })?,
            token_hash: row
                .try_get("token_hash")
                .map_err(|e| DomainError::Persistence {
                    message: format!("Failed to get token_hash: {}", e),
                })?,
            owner_id: row
                .try_get("owner_id")
                .map_err(|e| DomainError::Persistence {
                    message: format!("Failed to get owner_id: {}", e),
                })?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| DomainError::Persistence {
                    message: format!("Failed to get created_at: {}", e),
                })?,
            revoked: row
                .try_get("revoked")
                .map_err(|e| DomainError::Persistence {
                    message: format!("Failed to get revoked: {}", e),
                })?,
        })
    }
}

#[async_trait]
impl RefreshTokenRepository for MySqlRefreshTokenRepository {
    async fn save(&self, record: RefreshRecord) -> DomainResult<RefreshRecord> {
        let check_query =
            "SELECT EXISTS(SELECT 1 FROM refresh_tokens WHERE token_hash = ?) as already_stored";
        let exists_row = sqlx::query(check_query)
            .bind(&record.token_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::Persistence {
                message: format!("Failed to check record existence: {}", e),
            })?;

        let exists: i64 = exists_row
            .try_get("already_stored")
            .map_err(|e| DomainError::Persistence {
                message: format!("Failed to get existence result: {}", e),
            })?;

        if exists == 1 {
            return Err(DomainError::Persistence {
                message: "Refresh record already exists".to_string(),
            });
        }

        let query = r#"
            INSERT INTO refresh_tokens (
                id, token_hash, owner_id, created_at, revoked
            ) VALUES (?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(record.id.to_string())
            .bind(&record.token_hash)
            .bind(&record.owner_id)
            .bind(record.created_at)
            .bind(record.revoked)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Persistence {
                message: format!("Failed to save refresh record: {}", e),
            })?;

        Ok(record)
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> DomainResult<Option<RefreshRecord>> {
        let query = r#"
            SELECT id, token_hash, owner_id, created_at, revoked
            FROM refresh_tokens
            WHERE token_hash = ?
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::Persistence {
                message: format!("Failed to find refresh record: {}", e),
            })?;

        match result {
            Some(row) => Ok(Some(Self::row_to_record(&row)?)),
            None => Ok(None),
        }
    }

    async fn revoke(&self, token_hash: &str) -> DomainResult<bool> {
        let query = r#"
            UPDATE refresh_tokens
            SET revoked = TRUE
            WHERE token_hash = ? AND revoked = FALSE
        "#;

        let result = sqlx::query(query)
            .bind(token_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Persistence {
                message: format!("Failed to revoke refresh record: {}", e),
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_created_before(&self, cutoff: DateTime<Utc>) -> DomainResult<usize> {
        let query = "DELETE FROM refresh_tokens WHERE created_at <= ?";

        let result = sqlx::query(query)
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Persistence {
                message: format!("Failed to delete expired refresh records: {}", e),
            })?;

        Ok(result.rows_affected() as usize)
    }
}
