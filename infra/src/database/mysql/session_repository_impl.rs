//! MySQL implementation of the SessionRepository trait.
//!
//! Every delete here is idempotent; the reaper relies on that to overlap
//! sweeps safely without transactions or client-side locking.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use tk_core::domain::entities::session::{SessionAccessXref, SessionOauthXref};
use tk_core::errors::{DomainError, DomainResult};
use tk_core::repositories::SessionRepository;

/// MySQL implementation of SessionRepository
pub struct MySqlSessionRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlSessionRepository {
    /// Create a new MySQL session repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn scan_uuid(row: &MySqlRow, column: &str) -> DomainResult<Uuid> {
        let raw: String = row.try_get(column).map_err(|e| DomainError::Persistence {
            message: format!("Failed to get {}: {}", column, e),
        })?;
        Uuid::parse_str(&raw).map_err(|e| DomainError::Persistence {
            message: format!("Invalid {} UUID: {}", column, e),
        })
    }

    /// Convert a database row to a SessionAccessXref entity
    fn row_to_access_xref(row: &MySqlRow) -> DomainResult<SessionAccessXref> {
        Ok(SessionAccessXref {
            id: Self::scan_uuid(row, "id")?,
            session_id: Self::scan_uuid(row, "session_id")?,
            token_id: Self::scan_uuid(row, "token_id")?,
        })
    }

    /// Convert a database row to a SessionOauthXref entity
    fn row_to_oauth_xref(row: &MySqlRow) -> DomainResult<SessionOauthXref> {
        Ok(SessionOauthXref {
            id: Self::scan_uuid(row, "id")?,
            session_id: Self::scan_uuid(row, "session_id")?,
            flow_id: Self::scan_uuid(row, "flow_id")?,
        })
    }
}

#[async_trait]
impl SessionRepository for MySqlSessionRepository {
    async fn find_expired_access_token_xrefs(
        &self,
        now: DateTime<Utc>,
    ) -> DomainResult<Vec<SessionAccessXref>> {
        let query = r#"
            SELECT x.id, x.session_id, x.token_id
            FROM session_access_xrefs x
            INNER JOIN access_tokens t ON t.id = x.token_id
            WHERE t.refresh_expires_at <= ?
        "#;

        let rows = sqlx::query(query)
            .bind(now)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Persistence {
                message: format!("Failed to find expired access token xrefs: {}", e),
            })?;

        let mut xrefs = Vec::with_capacity(rows.len());
        for row in &rows {
            xrefs.push(Self::row_to_access_xref(row)?);
        }

        Ok(xrefs)
    }

    async fn delete_access_token_xref(&self, id: Uuid) -> DomainResult<()> {
        sqlx::query("DELETE FROM session_access_xrefs WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Persistence {
                message: format!("Failed to delete access token xref: {}", e),
            })?;

        Ok(())
    }

    async fn delete_expired_access_tokens(&self, now: DateTime<Utc>) -> DomainResult<usize> {
        let result = sqlx::query("DELETE FROM access_tokens WHERE refresh_expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Persistence {
                message: format!("Failed to delete expired access tokens: {}", e),
            })?;

        Ok(result.rows_affected() as usize)
    }

    async fn find_stale_session_access_xrefs(
        &self,
        cutoff: DateTime<Utc>,
    ) -> DomainResult<Vec<SessionAccessXref>> {
        let query = r#"
            SELECT x.id, x.session_id, x.token_id
            FROM session_access_xrefs x
            INNER JOIN sessions s ON s.id = x.session_id
            WHERE s.created_at <= ?
        "#;

        let rows = sqlx::query(query)
            .bind(cutoff)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Persistence {
                message: format!("Failed to find stale session access xrefs: {}", e),
            })?;

        let mut xrefs = Vec::with_capacity(rows.len());
        for row in &rows {
            xrefs.push(Self::row_to_access_xref(row)?);
        }

        Ok(xrefs)
    }

    async fn find_stale_session_oauth_xrefs(
        &self,
        cutoff: DateTime<Utc>,
    ) -> DomainResult<Vec<SessionOauthXref>> {
        let query = r#"
            SELECT x.id, x.session_id, x.flow_id
            FROM session_oauth_xrefs x
            INNER JOIN sessions s ON s.id = x.session_id
            WHERE s.created_at <= ?
        "#;

        let rows = sqlx::query(query)
            .bind(cutoff)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::Persistence {
                message: format!("Failed to find stale session oauth xrefs: {}", e),
            })?;

        let mut xrefs = Vec::with_capacity(rows.len());
        for row in &rows {
            xrefs.push(Self::row_to_oauth_xref(row)?);
        }

        Ok(xrefs)
    }

    async fn delete_session_oauth_xref(&self, id: Uuid) -> DomainResult<()> {
        sqlx::query("DELETE FROM session_oauth_xrefs WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Persistence {
                message: format!("Failed to delete session oauth xref: {}", e),
            })?;

        Ok(())
    }

    async fn delete_orphaned_oauth_flows(&self) -> DomainResult<usize> {
        let query = r#"
            DELETE f FROM oauth_flows f
            WHERE NOT EXISTS (
                SELECT 1 FROM session_oauth_xrefs x WHERE x.flow_id = f.id
            )
        "#;

        let result = sqlx::query(query)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Persistence {
                message: format!("Failed to delete orphaned oauth flows: {}", e),
            })?;

        Ok(result.rows_affected() as usize)
    }

    async fn delete_orphaned_sessions(&self) -> DomainResult<usize> {
        let query = r#"
            DELETE s FROM sessions s
            WHERE NOT EXISTS (
                SELECT 1 FROM session_access_xrefs a WHERE a.session_id = s.id
            )
            AND NOT EXISTS (
                SELECT 1 FROM session_oauth_xrefs o WHERE o.session_id = s.id
            )
        "#;

        let result = sqlx::query(query)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::Persistence {
                message: format!("Failed to delete orphaned sessions: {}", e),
            })?;

        Ok(result.rows_affected() as usize)
    }
}
