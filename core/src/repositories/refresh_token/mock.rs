//! Mock implementation of RefreshTokenRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::refresh::RefreshRecord;
use crate::errors::{DomainError, DomainResult};

use super::r#trait::RefreshTokenRepository;

/// Mock refresh token repository for testing
#[derive(Clone, Default)]
pub struct MockRefreshTokenRepository {
    records: Arc<RwLock<HashMap<String, RefreshRecord>>>,
}

impl MockRefreshTokenRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl RefreshTokenRepository for MockRefreshTokenRepository {
    async fn save(&self, record: RefreshRecord) -> DomainResult<RefreshRecord> {
        let mut records = self.records.write().await;

        if records.contains_key(&record.token_hash) {
            return Err(DomainError::Persistence {
                message: "Refresh record already exists".to_string(),
            });
        }

        records.insert(record.token_hash.clone(), record.clone());
        Ok(record)
    }

    async fn find_by_token_hash(&self, token_hash: &str) -> DomainResult<Option<RefreshRecord>> {
        let records = self.records.read().await;
        Ok(records.get(token_hash).cloned())
    }

    async fn revoke(&self, token_hash: &str) -> DomainResult<bool> {
        let mut records = self.records.write().await;

        if let Some(record) = records.get_mut(token_hash) {
            record.revoke();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn delete_created_before(&self, cutoff: DateTime<Utc>) -> DomainResult<usize> {
        let mut records = self.records.write().await;
        let initial_count = records.len();

        records.retain(|_, r| r.created_at > cutoff);

        Ok(initial_count - records.len())
    }
}
