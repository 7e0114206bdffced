//! Mock implementation of AuthorizationRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::authorization::Authorization;
use crate::errors::{DomainError, DomainResult};

use super::r#trait::AuthorizationRepository;

/// Mock authorization repository for testing
#[derive(Clone, Default)]
pub struct MockAuthorizationRepository {
    entries: Arc<RwLock<HashMap<String, Authorization>>>,
}

impl MockAuthorizationRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store is empty
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl AuthorizationRepository for MockAuthorizationRepository {
    async fn save(&self, authorization: Authorization) -> DomainResult<Authorization> {
        let mut entries = self.entries.write().await;

        if entries.contains_key(&authorization.jti) {
            return Err(DomainError::Persistence {
                message: "Authorization already exists".to_string(),
            });
        }

        entries.insert(authorization.jti.clone(), authorization.clone());
        Ok(authorization)
    }

    async fn find_active(
        &self,
        client_id: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Vec<Authorization>> {
        let entries = self.entries.read().await;
        Ok(entries
            .values()
            .filter(|a| a.client_id == client_id && a.has_live_refresh(now))
            .cloned()
            .collect())
    }

    async fn delete_refresh_expired(&self, now: DateTime<Utc>) -> DomainResult<usize> {
        let mut entries = self.entries.write().await;
        let initial_count = entries.len();

        entries.retain(|_, a| a.has_live_refresh(now));

        Ok(initial_count - entries.len())
    }
}
