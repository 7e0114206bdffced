//! Mock implementation of AuthCodeRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::session::{AuthCode, AuthCodeAccountXref};
use crate::errors::DomainResult;

use super::r#trait::AuthCodeRepository;

#[derive(Default)]
struct State {
    codes: HashMap<Uuid, AuthCode>,
    xrefs: HashMap<Uuid, AuthCodeAccountXref>,
    op_log: Vec<String>,
}

/// Mock authorization code repository for testing
#[derive(Clone, Default)]
pub struct MockAuthCodeRepository {
    state: Arc<RwLock<State>>,
}

impl MockAuthCodeRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an authorization code row
    pub async fn insert_code(&self, code: AuthCode) {
        self.state.write().await.codes.insert(code.id, code);
    }

    /// Seed an authcode↔account xref row
    pub async fn insert_xref(&self, xref: AuthCodeAccountXref) {
        self.state.write().await.xrefs.insert(xref.id, xref);
    }

    /// Snapshot of the mutating-operation log, in call order
    pub async fn op_log(&self) -> Vec<String> {
        self.state.read().await.op_log.clone()
    }

    /// Remaining code row count
    pub async fn code_count(&self) -> usize {
        self.state.read().await.codes.len()
    }

    /// Remaining xref row count
    pub async fn xref_count(&self) -> usize {
        self.state.read().await.xrefs.len()
    }
}

#[async_trait]
impl AuthCodeRepository for MockAuthCodeRepository {
    async fn delete_account_xrefs_for_expired(
        &self,
        cutoff: DateTime<Utc>,
    ) -> DomainResult<usize> {
        let mut state = self.state.write().await;
        let initial_count = state.xrefs.len();

        let expired: Vec<Uuid> = state
            .codes
            .values()
            .filter(|c| c.created_at <= cutoff)
            .map(|c| c.id)
            .collect();
        state.xrefs.retain(|_, x| !expired.contains(&x.code_id));
        state
            .op_log
            .push("delete_account_xrefs_for_expired".to_string());

        Ok(initial_count - state.xrefs.len())
    }

    async fn delete_expired_codes(&self, cutoff: DateTime<Utc>) -> DomainResult<usize> {
        let mut state = self.state.write().await;
        let initial_count = state.codes.len();

        state.codes.retain(|_, c| c.created_at > cutoff);
        state.op_log.push("delete_expired_codes".to_string());

        Ok(initial_count - state.codes.len())
    }
}
