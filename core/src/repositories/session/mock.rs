//! Mock implementation of SessionRepository for testing
//!
//! Besides storing rows in memory, the mock records every mutating call in
//! an operation log so tests can assert the xrefs-before-parents ordering
//! invariant of the reaper sweeps.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::session::{
    AccessTokenRecord, OauthFlow, Session, SessionAccessXref, SessionOauthXref,
};
use crate::errors::DomainResult;

use super::r#trait::SessionRepository;

#[derive(Default)]
struct State {
    sessions: HashMap<Uuid, Session>,
    flows: HashMap<Uuid, OauthFlow>,
    tokens: HashMap<Uuid, AccessTokenRecord>,
    access_xrefs: HashMap<Uuid, SessionAccessXref>,
    oauth_xrefs: HashMap<Uuid, SessionOauthXref>,
    op_log: Vec<String>,
}

/// Mock session repository for testing
#[derive(Clone, Default)]
pub struct MockSessionRepository {
    state: Arc<RwLock<State>>,
}

impl MockSessionRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a session row
    pub async fn insert_session(&self, session: Session) {
        self.state.write().await.sessions.insert(session.id, session);
    }

    /// Seed an OAuth flow row
    pub async fn insert_flow(&self, flow: OauthFlow) {
        self.state.write().await.flows.insert(flow.id, flow);
    }

    /// Seed an access token row
    pub async fn insert_access_token(&self, token: AccessTokenRecord) {
        self.state.write().await.tokens.insert(token.id, token);
    }

    /// Seed a session↔access-token xref row
    pub async fn insert_access_xref(&self, xref: SessionAccessXref) {
        self.state.write().await.access_xrefs.insert(xref.id, xref);
    }

    /// Seed a session↔OAuth-flow xref row
    pub async fn insert_oauth_xref(&self, xref: SessionOauthXref) {
        self.state.write().await.oauth_xrefs.insert(xref.id, xref);
    }

    /// Snapshot of the mutating-operation log, in call order
    pub async fn op_log(&self) -> Vec<String> {
        self.state.read().await.op_log.clone()
    }

    /// Remaining access token row count
    pub async fn access_token_count(&self) -> usize {
        self.state.read().await.tokens.len()
    }

    /// Remaining access xref row count
    pub async fn access_xref_count(&self) -> usize {
        self.state.read().await.access_xrefs.len()
    }

    /// Remaining session row count
    pub async fn session_count(&self) -> usize {
        self.state.read().await.sessions.len()
    }

    /// Remaining OAuth flow row count
    pub async fn flow_count(&self) -> usize {
        self.state.read().await.flows.len()
    }
}

#[async_trait]
impl SessionRepository for MockSessionRepository {
    async fn find_expired_access_token_xrefs(
        &self,
        now: DateTime<Utc>,
    ) -> DomainResult<Vec<SessionAccessXref>> {
        let state = self.state.read().await;
        Ok(state
            .access_xrefs
            .values()
            .filter(|x| {
                state
                    .tokens
                    .get(&x.token_id)
                    .is_some_and(|t| t.refresh_expires_at <= now)
            })
            .copied()
            .collect())
    }

    async fn delete_access_token_xref(&self, id: Uuid) -> DomainResult<()> {
        let mut state = self.state.write().await;
        state.access_xrefs.remove(&id);
        state.op_log.push(format!("delete_access_token_xref:{id}"));
        Ok(())
    }

    async fn delete_expired_access_tokens(&self, now: DateTime<Utc>) -> DomainResult<usize> {
        let mut state = self.state.write().await;
        let initial_count = state.tokens.len();

        state.tokens.retain(|_, t| t.refresh_expires_at > now);
        state.op_log.push("delete_expired_access_tokens".to_string());

        Ok(initial_count - state.tokens.len())
    }

    async fn find_stale_session_access_xrefs(
        &self,
        cutoff: DateTime<Utc>,
    ) -> DomainResult<Vec<SessionAccessXref>> {
        let state = self.state.read().await;
        Ok(state
            .access_xrefs
            .values()
            .filter(|x| {
                state
                    .sessions
                    .get(&x.session_id)
                    .is_some_and(|s| s.created_at <= cutoff)
            })
            .copied()
            .collect())
    }

    async fn find_stale_session_oauth_xrefs(
        &self,
        cutoff: DateTime<Utc>,
    ) -> DomainResult<Vec<SessionOauthXref>> {
        let state = self.state.read().await;
        Ok(state
            .oauth_xrefs
            .values()
            .filter(|x| {
                state
                    .sessions
                    .get(&x.session_id)
                    .is_some_and(|s| s.created_at <= cutoff)
            })
            .copied()
            .collect())
    }

    async fn delete_session_oauth_xref(&self, id: Uuid) -> DomainResult<()> {
        let mut state = self.state.write().await;
        state.oauth_xrefs.remove(&id);
        state.op_log.push(format!("delete_session_oauth_xref:{id}"));
        Ok(())
    }

    async fn delete_orphaned_oauth_flows(&self) -> DomainResult<usize> {
        let mut state = self.state.write().await;
        let initial_count = state.flows.len();

        let referenced: Vec<Uuid> = state.oauth_xrefs.values().map(|x| x.flow_id).collect();
        state.flows.retain(|id, _| referenced.contains(id));
        state.op_log.push("delete_orphaned_oauth_flows".to_string());

        Ok(initial_count - state.flows.len())
    }

    async fn delete_orphaned_sessions(&self) -> DomainResult<usize> {
        let mut state = self.state.write().await;
        let initial_count = state.sessions.len();

        let referenced: Vec<Uuid> = state
            .access_xrefs
            .values()
            .map(|x| x.session_id)
            .chain(state.oauth_xrefs.values().map(|x| x.session_id))
            .collect();
        state.sessions.retain(|id, _| referenced.contains(id));
        state.op_log.push("delete_orphaned_sessions".to_string());

        Ok(initial_count - state.sessions.len())
    }
}
