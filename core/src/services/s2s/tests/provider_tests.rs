//! Unit tests for the cached service-token provider

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::domain::entities::authorization::{Authorization, ServiceCredential};
use crate::domain::entities::refresh::RefreshRecord;
use crate::errors::{DomainError, DomainResult};
use crate::repositories::{
    AuthorizationRepository, MockAuthorizationRepository, MockRefreshTokenRepository,
    RefreshTokenRepository,
};
use crate::services::s2s::provider::hash_token;
use crate::services::s2s::{AuthGateway, AuthorizationGrant, S2sTokenProvider};

/// Mock gateway counting remote calls
struct MockGateway {
    logins: AtomicUsize,
    refreshes: AtomicUsize,
    token_ttl_secs: i64,
}

impl MockGateway {
    fn new() -> Self {
        Self {
            logins: AtomicUsize::new(0),
            refreshes: AtomicUsize::new(0),
            token_ttl_secs: 60,
        }
    }

    fn grant(&self, token: &str) -> AuthorizationGrant {
        let now = Utc::now();
        AuthorizationGrant {
            service_token: token.to_string(),
            token_expires: now + Duration::seconds(self.token_ttl_secs),
            refresh_token: format!("ref-for-{token}"),
            refresh_expires: now + Duration::seconds(3600),
        }
    }
}

#[async_trait]
impl AuthGateway for MockGateway {
    async fn login(&self, _credential: &ServiceCredential) -> DomainResult<AuthorizationGrant> {
        let n = self.logins.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(self.grant(&format!("tok-{n}")))
    }

    async fn refresh(&self, _refresh_token: &str) -> DomainResult<AuthorizationGrant> {
        let n = self.refreshes.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(self.grant(&format!("refreshed-{n}")))
    }
}

fn provider(
    authorizations: Arc<MockAuthorizationRepository>,
    refresh_records: Arc<MockRefreshTokenRepository>,
    gateway: Arc<MockGateway>,
) -> S2sTokenProvider<MockAuthorizationRepository, MockRefreshTokenRepository, Arc<MockGateway>> {
    S2sTokenProvider::new(
        authorizations,
        refresh_records,
        gateway,
        ServiceCredential::new("c1", "s1"),
    )
}

fn cached_entry(
    client_id: &str,
    token: &str,
    token_expires: DateTime<Utc>,
    refresh_expires: DateTime<Utc>,
) -> Authorization {
    Authorization::new(client_id, token, token_expires, "ref-1", refresh_expires)
}

#[tokio::test]
async fn test_first_call_logs_in_and_second_hits_cache() {
    let authorizations = Arc::new(MockAuthorizationRepository::new());
    let refresh_records = Arc::new(MockRefreshTokenRepository::new());
    let gateway = Arc::new(MockGateway::new());
    let provider = provider(authorizations.clone(), refresh_records, gateway.clone());

    let token = provider.get_service_token().await.unwrap();
    assert_eq!(token, "tok-1");
    assert_eq!(gateway.logins.load(Ordering::SeqCst), 1);

    // Give the fire-and-forget persistence task a chance to run.
    tokio::time::sleep(StdDuration::from_millis(50)).await;
    assert_eq!(authorizations.len().await, 1);

    let token = provider.get_service_token().await.unwrap();
    assert_eq!(token, "tok-1");
    assert_eq!(gateway.logins.load(Ordering::SeqCst), 1);
    assert_eq!(gateway.refreshes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_cache_hit_makes_no_remote_calls() {
    let authorizations = Arc::new(MockAuthorizationRepository::new());
    let refresh_records = Arc::new(MockRefreshTokenRepository::new());
    let gateway = Arc::new(MockGateway::new());

    let now = Utc::now();
    authorizations
        .save(cached_entry(
            "c1",
            "cached-tok",
            now + Duration::seconds(60),
            now + Duration::seconds(3600),
        ))
        .await
        .unwrap();

    let provider = provider(authorizations, refresh_records, gateway.clone());

    let token = provider.get_service_token().await.unwrap();
    assert_eq!(token, "cached-tok");
    assert_eq!(gateway.logins.load(Ordering::SeqCst), 0);
    assert_eq!(gateway.refreshes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_expired_token_with_live_refresh_takes_refresh_path() {
    let authorizations = Arc::new(MockAuthorizationRepository::new());
    let refresh_records = Arc::new(MockRefreshTokenRepository::new());
    let gateway = Arc::new(MockGateway::new());

    let now = Utc::now();
    authorizations
        .save(cached_entry(
            "c1",
            "stale-tok",
            now - Duration::seconds(10),
            now + Duration::seconds(3600),
        ))
        .await
        .unwrap();

    let provider = provider(authorizations.clone(), refresh_records, gateway.clone());

    let token = provider.get_service_token().await.unwrap();
    assert_eq!(token, "refreshed-1");
    assert_eq!(gateway.refreshes.load(Ordering::SeqCst), 1);
    assert_eq!(gateway.logins.load(Ordering::SeqCst), 0);

    // The refreshed grant supersedes the old row rather than updating it.
    tokio::time::sleep(StdDuration::from_millis(50)).await;
    assert_eq!(authorizations.len().await, 2);
}

#[tokio::test]
async fn test_revoked_refresh_record_falls_back_to_login() {
    let authorizations = Arc::new(MockAuthorizationRepository::new());
    let refresh_records = Arc::new(MockRefreshTokenRepository::new());
    let gateway = Arc::new(MockGateway::new());

    let now = Utc::now();
    authorizations
        .save(cached_entry(
            "c1",
            "stale-tok",
            now - Duration::seconds(10),
            now + Duration::seconds(3600),
        ))
        .await
        .unwrap();

    let mut record = RefreshRecord::new(hash_token("ref-1"), "c1");
    record.revoke();
    refresh_records.save(record).await.unwrap();

    let provider = provider(authorizations, refresh_records, gateway.clone());

    let token = provider.get_service_token().await.unwrap();
    assert_eq!(token, "tok-1");
    assert_eq!(gateway.refreshes.load(Ordering::SeqCst), 0);
    assert_eq!(gateway.logins.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_no_cached_state_for_other_client() {
    let authorizations = Arc::new(MockAuthorizationRepository::new());
    let refresh_records = Arc::new(MockRefreshTokenRepository::new());
    let gateway = Arc::new(MockGateway::new());

    let now = Utc::now();
    authorizations
        .save(cached_entry(
            "other-client",
            "other-tok",
            now + Duration::seconds(60),
            now + Duration::seconds(3600),
        ))
        .await
        .unwrap();

    let provider = provider(authorizations, refresh_records, gateway.clone());

    let token = provider.get_service_token().await.unwrap();
    assert_eq!(token, "tok-1");
    assert_eq!(gateway.logins.load(Ordering::SeqCst), 1);
}

/// Repository whose writes always fail, to prove persistence failures are
/// swallowed
#[derive(Default)]
struct WriteFailingRepository;

#[async_trait]
impl AuthorizationRepository for WriteFailingRepository {
    async fn save(&self, _authorization: Authorization) -> DomainResult<Authorization> {
        Err(DomainError::Persistence {
            message: "write refused".to_string(),
        })
    }

    async fn find_active(
        &self,
        _client_id: &str,
        _now: DateTime<Utc>,
    ) -> DomainResult<Vec<Authorization>> {
        Ok(Vec::new())
    }

    async fn delete_refresh_expired(&self, _now: DateTime<Utc>) -> DomainResult<usize> {
        Ok(0)
    }
}

#[tokio::test]
async fn test_persistence_failure_is_not_surfaced() {
    let authorizations = Arc::new(WriteFailingRepository);
    let refresh_records = Arc::new(MockRefreshTokenRepository::new());
    let gateway = Arc::new(MockGateway::new());

    let provider = S2sTokenProvider::new(
        authorizations,
        refresh_records,
        gateway.clone(),
        ServiceCredential::new("c1", "s1"),
    );

    // The token was already obtained, so the failed write must not fail
    // the call.
    let token = provider.get_service_token().await.unwrap();
    assert_eq!(token, "tok-1");

    tokio::time::sleep(StdDuration::from_millis(50)).await;

    // Every call takes the login path again; the cache never heals but
    // correctness holds.
    let token = provider.get_service_token().await.unwrap();
    assert_eq!(token, "tok-2");
}
