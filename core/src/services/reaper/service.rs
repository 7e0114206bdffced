//! Expiry reaper sweeps and background workers

use std::future::Future;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Local, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{watch, Semaphore};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{error, info, warn};

use crate::domain::entities::refresh::REFRESH_RECORD_TTL_DAYS;
use crate::domain::entities::session::SessionAccessXref;
use crate::errors::{DomainError, DomainResult};
use crate::repositories::{
    AuthCodeRepository, AuthorizationRepository, RefreshTokenRepository, SessionRepository,
};

use super::config::ReaperConfig;
use super::schedule::next_sweep_time;

/// Fixed authorization code lifetime in minutes
///
/// Codes are single-use artifacts of the login flow; their TTL is not
/// governed by the hours-based session threshold.
pub const AUTH_CODE_TTL_MINUTES: i64 = 10;

/// Outcome of a single sweep
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    /// Cleanup category the sweep ran for
    pub category: &'static str,
    /// Cross-reference rows deleted
    pub xrefs_deleted: usize,
    /// Parent rows deleted
    pub rows_deleted: usize,
}

/// Scheduled reaper of expired tokens, sessions, flows, and codes
///
/// The reaper owns no data; it only deletes rows other components
/// created. Sweeps across categories are independent and idempotent, so
/// no mutual exclusion is needed between workers or consecutive ticks.
/// Within a sweep, xref deletions always complete before the parent
/// table's bulk delete so foreign-key constraints hold without a
/// transaction.
pub struct ExpiryReaper<A, R, S, C> {
    authorizations: Arc<A>,
    refresh_records: Arc<R>,
    sessions: Arc<S>,
    auth_codes: Arc<C>,
    config: ReaperConfig,
}

impl<A, R, S, C> Clone for ExpiryReaper<A, R, S, C> {
    fn clone(&self) -> Self {
        Self {
            authorizations: Arc::clone(&self.authorizations),
            refresh_records: Arc::clone(&self.refresh_records),
            sessions: Arc::clone(&self.sessions),
            auth_codes: Arc::clone(&self.auth_codes),
            config: self.config.clone(),
        }
    }
}

impl<A, R, S, C> ExpiryReaper<A, R, S, C>
where
    A: AuthorizationRepository + 'static,
    R: RefreshTokenRepository + 'static,
    S: SessionRepository + 'static,
    C: AuthCodeRepository + 'static,
{
    /// Creates a new reaper over the shared persistence collaborators
    pub fn new(
        authorizations: Arc<A>,
        refresh_records: Arc<R>,
        sessions: Arc<S>,
        auth_codes: Arc<C>,
        config: ReaperConfig,
    ) -> Self {
        Self {
            authorizations,
            refresh_records,
            sessions,
            auth_codes,
            config,
        }
    }

    /// Spawns one long-lived worker per cleanup category
    ///
    /// Each worker sleeps until its next jittered daily target, runs one
    /// sweep, and loops. The shutdown signal is honored both during the
    /// timer wait and before each sweep; a sweep failure is logged and
    /// aborts only that iteration.
    ///
    /// # Arguments
    ///
    /// * `shutdown` - Watch channel flipped to `true` to stop all workers
    ///
    /// # Returns
    ///
    /// Join handles for the five workers, in a fixed order
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> Vec<JoinHandle<()>> {
        let mut handles = Vec::with_capacity(5);

        let reaper = self.clone();
        handles.push(spawn_worker(
            "refresh_tokens",
            self.config.clone(),
            shutdown.clone(),
            move || {
                let reaper = reaper.clone();
                async move { reaper.sweep_refresh_tokens().await }
            },
        ));

        let reaper = self.clone();
        handles.push(spawn_worker(
            "access_tokens",
            self.config.clone(),
            shutdown.clone(),
            move || {
                let reaper = reaper.clone();
                async move { reaper.sweep_access_tokens().await }
            },
        ));

        let reaper = self.clone();
        handles.push(spawn_worker(
            "service_tokens",
            self.config.clone(),
            shutdown.clone(),
            move || {
                let reaper = reaper.clone();
                async move { reaper.sweep_service_tokens().await }
            },
        ));

        let reaper = self.clone();
        handles.push(spawn_worker(
            "sessions",
            self.config.clone(),
            shutdown.clone(),
            move || {
                let reaper = reaper.clone();
                async move { reaper.sweep_sessions().await }
            },
        ));

        let reaper = self.clone();
        handles.push(spawn_worker(
            "auth_codes",
            self.config.clone(),
            shutdown,
            move || {
                let reaper = reaper.clone();
                async move { reaper.sweep_auth_codes().await }
            },
        ));

        handles
    }

    /// Deletes refresh records past their computed TTL
    ///
    /// Expiry is recomputed as `created_at + REFRESH_RECORD_TTL_DAYS`,
    /// the same arithmetic the provider's usability check applies.
    pub async fn sweep_refresh_tokens(&self) -> DomainResult<SweepReport> {
        let cutoff = Utc::now() - Duration::days(REFRESH_RECORD_TTL_DAYS);
        let rows_deleted = self.refresh_records.delete_created_before(cutoff).await?;

        Ok(SweepReport {
            category: "refresh_tokens",
            xrefs_deleted: 0,
            rows_deleted,
        })
    }

    /// Deletes service token cache entries whose refresh window closed
    pub async fn sweep_service_tokens(&self) -> DomainResult<SweepReport> {
        let rows_deleted = self
            .authorizations
            .delete_refresh_expired(Utc::now())
            .await?;

        Ok(SweepReport {
            category: "service_tokens",
            xrefs_deleted: 0,
            rows_deleted,
        })
    }

    /// Deletes expired access tokens and their session xrefs
    ///
    /// Xref rows are deleted first, one bounded concurrent task per row,
    /// and all are awaited before the bulk delete of the token rows.
    pub async fn sweep_access_tokens(&self) -> DomainResult<SweepReport> {
        let now = Utc::now();

        let xrefs = self.sessions.find_expired_access_token_xrefs(now).await?;
        let xrefs_deleted = self.delete_access_xrefs(xrefs).await?;

        let rows_deleted = self.sessions.delete_expired_access_tokens(now).await?;

        Ok(SweepReport {
            category: "access_tokens",
            xrefs_deleted,
            rows_deleted,
        })
    }

    /// Deletes xrefs of stale sessions, then their orphaned parents
    ///
    /// Both xref fan-outs run concurrently and are joined before the
    /// parent deletes are spawned. The parent deletes themselves are
    /// deliberately not awaited: a later tick may overlap them, which is
    /// safe because deleting an absent row is a no-op.
    pub async fn sweep_sessions(&self) -> DomainResult<SweepReport> {
        let cutoff = Utc::now() - Duration::hours(self.config.session_max_age_hours);

        let (oauth_deleted, access_deleted) = tokio::join!(
            self.delete_stale_oauth_xrefs(cutoff),
            self.delete_stale_access_xrefs(cutoff),
        );
        let xrefs_deleted = oauth_deleted? + access_deleted?;

        let sessions = Arc::clone(&self.sessions);
        tokio::spawn(async move {
            if let Err(e) = sessions.delete_orphaned_oauth_flows().await {
                warn!("orphaned oauth flow delete failed: {}", e);
            }
        });
        let sessions = Arc::clone(&self.sessions);
        tokio::spawn(async move {
            if let Err(e) = sessions.delete_orphaned_sessions().await {
                warn!("orphaned session delete failed: {}", e);
            }
        });

        Ok(SweepReport {
            category: "sessions",
            xrefs_deleted,
            rows_deleted: 0,
        })
    }

    /// Deletes authorization codes past the fixed 10-minute TTL
    ///
    /// Account xrefs are deleted before the code rows.
    pub async fn sweep_auth_codes(&self) -> DomainResult<SweepReport> {
        let cutoff = Utc::now() - Duration::minutes(AUTH_CODE_TTL_MINUTES);

        let xrefs_deleted = self
            .auth_codes
            .delete_account_xrefs_for_expired(cutoff)
            .await?;
        let rows_deleted = self.auth_codes.delete_expired_codes(cutoff).await?;

        Ok(SweepReport {
            category: "auth_codes",
            xrefs_deleted,
            rows_deleted,
        })
    }

    /// Fan-out delete of session↔access-token xrefs, bounded by the
    /// configured concurrency
    async fn delete_access_xrefs(&self, xrefs: Vec<SessionAccessXref>) -> DomainResult<usize> {
        let semaphore = Arc::new(Semaphore::new(self.config.delete_concurrency));
        let mut tasks = JoinSet::new();

        for xref in xrefs {
            let sessions = Arc::clone(&self.sessions);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.map_err(|_| {
                    DomainError::Internal {
                        message: "delete semaphore closed".to_string(),
                    }
                })?;
                sessions.delete_access_token_xref(xref.id).await
            });
        }

        join_deletes(tasks).await
    }

    /// Fan-out delete of stale session↔OAuth-flow xrefs
    async fn delete_stale_oauth_xrefs(&self, cutoff: DateTime<Utc>) -> DomainResult<usize> {
        let xrefs = self.sessions.find_stale_session_oauth_xrefs(cutoff).await?;

        let semaphore = Arc::new(Semaphore::new(self.config.delete_concurrency));
        let mut tasks = JoinSet::new();

        for xref in xrefs {
            let sessions = Arc::clone(&self.sessions);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.map_err(|_| {
                    DomainError::Internal {
                        message: "delete semaphore closed".to_string(),
                    }
                })?;
                sessions.delete_session_oauth_xref(xref.id).await
            });
        }

        join_deletes(tasks).await
    }

    /// Fan-out delete of stale session↔access-token xrefs
    async fn delete_stale_access_xrefs(&self, cutoff: DateTime<Utc>) -> DomainResult<usize> {
        let xrefs = self
            .sessions
            .find_stale_session_access_xrefs(cutoff)
            .await?;
        self.delete_access_xrefs(xrefs).await
    }
}

/// Joins every delete task before reporting
///
/// All tasks are drained even after a failure so a parent delete never
/// starts while an xref delete is still in flight; the first error is
/// surfaced once the set is empty.
async fn join_deletes(mut tasks: JoinSet<DomainResult<()>>) -> DomainResult<usize> {
    let mut deleted = 0;
    let mut first_error = None;

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(())) => deleted += 1,
            Ok(Err(e)) => {
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
            Err(e) => {
                if first_error.is_none() {
                    first_error = Some(DomainError::Internal {
                        message: format!("delete task failed: {}", e),
                    });
                }
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(deleted),
    }
}

fn spawn_worker<F, Fut>(
    category: &'static str,
    config: ReaperConfig,
    shutdown: watch::Receiver<bool>,
    sweep: F,
) -> JoinHandle<()>
where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = DomainResult<SweepReport>> + Send + 'static,
{
    let rng = StdRng::from_entropy();
    tokio::spawn(run_worker(category, config, shutdown, rng, sweep))
}

/// The per-category worker loop
///
/// Runs for the process lifetime unless the shutdown signal flips: the
/// loop computes the next jittered target, waits, runs one sweep, and
/// starts over. No error state is carried from one cycle to the next.
pub(crate) async fn run_worker<F, Fut>(
    category: &'static str,
    config: ReaperConfig,
    mut shutdown: watch::Receiver<bool>,
    mut rng: StdRng,
    sweep: F,
) where
    F: Fn() -> Fut + Send,
    Fut: Future<Output = DomainResult<SweepReport>> + Send,
{
    info!(category, "expiry reaper worker started");

    loop {
        let now = Local::now();
        let next = next_sweep_time(now, &config, &mut rng);
        let wait = (next - now).to_std().unwrap_or(StdDuration::ZERO);

        tokio::select! {
            _ = tokio::time::sleep(wait) => {}
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
                continue;
            }
        }

        if *shutdown.borrow() {
            break;
        }

        match sweep().await {
            Ok(report) => info!(
                category,
                xrefs = report.xrefs_deleted,
                rows = report.rows_deleted,
                "sweep completed"
            ),
            Err(e) => error!(category, "sweep failed: {}", e),
        }
    }

    info!(category, "expiry reaper worker stopped");
}
