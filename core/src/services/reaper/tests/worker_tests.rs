//! Unit tests for the reaper worker loop

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::watch;

use chrono::{Local, Timelike};

use crate::errors::DomainError;
use crate::services::reaper::service::run_worker;
use crate::services::reaper::{ReaperConfig, SweepReport};

/// A sweep hour roughly half a day away, so the first timer wait is never
/// already elapsed when the test starts.
fn distant_sweep_config() -> ReaperConfig {
    ReaperConfig {
        sweep_hour: (Local::now().hour() + 12) % 24,
        ..ReaperConfig::default()
    }
}

#[tokio::test(start_paused = true)]
async fn test_worker_loops_across_days() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let counted = Arc::clone(&calls);
    let handle = tokio::spawn(run_worker(
        "test",
        ReaperConfig::default(),
        shutdown_rx,
        StdRng::seed_from_u64(7),
        move || {
            let calls = Arc::clone(&counted);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(SweepReport::default())
            }
        },
    ));

    // Virtual time: several daily ticks elapse under the paused clock.
    tokio::time::sleep(StdDuration::from_secs(3 * 86_400)).await;
    assert!(calls.load(Ordering::SeqCst) >= 2);

    shutdown_tx.send(true).unwrap();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_worker_survives_sweep_failures() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let counted = Arc::clone(&calls);
    let handle = tokio::spawn(run_worker(
        "test",
        ReaperConfig::default(),
        shutdown_rx,
        StdRng::seed_from_u64(11),
        move || {
            let calls = Arc::clone(&counted);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<SweepReport, DomainError>(DomainError::Internal {
                    message: "sweep refused".to_string(),
                })
            }
        },
    ));

    tokio::time::sleep(StdDuration::from_secs(3 * 86_400)).await;

    // Failures abort only their own iteration; the loop keeps scheduling.
    assert!(calls.load(Ordering::SeqCst) >= 2);

    shutdown_tx.send(true).unwrap();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_stops_worker_during_timer_wait() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let counted = Arc::clone(&calls);
    let handle = tokio::spawn(run_worker(
        "test",
        distant_sweep_config(),
        shutdown_rx,
        StdRng::seed_from_u64(13),
        move || {
            let calls = Arc::clone(&counted);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(SweepReport::default())
            }
        },
    ));

    // Let the worker reach its timer wait, then signal shutdown without
    // advancing to the sweep target.
    tokio::task::yield_now().await;
    shutdown_tx.send(true).unwrap();
    handle.await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
