//! Sweep scheduling with daily cadence and jitter

use chrono::{DateTime, Duration, Local, NaiveDate};
use rand::Rng;

use super::config::ReaperConfig;

/// Computes the next sweep instant
///
/// The target is today at the configured hour local time, or tomorrow's if
/// that has already passed, plus a uniformly distributed jitter of
/// ±`jitter_minutes` drawn from the worker's own generator. Jitter keeps
/// the fleet's sweeps from landing on the store at the same instant.
///
/// # Arguments
///
/// * `now` - The instant to schedule from
/// * `config` - Reaper configuration supplying hour and jitter window
/// * `rng` - The per-worker random generator
pub fn next_sweep_time<R: Rng>(
    now: DateTime<Local>,
    config: &ReaperConfig,
    rng: &mut R,
) -> DateTime<Local> {
    let mut next = local_at_hour(now.date_naive(), config.sweep_hour);
    if next <= now {
        next = local_at_hour(now.date_naive() + Duration::days(1), config.sweep_hour);
    }

    let window_secs = config.jitter_minutes * 60;
    let jitter = rng.gen_range(-window_secs..=window_secs);

    next + Duration::seconds(jitter)
}

/// Resolves a local wall-clock hour on the given date
///
/// The target hour may not exist on a DST transition day; the next
/// representable hour is used instead.
fn local_at_hour(date: NaiveDate, hour: u32) -> DateTime<Local> {
    for h in hour..hour + 3 {
        if let Some(resolved) = date
            .and_hms_opt(h, 0, 0)
            .and_then(|naive| naive.and_local_timezone(Local).earliest())
        {
            return resolved;
        }
    }
    Local::now() + Duration::days(1)
}
