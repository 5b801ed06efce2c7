use std::time::Duration;

use crate::config::{RunConfig, TrafficMode};

const DRIP_FLOOR_SECS: f64 = 0.1;
const BOT_DEFAULT_SECS: f64 = 10.0;
const MIXED_DEFAULT_SECS: f64 = 0.3;

/// Worker layout and pacing derived from a [`RunConfig`].
///
/// `workers * per_worker` is the number of attempts actually issued. It can differ
/// from the configured total when the division is not exact, and exceeds it when
/// there are more workers than requests (every worker sends at least once).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionPlan {
    pub workers: u64,
    pub per_worker: u64,
    pub delay: Duration,
}

impl ExecutionPlan {
    pub fn for_config(cfg: &RunConfig) -> Self {
        let (workers, per_worker) = split_requests(cfg.concurrency, cfg.total_requests);
        Self {
            workers,
            per_worker,
            delay: delay_for(cfg.mode, cfg.interval),
        }
    }

    pub fn total_attempts(&self) -> u64 {
        self.workers.saturating_mul(self.per_worker)
    }
}

/// Seconds each worker waits between two of its requests.
pub fn delay_secs(mode: TrafficMode, interval: f64) -> f64 {
    match mode {
        TrafficMode::Burst => 0.0,
        TrafficMode::Drip => DRIP_FLOOR_SECS.max(interval),
        TrafficMode::Bot => {
            if interval > 0.0 {
                interval
            } else {
                BOT_DEFAULT_SECS
            }
        }
        TrafficMode::Mixed => {
            if interval > 0.0 {
                interval
            } else {
                MIXED_DEFAULT_SECS
            }
        }
    }
}

pub fn delay_for(mode: TrafficMode, interval: f64) -> Duration {
    let secs = delay_secs(mode, interval);
    // Validation rejects intervals that do not fit a Duration.
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

/// `(workers, per_worker)` with `per_worker = max(1, total / workers)`.
pub fn split_requests(concurrency: u64, total_requests: u64) -> (u64, u64) {
    let workers = concurrency.max(1);
    let per_worker = (total_requests / workers).max(1);
    (workers, per_worker)
}
