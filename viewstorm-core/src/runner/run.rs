use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tokio::time::MissedTickBehavior;
use viewstorm_http::HttpClient;

use crate::config::RunConfig;
use crate::identity::{IdentityPools, IdentityRandomizer};
use crate::plan::ExecutionPlan;
use crate::summary::{LatencyRecorder, ResultSummary, RunReport};
use crate::target::Target;

use super::attempt::RequestTemplate;
use super::error::Result;
use super::progress::{ProgressFn, ProgressUpdate};
use super::stop::StopSignal;
use super::worker::Worker;

/// Optional collaborators of a run.
#[derive(Clone, Default)]
pub struct RunOptions {
    /// User-agent pools; the built-in pools when `None`.
    pub pools: Option<Arc<IdentityPools>>,
    pub stop: StopSignal,
    pub progress: Option<ProgressFn>,
}

impl std::fmt::Debug for RunOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunOptions")
            .field("pools", &self.pools)
            .field("stop", &self.stop)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

/// Validate `cfg`, dispatch every planned attempt and wait for all workers.
///
/// Configuration problems are reported before any request is sent. Per-request failures
/// never abort the run; they are counted as transport errors.
pub async fn run(cfg: &RunConfig, opts: RunOptions) -> Result<RunReport> {
    cfg.validate()?;

    let plan = ExecutionPlan::for_config(cfg);
    let pools = opts.pools.unwrap_or_default();
    let identities = IdentityRandomizer::for_config(pools, cfg);
    let template = Arc::new(RequestTemplate {
        target: Target::for_config(cfg),
        bearer: cfg.token.clone(),
        timeout: cfg.request_timeout,
    });
    let client = HttpClient::new(Some(cfg.connect_timeout));

    let mut seeder = match cfg.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };

    tracing::info!(
        url = %template.target.url,
        method = %template.target.method,
        mode = %cfg.mode,
        workers = plan.workers,
        per_worker = plan.per_worker,
        delay_ms = plan.delay.as_millis() as u64,
        "starting run"
    );

    let completed = Arc::new(AtomicU64::new(0));
    let started = Instant::now();

    let mut handles = Vec::with_capacity(usize::try_from(plan.workers).unwrap_or(0));
    for id in 0..plan.workers {
        let worker = Worker {
            id,
            client: client.clone(),
            template: template.clone(),
            identities: identities.clone(),
            rng: SmallRng::seed_from_u64(seeder.r#gen::<u64>()),
            plan,
            stop: opts.stop.clone(),
            completed: completed.clone(),
        };
        handles.push(tokio::spawn(worker.run()));
    }

    let progress_handle = opts.progress.as_ref().map(|progress| {
        let progress = progress.clone();
        let completed = completed.clone();
        let planned = plan.total_attempts();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(1));
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick fires immediately.
            interval.tick().await;

            let mut tick: u64 = 0;
            let mut last_completed = 0u64;
            let mut last_at = Instant::now();
            loop {
                interval.tick().await;

                tick = tick.saturating_add(1);
                let now = Instant::now();
                let dt = now.duration_since(last_at).as_secs_f64();
                last_at = now;

                let done = completed.load(Ordering::Relaxed);
                let delta = done.saturating_sub(last_completed);
                last_completed = done;

                (progress)(ProgressUpdate {
                    tick,
                    elapsed: started.elapsed(),
                    completed: done,
                    planned,
                    rps_now: if dt > 0.0 {
                        (delta as f64 / dt).round() as u64
                    } else {
                        0
                    },
                });
            }
        })
    });

    let mut summary = ResultSummary::default();
    let mut latency = LatencyRecorder::default();
    let mut cancelled = false;
    let mut join_err = None;
    for h in handles {
        match h.await {
            Ok(tally) => {
                summary.merge(&tally.summary);
                latency.merge(&tally.latency);
                cancelled |= tally.stopped_early;
            }
            Err(err) => {
                if join_err.is_none() {
                    join_err = Some(err);
                }
            }
        }
    }

    if let Some(h) = progress_handle {
        h.abort();
        let _ = h.await;
    }

    if let Some(err) = join_err {
        return Err(err.into());
    }

    let report = RunReport {
        summary,
        plan,
        elapsed: started.elapsed(),
        latency: latency.summarize(),
        cancelled,
    };

    tracing::info!(
        attempts = report.summary.total(),
        success = report.summary.success,
        blocked = report.summary.blocked,
        transport_error = report.summary.transport_error,
        elapsed_ms = report.elapsed.as_millis() as u64,
        cancelled,
        "run finished"
    );

    Ok(report)
}
