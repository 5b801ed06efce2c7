use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::rngs::SmallRng;
use viewstorm_http::HttpClient;

use crate::identity::IdentityRandomizer;
use crate::plan::ExecutionPlan;
use crate::summary::{LatencyRecorder, ResultSummary};

use super::attempt::{Attempt, RequestTemplate, send_one};
use super::stop::StopSignal;

/// Everything one worker task owns.
#[derive(Debug)]
pub struct Worker {
    pub id: u64,
    pub client: HttpClient,
    pub template: Arc<RequestTemplate>,
    pub identities: IdentityRandomizer,
    pub rng: SmallRng,
    pub plan: ExecutionPlan,
    pub stop: StopSignal,
    /// Shared with the progress ticker only; the summary never reads it.
    pub completed: Arc<AtomicU64>,
}

/// Local results of one worker, merged by the engine after join.
#[derive(Debug, Default)]
pub struct WorkerTally {
    pub summary: ResultSummary,
    pub latency: LatencyRecorder,
    /// Stopped before issuing `per_worker` attempts.
    pub stopped_early: bool,
}

impl Worker {
    pub async fn run(mut self) -> WorkerTally {
        tracing::debug!(worker = self.id, quota = self.plan.per_worker, "worker started");

        let mut tally = WorkerTally::default();
        for i in 0..self.plan.per_worker {
            if self.stop.is_stopped() {
                tally.stopped_early = true;
                break;
            }

            let identity = self.identities.identity(&mut self.rng);
            let attempt = send_one(&self.client, &self.template, &identity).await;
            if let Attempt::Status { latency, .. } = &attempt {
                tally.latency.record(*latency);
            }
            tally.summary.record(attempt.outcome());
            self.completed.fetch_add(1, Ordering::Relaxed);

            let last = i + 1 == self.plan.per_worker;
            if !last && !self.plan.delay.is_zero() {
                tokio::select! {
                    _ = tokio::time::sleep(self.plan.delay) => {}
                    _ = self.stop.wait() => {
                        tally.stopped_early = true;
                        break;
                    }
                }
            }
        }

        tracing::debug!(
            worker = self.id,
            attempts = tally.summary.total(),
            stopped_early = tally.stopped_early,
            "worker finished"
        );
        tally
    }
}
