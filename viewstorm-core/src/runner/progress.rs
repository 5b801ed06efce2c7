use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    /// Monotonic tick counter (1-based) for progress emissions.
    pub tick: u64,
    pub elapsed: Duration,
    /// Attempts finished so far, across all workers.
    pub completed: u64,
    /// Attempts the plan issues when nobody stops the run.
    pub planned: u64,
    /// Requests/sec observed during the last progress interval.
    pub rps_now: u64,
}

pub type ProgressFn = std::sync::Arc<dyn Fn(ProgressUpdate) + Send + Sync + 'static>;
