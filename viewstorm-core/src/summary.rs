use std::time::Duration;

use hdrhistogram::Histogram;

use crate::plan::ExecutionPlan;

/// Classified result of one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Outcome {
    /// 200.
    Success,
    /// 403 or 429.
    Blocked,
    /// 404.
    NotFound,
    /// 401.
    Unauthorized,
    /// No status was obtained (timeout, connect failure, body read failure).
    TransportError,
    /// Any other status.
    Other,
}

impl Outcome {
    pub const ALL: [Outcome; 6] = [
        Outcome::Success,
        Outcome::Blocked,
        Outcome::NotFound,
        Outcome::Unauthorized,
        Outcome::TransportError,
        Outcome::Other,
    ];

    pub fn from_status(status: u16) -> Self {
        match status {
            200 => Self::Success,
            403 | 429 => Self::Blocked,
            404 => Self::NotFound,
            401 => Self::Unauthorized,
            _ => Self::Other,
        }
    }

    /// Status codes the outcome stands for, when it stands for specific ones.
    pub fn statuses(self) -> Option<&'static str> {
        match self {
            Self::Success => Some("200"),
            Self::Blocked => Some("403/429"),
            Self::NotFound => Some("404"),
            Self::Unauthorized => Some("401"),
            Self::TransportError | Self::Other => None,
        }
    }
}

/// Six outcome counters. One per worker during a run, merged after join.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResultSummary {
    pub success: u64,
    pub blocked: u64,
    pub not_found: u64,
    pub unauthorized: u64,
    pub transport_error: u64,
    pub other: u64,
}

impl ResultSummary {
    pub fn record(&mut self, outcome: Outcome) {
        *self.slot(outcome) += 1;
    }

    pub fn merge(&mut self, other: &ResultSummary) {
        for outcome in Outcome::ALL {
            *self.slot(outcome) += other.get(outcome);
        }
    }

    pub fn get(&self, outcome: Outcome) -> u64 {
        match outcome {
            Outcome::Success => self.success,
            Outcome::Blocked => self.blocked,
            Outcome::NotFound => self.not_found,
            Outcome::Unauthorized => self.unauthorized,
            Outcome::TransportError => self.transport_error,
            Outcome::Other => self.other,
        }
    }

    pub fn total(&self) -> u64 {
        Outcome::ALL.iter().map(|o| self.get(*o)).sum()
    }

    fn slot(&mut self, outcome: Outcome) -> &mut u64 {
        match outcome {
            Outcome::Success => &mut self.success,
            Outcome::Blocked => &mut self.blocked,
            Outcome::NotFound => &mut self.not_found,
            Outcome::Unauthorized => &mut self.unauthorized,
            Outcome::TransportError => &mut self.transport_error,
            Outcome::Other => &mut self.other,
        }
    }
}

/// Latency of attempts that obtained a status, in microseconds.
#[derive(Debug, Clone)]
pub struct LatencyRecorder {
    hist: Histogram<u64>,
}

impl Default for LatencyRecorder {
    fn default() -> Self {
        // Upper bound: 1 hour in microseconds.
        let hist = match Histogram::<u64>::new_with_bounds(1, 3_600_000_000, 3) {
            Ok(h) => h,
            Err(err) => panic!("failed to create histogram: {err}"),
        };
        Self { hist }
    }
}

impl LatencyRecorder {
    pub fn record(&mut self, latency: Duration) {
        let us = u64::try_from(latency.as_micros()).unwrap_or(u64::MAX).max(1);
        self.hist.saturating_record(us);
    }

    pub fn merge(&mut self, other: &LatencyRecorder) {
        if let Err(err) = self.hist.add(&other.hist) {
            tracing::warn!(error = %err, "dropping latency samples that do not fit the histogram");
        }
    }

    pub fn len(&self) -> u64 {
        self.hist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hist.is_empty()
    }

    pub fn summarize(&self) -> Option<LatencySummary> {
        if self.hist.is_empty() {
            return None;
        }
        let ms = |us: u64| us as f64 / 1000.0;
        Some(LatencySummary {
            p50_ms: ms(self.hist.value_at_quantile(0.50)),
            p90_ms: ms(self.hist.value_at_quantile(0.90)),
            p99_ms: ms(self.hist.value_at_quantile(0.99)),
            mean_ms: self.hist.mean() / 1000.0,
            max_ms: ms(self.hist.max()),
            count: self.hist.len(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencySummary {
    pub p50_ms: f64,
    pub p90_ms: f64,
    pub p99_ms: f64,
    pub mean_ms: f64,
    pub max_ms: f64,
    pub count: u64,
}

/// Everything a finished (or stopped) run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub summary: ResultSummary,
    pub plan: ExecutionPlan,
    pub elapsed: Duration,
    /// `None` when no attempt obtained a status.
    pub latency: Option<LatencySummary>,
    /// The run was stopped before every worker finished its quota.
    pub cancelled: bool,
}

impl RunReport {
    pub fn requests_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.summary.total() as f64 / secs
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        assert_eq!(Outcome::from_status(200), Outcome::Success);
        assert_eq!(Outcome::from_status(403), Outcome::Blocked);
        assert_eq!(Outcome::from_status(429), Outcome::Blocked);
        assert_eq!(Outcome::from_status(404), Outcome::NotFound);
        assert_eq!(Outcome::from_status(401), Outcome::Unauthorized);
        for other in [201, 204, 301, 400, 500, 503] {
            assert_eq!(Outcome::from_status(other), Outcome::Other, "{other}");
        }
    }

    #[test]
    fn record_and_merge_keep_every_attempt() {
        let mut a = ResultSummary::default();
        a.record(Outcome::Success);
        a.record(Outcome::Blocked);
        a.record(Outcome::Blocked);

        let mut b = ResultSummary::default();
        b.record(Outcome::TransportError);
        b.record(Outcome::Other);

        a.merge(&b);
        assert_eq!(a.total(), 5);
        assert_eq!(a.blocked, 2);
        assert_eq!(a.get(Outcome::TransportError), 1);
        assert_eq!(a.get(Outcome::NotFound), 0);
    }

    #[test]
    fn outcome_names_are_snake_case() {
        assert_eq!(Outcome::TransportError.to_string(), "transport_error");
        assert_eq!(Outcome::NotFound.to_string(), "not_found");
        assert_eq!(Outcome::Blocked.statuses(), Some("403/429"));
        assert_eq!(Outcome::Other.statuses(), None);
    }

    #[test]
    fn latency_summary_is_none_without_samples() {
        let rec = LatencyRecorder::default();
        assert!(rec.is_empty());
        assert_eq!(rec.summarize(), None);
    }

    #[test]
    fn latency_merge_combines_workers() {
        let mut a = LatencyRecorder::default();
        let mut b = LatencyRecorder::default();
        for _ in 0..10 {
            a.record(Duration::from_millis(2));
            b.record(Duration::from_millis(8));
        }
        a.merge(&b);
        assert_eq!(a.len(), 20);

        let Some(s) = a.summarize() else {
            panic!("expected a summary");
        };
        assert!(s.max_ms >= 7.9 && s.max_ms <= 8.1, "max {}", s.max_ms);
        assert!(s.mean_ms > 4.0 && s.mean_ms < 6.0, "mean {}", s.mean_ms);
        assert_eq!(s.count, 20);
    }

    #[test]
    fn rps_handles_zero_elapsed() {
        let report = RunReport {
            summary: ResultSummary {
                success: 10,
                ..Default::default()
            },
            plan: ExecutionPlan {
                workers: 1,
                per_worker: 10,
                delay: Duration::ZERO,
            },
            elapsed: Duration::ZERO,
            latency: None,
            cancelled: false,
        };
        assert_eq!(report.requests_per_sec(), 0.0);
    }
}
