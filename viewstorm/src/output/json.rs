use serde::Serialize;
use std::io::Write as _;

use viewstorm_core::runner::ProgressFn;
use viewstorm_core::{ExecutionPlan, LatencySummary, RunConfig, RunReport, Target};

use super::{OutputFormatter, ua_policy_name};

pub(crate) struct JsonOutput;

impl OutputFormatter for JsonOutput {
    fn print_header(&self, cfg: &RunConfig, target: &Target, plan: &ExecutionPlan) {
        emit_json_line(&build_start_line(cfg, target, plan));
    }

    fn progress(&self) -> Option<ProgressFn> {
        None
    }

    fn print_summary(&self, report: &RunReport) -> anyhow::Result<()> {
        emit_json_line(&build_summary_line(report));
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct JsonStartLine {
    pub kind: &'static str,
    pub mode: String,
    pub target: String,
    pub id: u64,
    pub method: String,
    pub url: String,
    pub workers: u64,
    pub per_worker: u64,
    pub delay_secs: f64,
    pub ua: &'static str,
    pub xff: bool,
}

fn build_start_line(cfg: &RunConfig, target: &Target, plan: &ExecutionPlan) -> JsonStartLine {
    JsonStartLine {
        kind: "start",
        mode: cfg.mode.to_string(),
        target: cfg.target.to_string(),
        id: cfg.id,
        method: target.method.to_string(),
        url: target.url.clone(),
        workers: plan.workers,
        per_worker: plan.per_worker,
        delay_secs: plan.delay.as_secs_f64(),
        ua: ua_policy_name(cfg),
        xff: cfg.randomize_ip,
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct JsonSummaryLine {
    pub kind: &'static str,
    pub total: u64,
    pub planned: u64,
    pub success: u64,
    pub blocked: u64,
    pub not_found: u64,
    pub unauthorized: u64,
    pub transport_error: u64,
    pub other: u64,
    pub duration_secs: f64,
    pub requests_per_sec: f64,
    pub cancelled: bool,
    pub latency_ms: Option<JsonLatencySummary>,
}

#[derive(Debug, Serialize)]
pub(crate) struct JsonLatencySummary {
    pub p50: f64,
    pub p90: f64,
    pub p99: f64,
    pub mean: f64,
    pub max: f64,
    pub count: u64,
}

impl From<&LatencySummary> for JsonLatencySummary {
    fn from(l: &LatencySummary) -> Self {
        Self {
            p50: l.p50_ms,
            p90: l.p90_ms,
            p99: l.p99_ms,
            mean: l.mean_ms,
            max: l.max_ms,
            count: l.count,
        }
    }
}

fn build_summary_line(report: &RunReport) -> JsonSummaryLine {
    let s = &report.summary;
    JsonSummaryLine {
        kind: "summary",
        total: s.total(),
        planned: report.plan.total_attempts(),
        success: s.success,
        blocked: s.blocked,
        not_found: s.not_found,
        unauthorized: s.unauthorized,
        transport_error: s.transport_error,
        other: s.other,
        duration_secs: report.elapsed.as_secs_f64(),
        requests_per_sec: report.requests_per_sec(),
        cancelled: report.cancelled,
        latency_ms: report.latency.as_ref().map(JsonLatencySummary::from),
    }
}

fn emit_json_line<T: Serialize>(line: &T) {
    let mut out = std::io::stdout().lock();
    if serde_json::to_writer(&mut out, line).is_ok() {
        let _ = writeln!(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use viewstorm_core::{ResultSummary, TargetKind};

    #[test]
    fn summary_line_serializes_every_counter() {
        let report = RunReport {
            summary: ResultSummary {
                success: 7,
                blocked: 2,
                not_found: 1,
                ..Default::default()
            },
            plan: ExecutionPlan {
                workers: 2,
                per_worker: 5,
                delay: Duration::ZERO,
            },
            elapsed: Duration::from_millis(500),
            latency: None,
            cancelled: false,
        };

        let value = match serde_json::to_value(build_summary_line(&report)) {
            Ok(v) => v,
            Err(err) => panic!("serialize summary: {err}"),
        };
        assert_eq!(value["kind"], "summary");
        assert_eq!(value["total"], 10);
        assert_eq!(value["planned"], 10);
        assert_eq!(value["blocked"], 2);
        assert_eq!(value["transport_error"], 0);
        assert_eq!(value["requests_per_sec"], 20.0);
        assert!(value["latency_ms"].is_null());
    }

    #[test]
    fn start_line_names_the_target() {
        let cfg = RunConfig::new("http://127.0.0.1:1", TargetKind::Package, 9);
        let target = Target::for_config(&cfg);
        let plan = ExecutionPlan::for_config(&cfg);

        let value = match serde_json::to_value(build_start_line(&cfg, &target, &plan)) {
            Ok(v) => v,
            Err(err) => panic!("serialize start: {err}"),
        };
        assert_eq!(value["kind"], "start");
        assert_eq!(value["target"], "package");
        assert_eq!(value["method"], "GET");
        assert_eq!(value["url"], "http://127.0.0.1:1/api/v1/packages/9");
        assert_eq!(value["ua"], "normal");
    }
}
