use std::fmt::Write as _;

use viewstorm_core::{ExecutionPlan, Outcome, RunConfig, RunReport, Target};

use super::format::{format_millis, format_rate};
use crate::output::ua_policy_name;

pub(crate) fn render_header(cfg: &RunConfig, target: &Target, plan: &ExecutionPlan) -> String {
    let mut out = String::new();
    writeln!(
        out,
        "[start] mode={} type={} id={} workers={} per_worker={} delay={:.3}s ua={} xff={}",
        cfg.mode,
        cfg.target,
        cfg.id,
        plan.workers,
        plan.per_worker,
        plan.delay.as_secs_f64(),
        ua_policy_name(cfg),
        cfg.randomize_ip
    )
    .ok();
    writeln!(out, "target: {} {}", target.method, target.url).ok();
    out
}

pub(crate) fn render(report: &RunReport) -> String {
    let s = &report.summary;
    let mut out = String::new();

    out.push_str("\n[result]\n");
    row(&mut out, "total", &s.total().to_string());
    for outcome in Outcome::ALL {
        let label = match outcome.statuses() {
            Some(statuses) => format!("{outcome}({statuses})"),
            None => outcome.to_string(),
        };
        row(&mut out, &label, &s.get(outcome).to_string());
    }
    row(
        &mut out,
        "duration",
        &format!("{:.2}s", report.elapsed.as_secs_f64()),
    );
    row(&mut out, "rps", &format_rate(report.requests_per_sec()));

    match &report.latency {
        Some(l) => row(
            &mut out,
            "latency",
            &format!(
                "p50={} p90={} p99={} mean={} max={} (n={})",
                format_millis(l.p50_ms),
                format_millis(l.p90_ms),
                format_millis(l.p99_ms),
                format_millis(l.mean_ms),
                format_millis(l.max_ms),
                l.count
            ),
        ),
        None => row(&mut out, "latency", "n/a"),
    }

    if report.cancelled {
        let planned = report.plan.total_attempts();
        writeln!(
            out,
            "  -> stopped early after {} of {planned} planned requests",
            s.total()
        )
        .ok();
    }
    if s.blocked > 0 {
        out.push_str(
            "  -> backend defenses triggered (403/429); check the security log and statistics\n",
        );
    }
    out
}

fn row(out: &mut String, label: &str, value: &str) {
    writeln!(out, "  {label:<22}: {value}").ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use viewstorm_core::{LatencySummary, PostEndpoint, ResultSummary, TargetKind, TrafficMode};

    fn report(summary: ResultSummary, cancelled: bool) -> RunReport {
        RunReport {
            summary,
            plan: ExecutionPlan {
                workers: 2,
                per_worker: 5,
                delay: Duration::ZERO,
            },
            elapsed: Duration::from_secs(2),
            latency: Some(LatencySummary {
                p50_ms: 3.0,
                p90_ms: 8.0,
                p99_ms: 15.0,
                mean_ms: 4.2,
                max_ms: 20.0,
                count: 10,
            }),
            cancelled,
        }
    }

    #[test]
    fn header_echoes_the_plan() {
        let mut cfg = RunConfig::new("http://127.0.0.1:15201", TargetKind::Post, 123);
        cfg.mode = TrafficMode::Mixed;
        cfg.endpoint = PostEndpoint::View;
        let target = Target::for_config(&cfg);
        let plan = ExecutionPlan::for_config(&cfg);

        let out = render_header(&cfg, &target, &plan);
        assert!(out.contains("mode=mixed type=post id=123 workers=20 per_worker=25"));
        assert!(out.contains("delay=0.300s ua=blended xff=false"));
        assert!(out.contains("target: POST http://127.0.0.1:15201/api/v1/posts/123/view"));
    }

    #[test]
    fn summary_lists_every_counter_and_the_block_hint() {
        let out = render(&report(
            ResultSummary {
                success: 6,
                blocked: 3,
                transport_error: 1,
                ..Default::default()
            },
            false,
        ));

        assert!(out.contains("total                 : 10"), "{out}");
        assert!(out.contains("success(200)          : 6"), "{out}");
        assert!(out.contains("blocked(403/429)      : 3"), "{out}");
        assert!(out.contains("not_found(404)        : 0"), "{out}");
        assert!(out.contains("unauthorized(401)     : 0"), "{out}");
        assert!(out.contains("transport_error       : 1"), "{out}");
        assert!(out.contains("other                 : 0"), "{out}");
        assert!(out.contains("duration              : 2.00s"), "{out}");
        assert!(out.contains("rps                   : 5"), "{out}");
        assert!(out.contains("p50=3ms p90=8ms p99=15ms mean=4ms max=20ms (n=10)"), "{out}");
        assert!(out.contains("defenses triggered"), "{out}");
        assert!(!out.contains("stopped early"), "{out}");
    }

    #[test]
    fn summary_without_blocks_has_no_hint() {
        let out = render(&report(
            ResultSummary {
                success: 4,
                ..Default::default()
            },
            true,
        ));
        assert!(!out.contains("defenses triggered"), "{out}");
        assert!(out.contains("stopped early after 4 of 10 planned requests"), "{out}");
    }
}
