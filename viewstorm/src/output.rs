use viewstorm_core::runner::ProgressFn;
use viewstorm_core::{ExecutionPlan, RunConfig, RunReport, Target, UaPolicy};

use crate::cli::OutputFormat;

mod human;
mod json;

pub(crate) trait OutputFormatter: Send + Sync {
    fn print_header(&self, cfg: &RunConfig, target: &Target, plan: &ExecutionPlan);
    fn progress(&self) -> Option<ProgressFn>;
    fn print_summary(&self, report: &RunReport) -> anyhow::Result<()>;
}

pub(crate) fn formatter(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::HumanReadable => Box::new(human::HumanReadableOutput::new()),
        OutputFormat::Json => Box::new(json::JsonOutput),
    }
}

pub(crate) fn ua_policy_name(cfg: &RunConfig) -> &'static str {
    match UaPolicy::for_run(cfg.suspicious_ua, cfg.mode) {
        UaPolicy::Normal => "normal",
        UaPolicy::Suspicious => "suspicious",
        UaPolicy::Blended => "blended",
    }
}
