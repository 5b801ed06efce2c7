use std::sync::Arc;

use viewstorm_core::runner::{ProgressFn, ProgressUpdate};
use viewstorm_core::{ExecutionPlan, RunConfig, RunReport, Target};

mod format;
mod progress;
mod summary;

use format::format_rate;
use progress::HumanProgress;
use summary::{render, render_header};

use super::OutputFormatter;

pub(crate) struct HumanReadableOutput {
    progress: Arc<HumanProgress>,
}

impl HumanReadableOutput {
    pub(crate) fn new() -> Self {
        Self {
            progress: Arc::new(HumanProgress::new()),
        }
    }
}

impl OutputFormatter for HumanReadableOutput {
    fn print_header(&self, cfg: &RunConfig, target: &Target, plan: &ExecutionPlan) {
        print!("{}", render_header(cfg, target, plan));
    }

    fn progress(&self) -> Option<ProgressFn> {
        let progress = self.progress.clone();
        Some(Arc::new(move |u: ProgressUpdate| {
            let message = format!(
                "{}/{} rps={}",
                u.completed,
                u.planned,
                format_rate(u.rps_now as f64)
            );
            progress.update(u.planned, u.completed, message);
        }))
    }

    fn print_summary(&self, report: &RunReport) -> anyhow::Result<()> {
        self.progress.finish();
        print!("{}", render(report));
        Ok(())
    }
}
