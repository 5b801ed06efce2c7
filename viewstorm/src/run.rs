use viewstorm_core::runner::{self, RunOptions, StopSignal};
use viewstorm_core::{ExecutionPlan, Target};

use crate::cli::Cli;
use crate::exit_codes::ExitCode;
use crate::output;
use crate::run_error::RunError;

pub async fn run(cli: Cli) -> Result<ExitCode, RunError> {
    let out = output::formatter(cli.output);
    let cfg = cli.run_config();
    cfg.validate().map_err(runner::Error::from)?;

    let target = Target::for_config(&cfg);
    let plan = ExecutionPlan::for_config(&cfg);
    out.print_header(&cfg, &target, &plan);

    let stop = StopSignal::new();
    let ctrl_c = {
        let stop = stop.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::warn!("interrupted; finishing in-flight requests");
                    stop.stop();
                }
                Err(err) => tracing::warn!(error = %err, "failed to listen for ctrl-c"),
            }
        })
    };

    let opts = RunOptions {
        pools: None,
        stop,
        progress: out.progress(),
    };
    let result = runner::run(&cfg, opts).await;
    ctrl_c.abort();
    let report = result?;

    out.print_summary(&report).map_err(RunError::RuntimeError)?;
    Ok(ExitCode::Success)
}
