pub mod compare;
pub mod run;

use crate::cli::Method;
use crate::config::AppConfig;
use crate::error::Result;
use accelmin::engine::progress::ProgressReporter;
use accelmin::workflows::benchmark::{self, BenchmarkRecord};
use accelmin::workflows::minimizer::{BaselineMinimizer, NesterovMinimizer};
use tracing::info;

/// Builds a fresh copy of the configured system and benchmarks one method on it.
pub(crate) fn benchmark_method(
    method: Method,
    config: &AppConfig,
    reporter: &ProgressReporter,
) -> Result<BenchmarkRecord> {
    let (model, configuration) = config.system.build();
    info!(
        "Minimizing {} ({} particles) with {:?}.",
        config.system.label(),
        configuration.len(),
        method
    );

    let record = match method {
        Method::Nesterov => {
            let mut minimizer = NesterovMinimizer::nesterov(
                model,
                configuration,
                config.nesterov.step_size,
                config.nesterov.iterations,
            )?;
            benchmark::run(&mut minimizer, reporter)?
        }
        Method::Lbfgs => {
            let mut minimizer = BaselineMinimizer::baseline_with(
                model,
                configuration,
                config.baseline.energy_tolerance,
                config.baseline.max_iterations,
                config.baseline.lbfgs.clone(),
            )?;
            benchmark::run(&mut minimizer, reporter)?
        }
    };
    Ok(record)
}
