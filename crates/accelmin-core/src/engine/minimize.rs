use super::config::MinimizerConfig;
use super::error::MinimizerError;
use super::evaluator::Evaluator;
use super::progress::{Progress, ProgressReporter};
use super::rules::{StepContext, StepOutcome, UpdateRule};
use super::state::MinimizationOutcome;
use crate::core::forcefield::model::EnergyModel;
use crate::core::models::configuration::Configuration;
use crate::core::utils::geometry::calculate_rmsd;
use tracing::{info, instrument, trace};

/// Minimizes `configuration` in place with the given update rule.
///
/// Every iteration queries the model for forces at the current iterate, hands them to
/// `rule`, and optionally stops once the energy change drops below the configured
/// tolerance. The loop works on a private copy; `configuration` is only overwritten when
/// the run succeeds.
///
/// The returned final energy always comes from an evaluation at the final configuration,
/// never from the rule's look-ahead points.
#[instrument(
    skip_all,
    name = "minimize",
    fields(rule = rule.name(), particles = configuration.len())
)]
pub fn run(
    configuration: &mut Configuration,
    model: &mut dyn EnergyModel,
    rule: &mut dyn UpdateRule,
    config: &MinimizerConfig,
    reporter: &ProgressReporter,
) -> Result<MinimizationOutcome, MinimizerError> {
    config.validate()?;
    if configuration.is_empty() {
        return Err(MinimizerError::EmptyConfiguration);
    }

    let mut evaluator = Evaluator::new(model, configuration.len());
    let mut working = configuration.clone();
    let mut evaluation = evaluator.evaluate(&working, 0)?;
    let initial_energy = evaluation.energy;

    info!(
        initial_energy,
        max_iterations = ?config.max_iterations,
        "Starting minimization."
    );
    reporter.report(Progress::RunStart {
        rule: rule.name(),
        max_iterations: config.max_iterations.map(|n| n as u64),
    });

    rule.reset(&working);

    let cap = config.max_iterations.unwrap_or(usize::MAX);
    let warm_up = rule.warm_up_iterations();
    let mut iterations = 0;
    let mut converged = false;
    let mut previous_energy = initial_energy;

    for iteration in 1..=cap {
        let mut context = StepContext {
            iteration,
            step_size: config.step_size,
            evaluator: &mut evaluator,
        };
        match rule.step(&mut working, &evaluation, &mut context)? {
            StepOutcome::Converged => {
                converged = true;
                break;
            }
            StepOutcome::Evaluated(next) => evaluation = next,
            StepOutcome::Moved => evaluation = evaluator.evaluate(&working, iteration)?,
        }
        iterations = iteration;

        trace!(iteration, energy = evaluation.energy, "Iteration complete.");
        reporter.report(Progress::Iteration {
            iteration,
            energy: evaluation.energy,
        });

        if let Some(tolerance) = config.energy_tolerance {
            if iteration > warm_up && (evaluation.energy - previous_energy).abs() < tolerance {
                converged = true;
                break;
            }
        }
        previous_energy = evaluation.energy;
    }

    let rms_displacement =
        calculate_rmsd(configuration.positions(), working.positions()).unwrap_or(0.0);
    configuration.copy_from(&working);

    let outcome = MinimizationOutcome {
        final_energy: evaluation.energy,
        initial_energy,
        iterations,
        evaluations: evaluator.evaluations(),
        converged,
        rms_displacement,
    };
    reporter.report(Progress::RunFinish {
        iterations,
        energy: outcome.final_energy,
    });
    info!(
        final_energy = outcome.final_energy,
        iterations,
        evaluations = outcome.evaluations,
        converged,
        rms_displacement,
        "Minimization finished."
    );

    Ok(outcome)
}
