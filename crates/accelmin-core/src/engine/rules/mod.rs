//! Update rules for the iterative minimizer.
//!
//! A rule turns the current configuration and its evaluation into the next configuration.
//! Rules own all per-run state and must rebuild it in [`UpdateRule::reset`], which the
//! minimizer calls at the start of every run. Stopping decisions belong to the minimizer;
//! a rule may only signal that its own convergence criterion is met.

pub mod lbfgs;
pub mod nesterov;

use super::error::MinimizerError;
use super::evaluator::Evaluator;
use crate::core::forcefield::model::Evaluation;
use crate::core::models::configuration::Configuration;

/// Per-step inputs supplied by the minimizer.
pub struct StepContext<'a, 'm> {
    /// One-based index of the update being performed.
    pub iteration: usize,
    pub step_size: f64,
    /// Checked access to the energy model for rules that need extra evaluations.
    pub evaluator: &'a mut Evaluator<'m>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// The configuration was updated; the minimizer evaluates it next.
    Moved,
    /// The configuration was updated and the rule already evaluated the new point.
    Evaluated(Evaluation),
    /// The rule's own convergence criterion holds; the configuration is untouched.
    Converged,
}

pub trait UpdateRule {
    fn name(&self) -> &'static str;

    fn reset(&mut self, configuration: &Configuration);

    /// Leading iterations whose energy change must not be read as convergence.
    fn warm_up_iterations(&self) -> usize {
        0
    }

    fn step(
        &mut self,
        configuration: &mut Configuration,
        evaluation: &Evaluation,
        context: &mut StepContext<'_, '_>,
    ) -> Result<StepOutcome, MinimizerError>;
}

pub use lbfgs::LbfgsRule;
pub use nesterov::NesterovRule;
