use super::error::{MinimizerError, Quantity};
use crate::core::forcefield::model::{EnergyModel, Evaluation};
use crate::core::models::configuration::Configuration;
use tracing::trace;

/// Wraps an energy model with the checks every minimizer relies on.
///
/// Each evaluation is rejected if the input positions, the returned energy, or any force
/// component is non-finite, or if the number of force vectors differs from the particle
/// count the evaluator was created for.
pub struct Evaluator<'m> {
    model: &'m mut dyn EnergyModel,
    particle_count: usize,
    evaluations: usize,
}

impl<'m> Evaluator<'m> {
    pub fn new(model: &'m mut dyn EnergyModel, particle_count: usize) -> Self {
        Self {
            model,
            particle_count,
            evaluations: 0,
        }
    }

    pub fn evaluate(
        &mut self,
        configuration: &Configuration,
        iteration: usize,
    ) -> Result<Evaluation, MinimizerError> {
        if let Some(particle) = configuration.first_non_finite() {
            return Err(MinimizerError::NonFiniteValue {
                iteration,
                quantity: Quantity::Position,
                particle: Some(particle),
            });
        }

        let evaluation = self
            .model
            .evaluate(configuration)
            .map_err(|source| MinimizerError::EvaluatorFailure { iteration, source })?;
        self.evaluations += 1;

        if evaluation.particle_count() != self.particle_count {
            return Err(MinimizerError::DimensionMismatch {
                iteration,
                expected: self.particle_count,
                found: evaluation.particle_count(),
            });
        }
        if !evaluation.energy.is_finite() {
            return Err(MinimizerError::NonFiniteValue {
                iteration,
                quantity: Quantity::Energy,
                particle: None,
            });
        }
        if let Some(particle) = evaluation.first_non_finite_force() {
            return Err(MinimizerError::NonFiniteValue {
                iteration,
                quantity: Quantity::Force,
                particle: Some(particle),
            });
        }

        trace!(iteration, energy = evaluation.energy, "Evaluated configuration.");
        Ok(evaluation)
    }

    #[inline]
    pub fn particle_count(&self) -> usize {
        self.particle_count
    }

    #[inline]
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }
}
