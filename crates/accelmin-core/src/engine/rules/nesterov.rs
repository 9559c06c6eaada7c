use super::{StepContext, StepOutcome, UpdateRule};
use crate::core::forcefield::model::Evaluation;
use crate::core::models::configuration::Configuration;
use crate::engine::error::{MinimizerError, Quantity};
use crate::engine::state::MomentumState;

/// Closed-form root of `a^2 - a = a_old^2`.
#[inline]
pub fn momentum_coefficient(a_old: f64) -> f64 {
    0.5 * (1.0 + (1.0 + 4.0 * a_old * a_old).sqrt())
}

/// Nesterov's accelerated gradient scheme with a fixed step size.
///
/// Each step takes a plain force step to the look-ahead point `y_cur = x + dt * f` and then
/// extrapolates along `y_cur - y_old` with weight `(a_old - 1) / a_cur`. The extrapolation
/// uses `a_old` and `y_old` from *before* this step; they are only overwritten once
/// `x_next` has been written.
#[derive(Debug, Clone, Default)]
pub struct NesterovRule {
    state: MomentumState,
}

impl NesterovRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &MomentumState {
        &self.state
    }
}

impl UpdateRule for NesterovRule {
    fn name(&self) -> &'static str {
        "Nesterov"
    }

    fn reset(&mut self, configuration: &Configuration) {
        self.state.reset(configuration);
    }

    // With a_old = 0 the first step lands back on the starting point.
    fn warm_up_iterations(&self) -> usize {
        1
    }

    fn step(
        &mut self,
        configuration: &mut Configuration,
        evaluation: &Evaluation,
        context: &mut StepContext<'_, '_>,
    ) -> Result<StepOutcome, MinimizerError> {
        let state = &mut self.state;
        debug_assert_eq!(state.particle_count(), configuration.len());

        let a_prev = state.a_old;
        let a_cur = momentum_coefficient(a_prev);
        if !a_cur.is_finite() {
            return Err(MinimizerError::NonFiniteValue {
                iteration: context.iteration,
                quantity: Quantity::MomentumCoefficient,
                particle: None,
            });
        }

        state
            .y_cur
            .assign_displaced(configuration, &evaluation.forces, context.step_size);

        // y_old still holds the previous look-ahead point here.
        let beta = (a_prev - 1.0) / a_cur;
        for ((x, y), y_prev) in configuration
            .positions_mut()
            .iter_mut()
            .zip(state.y_cur.iter())
            .zip(state.y_old.iter())
        {
            *x = *y + (*y - *y_prev) * beta;
        }

        state.a_cur = a_cur;
        state.a_old = a_cur;
        state.y_old.copy_from(&state.y_cur);

        Ok(StepOutcome::Moved)
    }
}
