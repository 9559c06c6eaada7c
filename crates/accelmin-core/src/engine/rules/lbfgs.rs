// Limited-memory BFGS with:
// - two-loop recursion for the inverse Hessian approximation
// - backtracking line search on the Armijo condition
// - a per-particle displacement cap on the first trial step
//
// Reference: Nocedal & Wright, "Numerical Optimization", 2nd ed., Algorithms 7.4/7.5

use super::{StepContext, StepOutcome, UpdateRule};
use crate::core::forcefield::model::Evaluation;
use crate::core::models::configuration::Configuration;
use crate::core::utils::geometry::{dot, max_norm, rms_component};
use crate::engine::config::LbfgsConfig;
use crate::engine::error::MinimizerError;
use nalgebra::Vector3;
use std::collections::VecDeque;
use tracing::{debug, trace};

const CURVATURE_THRESHOLD: f64 = 1e-10;

type Field = Vec<Vector3<f64>>;

#[derive(Debug, Clone)]
struct CorrectionPair {
    s: Field,
    y: Field,
    rho: f64,
}

#[derive(Debug, Clone)]
struct History {
    pairs: VecDeque<CorrectionPair>,
    capacity: usize,
}

impl History {
    fn new(capacity: usize) -> Self {
        Self {
            pairs: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    fn clear(&mut self) {
        self.pairs.clear();
    }

    fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Stores the pair if it satisfies the curvature condition `s . y > 0`.
    fn push(&mut self, s: Field, y: Field) -> bool {
        let sy = dot(&s, &y);
        if sy <= CURVATURE_THRESHOLD {
            return false;
        }
        if self.pairs.len() == self.capacity {
            self.pairs.pop_front();
        }
        self.pairs.push_back(CorrectionPair { s, y, rho: 1.0 / sy });
        true
    }

    /// Writes `-H * gradient` into `direction`.
    fn descent_direction(&self, gradient: &[Vector3<f64>], direction: &mut Field) {
        direction.clear();
        direction.extend_from_slice(gradient);

        let mut alphas = vec![0.0; self.pairs.len()];
        for (k, pair) in self.pairs.iter().enumerate().rev() {
            alphas[k] = pair.rho * dot(&pair.s, direction);
            for (d, y) in direction.iter_mut().zip(pair.y.iter()) {
                *d -= y * alphas[k];
            }
        }

        if let Some(latest) = self.pairs.back() {
            let yy = dot(&latest.y, &latest.y);
            if yy > 0.0 {
                let gamma = dot(&latest.s, &latest.y) / yy;
                direction.iter_mut().for_each(|d| *d *= gamma);
            }
        }

        for (k, pair) in self.pairs.iter().enumerate() {
            let beta = pair.rho * dot(&pair.y, direction);
            for (d, s) in direction.iter_mut().zip(pair.s.iter()) {
                *d += s * (alphas[k] - beta);
            }
        }

        direction.iter_mut().for_each(|d| *d = -*d);
    }
}

/// Quasi-Newton baseline the accelerated scheme is measured against.
///
/// Every step performs its own line search through the evaluator and hands the accepted
/// evaluation back to the minimizer, so no point is evaluated twice.
#[derive(Debug, Clone)]
pub struct LbfgsRule {
    config: LbfgsConfig,
    history: History,
    direction: Field,
    trial: Configuration,
}

impl Default for LbfgsRule {
    fn default() -> Self {
        Self::new(LbfgsConfig::default())
    }
}

impl LbfgsRule {
    pub fn new(config: LbfgsConfig) -> Self {
        let history = History::new(config.memory_size.max(1));
        Self {
            config,
            history,
            direction: Vec::new(),
            trial: Configuration::default(),
        }
    }

    pub fn config(&self) -> &LbfgsConfig {
        &self.config
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    fn initial_step(&self) -> f64 {
        if self.config.max_displacement > 0.0 {
            let largest = max_norm(&self.direction);
            if largest > self.config.max_displacement {
                return self.config.max_displacement / largest;
            }
        }
        1.0
    }
}

impl UpdateRule for LbfgsRule {
    fn name(&self) -> &'static str {
        "L-BFGS"
    }

    fn reset(&mut self, configuration: &Configuration) {
        self.history = History::new(self.config.memory_size.max(1));
        self.direction = vec![Vector3::zeros(); configuration.len()];
        self.trial = configuration.clone();
    }

    fn step(
        &mut self,
        configuration: &mut Configuration,
        evaluation: &Evaluation,
        context: &mut StepContext<'_, '_>,
    ) -> Result<StepOutcome, MinimizerError> {
        let iteration = context.iteration;
        let gradient: Field = evaluation.forces.iter().map(|f| -f).collect();

        let gradient_rms = rms_component(&gradient);
        if gradient_rms < self.config.gradient_rms_tolerance {
            debug!(iteration, gradient_rms, "Gradient below tolerance.");
            return Ok(StepOutcome::Converged);
        }

        self.history.descent_direction(&gradient, &mut self.direction);

        if dot(&self.direction, &gradient) >= 0.0 {
            trace!(iteration, "Not a descent direction; resetting history.");
            self.history.clear();
            self.direction.clear();
            self.direction.extend(evaluation.forces.iter().copied());
        }
        let slope = dot(&self.direction, &gradient);

        let mut step = self.initial_step();
        let mut accepted = None;
        for _ in 0..self.config.line_search_max_iter {
            self.trial
                .assign_displaced(configuration, &self.direction, step);
            let trial_eval = context.evaluator.evaluate(&self.trial, iteration)?;
            if trial_eval.energy <= evaluation.energy + self.config.line_search_c1 * step * slope {
                accepted = Some(trial_eval);
                break;
            }
            step *= 0.5;
            if step < self.config.line_search_min_step {
                break;
            }
        }

        let new_eval = match accepted {
            Some(eval) => eval,
            None => {
                // Take the smallest step tried to make some progress.
                debug!(iteration, step, "Line search failed; accepting smallest step.");
                self.trial
                    .assign_displaced(configuration, &self.direction, step);
                context.evaluator.evaluate(&self.trial, iteration)?
            }
        };

        let s: Field = self
            .trial
            .iter()
            .zip(configuration.iter())
            .map(|(new, old)| new - old)
            .collect();
        let y: Field = new_eval
            .forces
            .iter()
            .zip(evaluation.forces.iter())
            .map(|(f_new, f_old)| f_old - f_new)
            .collect();

        configuration.copy_from(&self.trial);
        let stored = self.history.push(s, y);
        trace!(iteration, step, stored, energy = new_eval.energy, "L-BFGS step accepted.");

        Ok(StepOutcome::Evaluated(new_eval))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forcefield::quadratic::QuadraticWell;
    use crate::engine::evaluator::Evaluator;
    use nalgebra::Point3;

    fn run_steps(
        rule: &mut LbfgsRule,
        model: &mut QuadraticWell,
        configuration: &mut Configuration,
        max_steps: usize,
    ) -> (Vec<f64>, bool) {
        let count = configuration.len();
        let mut evaluator = Evaluator::new(model, count);
        let mut evaluation = evaluator.evaluate(configuration, 0).unwrap();
        let mut energies = vec![evaluation.energy];
        rule.reset(configuration);

        for iteration in 1..=max_steps {
            let mut context = StepContext {
                iteration,
                step_size: 1.0,
                evaluator: &mut evaluator,
            };
            match rule.step(configuration, &evaluation, &mut context).unwrap() {
                StepOutcome::Evaluated(next) => evaluation = next,
                StepOutcome::Converged => return (energies, true),
                StepOutcome::Moved => panic!("L-BFGS always evaluates the accepted point"),
            }
            energies.push(evaluation.energy);
        }
        (energies, false)
    }

    #[test]
    fn converges_on_an_ill_conditioned_quadratic() {
        let centers = vec![Point3::new(1.0, -1.0, 0.5), Point3::new(-2.0, 0.0, 3.0)];
        let mut well = QuadraticWell::new(centers.clone(), Vector3::new(1.0, 25.0, 100.0));
        let mut config = Configuration::from_coordinates(&[[0.0; 3], [0.0; 3]]);
        let mut rule = LbfgsRule::default();

        let (energies, converged) = run_steps(&mut rule, &mut well, &mut config, 200);

        assert!(converged);
        assert!(*energies.last().unwrap() < 1e-7);
        for (p, c) in config.iter().zip(centers.iter()) {
            assert!((p - c).norm() < 1e-3);
        }
    }

    #[test]
    fn accepted_steps_never_increase_energy_on_a_convex_well() {
        let mut well = QuadraticWell::new(vec![Point3::origin(); 3], Vector3::new(0.5, 4.0, 30.0));
        let mut config =
            Configuration::from_coordinates(&[[1.0, 2.0, 3.0], [-1.0, 0.5, 0.2], [2.0, -2.0, 1.0]]);
        let mut rule = LbfgsRule::default();

        let (energies, _) = run_steps(&mut rule, &mut well, &mut config, 100);

        for pair in energies.windows(2) {
            assert!(pair[1] <= pair[0] + 1e-12, "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn first_step_respects_the_displacement_cap() {
        let mut well = QuadraticWell::isotropic(vec![Point3::origin()], 1000.0);
        let start = Configuration::from_coordinates(&[[1.0, 0.0, 0.0]]);
        let mut config = start.clone();
        let mut rule = LbfgsRule::default();

        run_steps(&mut rule, &mut well, &mut config, 1);

        let moved = (config[0] - start[0]).norm();
        assert!(moved <= rule.config().max_displacement + 1e-12);
        assert!(moved > 0.0);
    }

    #[test]
    fn history_is_bounded_by_memory_size() {
        let mut well = QuadraticWell::new(vec![Point3::origin(); 4], Vector3::new(1.0, 3.0, 9.0));
        let mut config = Configuration::from_coordinates(&[
            [5.0, 5.0, 5.0],
            [-5.0, 4.0, 3.0],
            [2.0, -3.0, 4.0],
            [1.0, 1.0, -6.0],
        ]);
        let mut rule = LbfgsRule::new(LbfgsConfig {
            memory_size: 2,
            gradient_rms_tolerance: 0.0,
            ..LbfgsConfig::default()
        });

        run_steps(&mut rule, &mut well, &mut config, 6);

        assert!(rule.history_len() <= 2);
    }

    #[test]
    fn reset_clears_history() {
        let mut well = QuadraticWell::isotropic(vec![Point3::origin()], 2.0);
        let mut config = Configuration::from_coordinates(&[[3.0, 0.0, 0.0]]);
        let mut rule = LbfgsRule::default();
        run_steps(&mut rule, &mut well, &mut config, 3);

        rule.reset(&config);

        assert_eq!(rule.history_len(), 0);
    }

    #[test]
    fn reports_convergence_at_a_minimum_without_moving() {
        let mut well = QuadraticWell::isotropic(vec![Point3::new(1.0, 2.0, 3.0)], 5.0);
        let mut config = Configuration::from_coordinates(&[[1.0, 2.0, 3.0]]);
        let mut rule = LbfgsRule::default();

        let (energies, converged) = run_steps(&mut rule, &mut well, &mut config, 10);

        assert!(converged);
        assert_eq!(energies.len(), 1);
        assert_eq!(config[0], Point3::new(1.0, 2.0, 3.0));
    }
}
