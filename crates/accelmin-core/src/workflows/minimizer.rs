use crate::core::forcefield::model::EnergyModel;
use crate::core::models::configuration::Configuration;
use crate::engine::config::{LbfgsConfig, MinimizerConfig};
use crate::engine::error::MinimizerError;
use crate::engine::evaluator::Evaluator;
use crate::engine::minimize;
use crate::engine::progress::ProgressReporter;
use crate::engine::rules::{LbfgsRule, NesterovRule, UpdateRule};
use crate::engine::state::MinimizationOutcome;

/// Step size handed to rules that choose their own steps.
const LINE_SEARCH_STEP_SIZE: f64 = 1.0;

/// Uniform surface shared by every bound minimizer.
pub trait Minimizer {
    fn name(&self) -> &str;

    /// Minimizes the bound configuration in place.
    fn minimize(&mut self) -> Result<MinimizationOutcome, MinimizerError> {
        self.minimize_with_progress(&ProgressReporter::new())
    }

    fn minimize_with_progress(
        &mut self,
        reporter: &ProgressReporter,
    ) -> Result<MinimizationOutcome, MinimizerError>;

    /// Potential energy of the current configuration.
    fn energy(&mut self) -> Result<f64, MinimizerError>;

    fn particle_count(&self) -> usize;

    fn platform_name(&self) -> &str;

    fn device_name(&self) -> Option<&str>;
}

/// An energy model, a configuration, and the rule used to minimize it.
///
/// The minimizer owns its model and configuration between runs. Each call to
/// [`Minimizer::minimize`] restarts the rule from its initial state.
pub struct IterativeMinimizer<M, R> {
    model: M,
    configuration: Configuration,
    rule: R,
    config: MinimizerConfig,
}

pub type NesterovMinimizer<M> = IterativeMinimizer<M, NesterovRule>;
pub type BaselineMinimizer<M> = IterativeMinimizer<M, LbfgsRule>;

impl<M: EnergyModel, R: UpdateRule> IterativeMinimizer<M, R> {
    pub fn new(
        model: M,
        configuration: Configuration,
        rule: R,
        config: MinimizerConfig,
    ) -> Result<Self, MinimizerError> {
        config.validate()?;
        if configuration.is_empty() {
            return Err(MinimizerError::EmptyConfiguration);
        }
        Ok(Self {
            model,
            configuration,
            rule,
            config,
        })
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn config(&self) -> &MinimizerConfig {
        &self.config
    }

    pub fn rule(&self) -> &R {
        &self.rule
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn into_parts(self) -> (M, Configuration) {
        (self.model, self.configuration)
    }
}

impl<M: EnergyModel> IterativeMinimizer<M, NesterovRule> {
    /// Fixed-step momentum minimizer running exactly `iterations` updates.
    pub fn nesterov(
        model: M,
        configuration: Configuration,
        step_size: f64,
        iterations: usize,
    ) -> Result<Self, MinimizerError> {
        Self::new(
            model,
            configuration,
            NesterovRule::new(),
            MinimizerConfig::fixed_iterations(step_size, iterations),
        )
    }
}

impl<M: EnergyModel> IterativeMinimizer<M, LbfgsRule> {
    /// L-BFGS run to `energy_tolerance`; `max_iterations == 0` means no cap.
    pub fn baseline(
        model: M,
        configuration: Configuration,
        energy_tolerance: f64,
        max_iterations: usize,
    ) -> Result<Self, MinimizerError> {
        Self::baseline_with(
            model,
            configuration,
            energy_tolerance,
            max_iterations,
            LbfgsConfig::default(),
        )
    }

    pub fn baseline_with(
        model: M,
        configuration: Configuration,
        energy_tolerance: f64,
        max_iterations: usize,
        lbfgs: LbfgsConfig,
    ) -> Result<Self, MinimizerError> {
        lbfgs.validate()?;
        Self::new(
            model,
            configuration,
            LbfgsRule::new(lbfgs),
            MinimizerConfig::with_tolerance(
                LINE_SEARCH_STEP_SIZE,
                energy_tolerance,
                max_iterations,
            ),
        )
    }
}

impl<M: EnergyModel, R: UpdateRule> Minimizer for IterativeMinimizer<M, R> {
    fn name(&self) -> &str {
        self.rule.name()
    }

    fn minimize_with_progress(
        &mut self,
        reporter: &ProgressReporter,
    ) -> Result<MinimizationOutcome, MinimizerError> {
        minimize::run(
            &mut self.configuration,
            &mut self.model,
            &mut self.rule,
            &self.config,
            reporter,
        )
    }

    fn energy(&mut self) -> Result<f64, MinimizerError> {
        let mut evaluator = Evaluator::new(&mut self.model, self.configuration.len());
        Ok(evaluator.evaluate(&self.configuration, 0)?.energy)
    }

    fn particle_count(&self) -> usize {
        self.configuration.len()
    }

    fn platform_name(&self) -> &str {
        self.model.platform_name()
    }

    fn device_name(&self) -> Option<&str> {
        self.model.device_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forcefield::harmonic::HarmonicBondModel;
    use crate::core::forcefield::model::{Evaluation, EvaluationError};
    use crate::core::forcefield::quadratic::QuadraticWell;
    use crate::engine::config::ConfigError;
    use nalgebra::{Point3, Vector3};

    fn dimer_start() -> Configuration {
        Configuration::from_coordinates(&[[0.0, 0.0, 0.0], [0.0, 0.0, 2.0]])
    }

    struct OnDevice(HarmonicBondModel);

    impl EnergyModel for OnDevice {
        fn evaluate(
            &mut self,
            configuration: &Configuration,
        ) -> Result<Evaluation, EvaluationError> {
            self.0.evaluate(configuration)
        }

        fn platform_name(&self) -> &str {
            "Accelerator"
        }

        fn device_name(&self) -> Option<&str> {
            Some("unit-0")
        }
    }

    #[test]
    fn nesterov_minimizer_exposes_uniform_surface() {
        let model = HarmonicBondModel::dimer(10.0, 1.0);
        let mut minimizer = NesterovMinimizer::nesterov(model, dimer_start(), 1e-3, 500).unwrap();

        assert_eq!(minimizer.name(), "Nesterov");
        assert_eq!(minimizer.particle_count(), 2);
        assert_eq!(minimizer.platform_name(), "Reference");
        assert_eq!(minimizer.device_name(), None);
        assert!((minimizer.energy().unwrap() - 10.0).abs() < 1e-12);

        let outcome = minimizer.minimize().unwrap();

        assert_eq!(minimizer.energy().unwrap(), outcome.final_energy);
        let c = minimizer.configuration();
        assert!(((c[1] - c[0]).norm() - 1.0).abs() < 1e-2);
    }

    #[test]
    fn baseline_minimizer_runs_to_tolerance_without_a_cap() {
        let mut minimizer = BaselineMinimizer::baseline(
            QuadraticWell::new(vec![Point3::new(1.0, 1.0, 1.0)], Vector3::new(1.0, 10.0, 100.0)),
            Configuration::from_coordinates(&[[0.0, 0.0, 0.0]]),
            1e-10,
            0,
        )
        .unwrap();

        assert_eq!(minimizer.config().max_iterations, None);
        assert_eq!(minimizer.name(), "L-BFGS");

        let outcome = minimizer.minimize().unwrap();

        assert!(outcome.converged);
        assert!(outcome.final_energy < 1e-6);
    }

    #[test]
    fn device_name_comes_from_the_model() {
        let minimizer = NesterovMinimizer::nesterov(
            OnDevice(HarmonicBondModel::dimer(1.0, 1.0)),
            dimer_start(),
            1e-3,
            1,
        )
        .unwrap();

        assert_eq!(minimizer.platform_name(), "Accelerator");
        assert_eq!(minimizer.device_name(), Some("unit-0"));
    }

    #[test]
    fn construction_validates_parameters() {
        let model = HarmonicBondModel::dimer(1.0, 1.0);
        let result = NesterovMinimizer::nesterov(model, dimer_start(), 0.0, 10);
        assert!(matches!(
            result,
            Err(MinimizerError::Config(ConfigError::InvalidStepSize(_)))
        ));

        let model = HarmonicBondModel::dimer(1.0, 1.0);
        let result = NesterovMinimizer::nesterov(model, Configuration::default(), 1e-3, 10);
        assert!(matches!(result, Err(MinimizerError::EmptyConfiguration)));

        let result = BaselineMinimizer::baseline_with(
            HarmonicBondModel::dimer(1.0, 1.0),
            dimer_start(),
            1e-6,
            0,
            LbfgsConfig {
                memory_size: 0,
                ..LbfgsConfig::default()
            },
        );
        assert!(matches!(
            result,
            Err(MinimizerError::Config(ConfigError::InvalidLbfgs { .. }))
        ));
    }

    #[test]
    fn minimizers_are_usable_as_trait_objects() {
        let dimer = HarmonicBondModel::dimer(10.0, 1.0);
        let mut runs: Vec<Box<dyn Minimizer>> = vec![
            Box::new(NesterovMinimizer::nesterov(dimer.clone(), dimer_start(), 1e-3, 200).unwrap()),
            Box::new(BaselineMinimizer::baseline(dimer, dimer_start(), 1e-10, 0).unwrap()),
        ];

        for minimizer in runs.iter_mut() {
            let before = minimizer.energy().unwrap();
            let outcome = minimizer.minimize().unwrap();
            assert!(outcome.final_energy < before, "{}", minimizer.name());
        }
    }
}
