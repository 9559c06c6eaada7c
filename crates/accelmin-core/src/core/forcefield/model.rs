use crate::core::models::configuration::Configuration;
use nalgebra::Vector3;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("Model expects {expected} particles but the configuration has {found}")]
    ParticleCount { expected: usize, found: usize },

    #[error("Particle index {index} is out of range for a system of {count} particles")]
    ParticleIndex { index: usize, count: usize },

    #[error("Energy backend failed: {0}")]
    Backend(String),
}

/// Energy and forces for one configuration.
///
/// `forces[i]` is the negative energy gradient with respect to particle `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub energy: f64,
    pub forces: Vec<Vector3<f64>>,
}

impl Evaluation {
    pub fn new(energy: f64, forces: Vec<Vector3<f64>>) -> Self {
        Self { energy, forces }
    }

    #[inline]
    pub fn particle_count(&self) -> usize {
        self.forces.len()
    }

    /// Index of the first particle whose force has a NaN or infinite component.
    pub fn first_non_finite_force(&self) -> Option<usize> {
        self.forces
            .iter()
            .position(|f| !f.iter().all(|c| c.is_finite()))
    }
}

/// A potential-energy surface over particle positions.
///
/// Implementations may be stateful (caches, device contexts), hence `&mut self`. A model
/// is owned by exactly one minimizer at a time.
pub trait EnergyModel {
    fn evaluate(&mut self, configuration: &Configuration) -> Result<Evaluation, EvaluationError>;

    /// Label of the compute platform the model runs on.
    fn platform_name(&self) -> &str;

    fn device_name(&self) -> Option<&str> {
        None
    }
}

impl<M: EnergyModel + ?Sized> EnergyModel for Box<M> {
    fn evaluate(&mut self, configuration: &Configuration) -> Result<Evaluation, EvaluationError> {
        (**self).evaluate(configuration)
    }

    fn platform_name(&self) -> &str {
        (**self).platform_name()
    }

    fn device_name(&self) -> Option<&str> {
        (**self).device_name()
    }
}
