use super::REFERENCE_PLATFORM;
use super::model::{EnergyModel, Evaluation, EvaluationError};
use crate::core::models::configuration::Configuration;
use nalgebra::{Point3, Vector3};

/// Separable convex well `0.5 * sum_i sum_axis k_axis * (x_i - c_i)^2`.
///
/// The per-axis stiffness controls the conditioning of the problem: the condition number
/// is `max(k) / min(k)`. The unique minimum is at the centers with zero energy.
#[derive(Debug, Clone)]
pub struct QuadraticWell {
    centers: Vec<Point3<f64>>,
    stiffness: Vector3<f64>,
}

impl QuadraticWell {
    pub fn new(centers: Vec<Point3<f64>>, stiffness: Vector3<f64>) -> Self {
        Self { centers, stiffness }
    }

    pub fn isotropic(centers: Vec<Point3<f64>>, stiffness: f64) -> Self {
        Self::new(centers, Vector3::repeat(stiffness))
    }

    pub fn centers(&self) -> &[Point3<f64>] {
        &self.centers
    }

    pub fn condition_number(&self) -> f64 {
        self.stiffness.max() / self.stiffness.min()
    }
}

impl EnergyModel for QuadraticWell {
    fn evaluate(&mut self, configuration: &Configuration) -> Result<Evaluation, EvaluationError> {
        if configuration.len() != self.centers.len() {
            return Err(EvaluationError::ParticleCount {
                expected: self.centers.len(),
                found: configuration.len(),
            });
        }

        let mut energy = 0.0;
        let forces = configuration
            .iter()
            .zip(self.centers.iter())
            .map(|(position, center)| {
                let displacement = position - center;
                let scaled = displacement.component_mul(&self.stiffness);
                energy += 0.5 * displacement.dot(&scaled);
                -scaled
            })
            .collect();

        Ok(Evaluation::new(energy, forces))
    }

    fn platform_name(&self) -> &str {
        REFERENCE_PLATFORM
    }
}
