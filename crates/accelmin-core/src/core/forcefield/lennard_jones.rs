use super::REFERENCE_PLATFORM;
use super::model::{EnergyModel, Evaluation, EvaluationError};
use super::potentials;
use crate::core::models::configuration::Configuration;
use nalgebra::{Point3, Vector3};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// All-pairs 12-6 Lennard-Jones cluster, `eps * ((r_min/r)^12 - 2 (r_min/r)^6)` per pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LennardJonesCluster {
    pub r_min: f64,
    pub well_depth: f64,
}

impl Default for LennardJonesCluster {
    fn default() -> Self {
        Self {
            r_min: 1.0,
            well_depth: 1.0,
        }
    }
}

impl LennardJonesCluster {
    pub fn new(r_min: f64, well_depth: f64) -> Self {
        Self { r_min, well_depth }
    }

    /// Particles on a simple cubic lattice of `per_side^3` sites.
    pub fn cubic_lattice(per_side: usize, spacing: f64) -> Configuration {
        let mut positions = Vec::with_capacity(per_side.pow(3));
        for ix in 0..per_side {
            for iy in 0..per_side {
                for iz in 0..per_side {
                    positions.push(Point3::new(
                        ix as f64 * spacing,
                        iy as f64 * spacing,
                        iz as f64 * spacing,
                    ));
                }
            }
        }
        Configuration::new(positions)
    }

    fn pair_terms(&self, positions: &[Point3<f64>], i: usize) -> Vec<(f64, usize, Vector3<f64>)> {
        (0..i)
            .map(|j| {
                let delta = positions[i] - positions[j];
                let dist = delta.norm();
                let energy = potentials::lennard_jones_12_6(dist, self.r_min, self.well_depth);
                let d_energy =
                    potentials::lennard_jones_12_6_derivative(dist, self.r_min, self.well_depth);
                let force_on_i = if dist > 0.0 {
                    delta * (-d_energy / dist)
                } else {
                    Vector3::zeros()
                };
                (energy, j, force_on_i)
            })
            .collect()
    }
}

impl EnergyModel for LennardJonesCluster {
    fn evaluate(&mut self, configuration: &Configuration) -> Result<Evaluation, EvaluationError> {
        let positions = configuration.positions();
        let n = positions.len();

        #[cfg(not(feature = "parallel"))]
        let iterator = 0..n;

        #[cfg(feature = "parallel")]
        let iterator = (0..n).into_par_iter();

        let parts: Vec<(usize, Vec<(f64, usize, Vector3<f64>)>)> = iterator
            .map(|i| (i, self.pair_terms(positions, i)))
            .collect();

        let mut energy = 0.0;
        let mut forces = vec![Vector3::zeros(); n];
        for (i, terms) in parts {
            for (pair_energy, j, force_on_i) in terms {
                energy += pair_energy;
                forces[i] += force_on_i;
                forces[j] -= force_on_i;
            }
        }

        Ok(Evaluation::new(energy, forces))
    }

    fn platform_name(&self) -> &str {
        REFERENCE_PLATFORM
    }
}
