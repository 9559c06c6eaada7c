use super::REFERENCE_PLATFORM;
use super::model::{EnergyModel, Evaluation, EvaluationError};
use super::potentials;
use crate::core::models::configuration::Configuration;
use nalgebra::Vector3;

const COINCIDENT_DISTANCE: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HarmonicBond {
    pub i: usize,
    pub j: usize,
    pub force_constant: f64,
    pub rest_length: f64,
}

/// Sum of harmonic bond terms `k * (|x_j - x_i| - r0)^2`.
#[derive(Debug, Clone, Default)]
pub struct HarmonicBondModel {
    bonds: Vec<HarmonicBond>,
}

impl HarmonicBondModel {
    pub fn new(bonds: Vec<HarmonicBond>) -> Self {
        Self { bonds }
    }

    /// A single bond between particles 0 and 1.
    pub fn dimer(force_constant: f64, rest_length: f64) -> Self {
        Self::new(vec![HarmonicBond {
            i: 0,
            j: 1,
            force_constant,
            rest_length,
        }])
    }

    /// Consecutive particles `0-1-2-...-(n-1)` joined by identical bonds.
    pub fn chain(particle_count: usize, force_constant: f64, rest_length: f64) -> Self {
        let bonds = (1..particle_count)
            .map(|j| HarmonicBond {
                i: j - 1,
                j,
                force_constant,
                rest_length,
            })
            .collect();
        Self::new(bonds)
    }

    pub fn bonds(&self) -> &[HarmonicBond] {
        &self.bonds
    }
}

impl EnergyModel for HarmonicBondModel {
    fn evaluate(&mut self, configuration: &Configuration) -> Result<Evaluation, EvaluationError> {
        let count = configuration.len();
        let mut energy = 0.0;
        let mut forces = vec![Vector3::zeros(); count];

        for bond in &self.bonds {
            for index in [bond.i, bond.j] {
                if index >= count {
                    return Err(EvaluationError::ParticleIndex { index, count });
                }
            }

            let delta = configuration[bond.j] - configuration[bond.i];
            let dist = delta.norm();
            energy += potentials::harmonic_bond(dist, bond.rest_length, bond.force_constant);

            // The direction is undefined for coincident particles; no force is applied.
            if dist < COINCIDENT_DISTANCE {
                continue;
            }
            let d_energy =
                potentials::harmonic_bond_derivative(dist, bond.rest_length, bond.force_constant);
            let pull = delta * (d_energy / dist);
            forces[bond.i] += pull;
            forces[bond.j] -= pull;
        }

        Ok(Evaluation::new(energy, forces))
    }

    fn platform_name(&self) -> &str {
        REFERENCE_PLATFORM
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn stretched_dimer() -> Configuration {
        Configuration::from_coordinates(&[[0.0, 0.0, 0.0], [0.0, 0.0, 2.0]])
    }

    #[test]
    fn stretched_dimer_has_expected_energy_and_opposite_forces() {
        let mut model = HarmonicBondModel::dimer(10.0, 1.0);
        let eval = model.evaluate(&stretched_dimer()).unwrap();

        assert!((eval.energy - 10.0).abs() < TOLERANCE);
        assert!((eval.forces[0] - Vector3::new(0.0, 0.0, 20.0)).norm() < TOLERANCE);
        assert!((eval.forces[1] - Vector3::new(0.0, 0.0, -20.0)).norm() < TOLERANCE);
    }

    #[test]
    fn dimer_at_rest_length_is_force_free() {
        let mut model = HarmonicBondModel::dimer(10.0, 1.0);
        let config = Configuration::from_coordinates(&[[1.0, 1.0, 1.0], [1.0, 2.0, 1.0]]);
        let eval = model.evaluate(&config).unwrap();

        assert!(eval.energy.abs() < TOLERANCE);
        assert!(eval.forces.iter().all(|f| f.norm() < TOLERANCE));
    }

    #[test]
    fn forces_match_negative_finite_difference_gradient() {
        let mut model = HarmonicBondModel::chain(3, 4.0, 1.2);
        let config =
            Configuration::from_coordinates(&[[0.0, 0.0, 0.0], [0.9, 0.3, 0.0], [1.5, 1.4, -0.2]]);
        let eval = model.evaluate(&config).unwrap();
        let h = 1e-6;

        for particle in 0..config.len() {
            for axis in 0..3 {
                let mut plus = config.clone();
                plus[particle][axis] += h;
                let mut minus = config.clone();
                minus[particle][axis] -= h;
                let e_plus = model.evaluate(&plus).unwrap().energy;
                let e_minus = model.evaluate(&minus).unwrap().energy;
                let numeric_force = -(e_plus - e_minus) / (2.0 * h);
                assert!(
                    (eval.forces[particle][axis] - numeric_force).abs() < 1e-5,
                    "particle {particle}, axis {axis}"
                );
            }
        }
    }

    #[test]
    fn coincident_particles_produce_no_force() {
        let mut model = HarmonicBondModel::dimer(1.0, 1.0);
        let config = Configuration::from_coordinates(&[[0.5; 3], [0.5; 3]]);
        let eval = model.evaluate(&config).unwrap();

        assert!((eval.energy - 1.0).abs() < TOLERANCE);
        assert!(eval.forces.iter().all(|f| f.iter().all(|c| c.is_finite())));
    }

    #[test]
    fn bond_referencing_missing_particle_is_rejected() {
        let mut model = HarmonicBondModel::chain(3, 1.0, 1.0);
        let config = stretched_dimer();
        let result = model.evaluate(&config);
        assert!(matches!(
            result,
            Err(EvaluationError::ParticleIndex { index: 2, count: 2 })
        ));
    }

    #[test]
    fn chain_builds_consecutive_bonds() {
        let model = HarmonicBondModel::chain(4, 2.0, 1.5);
        let pairs: Vec<_> = model.bonds().iter().map(|b| (b.i, b.j)).collect();
        assert_eq!(pairs, vec![(0, 1), (1, 2), (2, 3)]);
        assert_eq!(model.platform_name(), "Reference");
    }
}
