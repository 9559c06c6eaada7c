use crate::error::{CliError, Result};
use accelmin::core::forcefield::harmonic::HarmonicBondModel;
use accelmin::core::forcefield::lennard_jones::LennardJonesCluster;
use accelmin::core::forcefield::model::EnergyModel;
use accelmin::core::forcefield::quadratic::QuadraticWell;
use accelmin::core::models::configuration::Configuration;
use accelmin::engine::config::LbfgsConfig;
use nalgebra::{Point3, Vector3};

/// A fully resolved test system.
#[derive(Debug, Clone, PartialEq)]
pub enum SystemSpec {
    HarmonicDimer {
        force_constant: f64,
        rest_length: f64,
        initial_separation: f64,
    },
    HarmonicChain {
        particles: usize,
        force_constant: f64,
        rest_length: f64,
        initial_spacing: f64,
    },
    QuadraticWell {
        particles: usize,
        stiffness: [f64; 3],
        offset: f64,
    },
    LennardJonesCluster {
        per_side: usize,
        spacing: f64,
        r_min: f64,
        well_depth: f64,
    },
}

impl SystemSpec {
    pub fn label(&self) -> &'static str {
        match self {
            SystemSpec::HarmonicDimer { .. } => "harmonic dimer",
            SystemSpec::HarmonicChain { .. } => "harmonic chain",
            SystemSpec::QuadraticWell { .. } => "quadratic well",
            SystemSpec::LennardJonesCluster { .. } => "Lennard-Jones cluster",
        }
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(CliError::Config(format!("{}: {}", self.label(), msg)));
        match *self {
            SystemSpec::HarmonicDimer {
                force_constant,
                rest_length,
                initial_separation,
            } => {
                if !(force_constant > 0.0 && rest_length > 0.0 && initial_separation > 0.0) {
                    return invalid("force constant, rest length and separation must be positive");
                }
            }
            SystemSpec::HarmonicChain {
                particles,
                force_constant,
                rest_length,
                initial_spacing,
            } => {
                if particles < 2 {
                    return invalid("a chain needs at least 2 particles");
                }
                if !(force_constant > 0.0 && rest_length > 0.0 && initial_spacing > 0.0) {
                    return invalid("force constant, rest length and spacing must be positive");
                }
            }
            SystemSpec::QuadraticWell {
                particles,
                stiffness,
                offset,
            } => {
                if particles == 0 {
                    return invalid("at least 1 particle is required");
                }
                if stiffness.iter().any(|k| !(*k > 0.0)) || !offset.is_finite() {
                    return invalid("stiffness must be positive and the offset finite");
                }
            }
            SystemSpec::LennardJonesCluster {
                per_side,
                spacing,
                r_min,
                well_depth,
            } => {
                if per_side < 2 {
                    return invalid("a cluster needs at least 2 particles per side");
                }
                if !(spacing > 0.0 && r_min > 0.0 && well_depth > 0.0) {
                    return invalid("spacing, r-min and well depth must be positive");
                }
            }
        }
        Ok(())
    }

    /// Builds a fresh energy model together with its starting configuration.
    pub fn build(&self) -> (Box<dyn EnergyModel>, Configuration) {
        match *self {
            SystemSpec::HarmonicDimer {
                force_constant,
                rest_length,
                initial_separation,
            } => (
                Box::new(HarmonicBondModel::dimer(force_constant, rest_length)),
                Configuration::from_coordinates(&[
                    [0.0, 0.0, 0.0],
                    [0.0, 0.0, initial_separation],
                ]),
            ),
            SystemSpec::HarmonicChain {
                particles,
                force_constant,
                rest_length,
                initial_spacing,
            } => {
                // Zig-zag start so the chain has to straighten as well as stretch.
                let positions = (0..particles)
                    .map(|i| {
                        let y = if i % 2 == 1 { 0.25 * initial_spacing } else { 0.0 };
                        Point3::new(i as f64 * initial_spacing, y, 0.0)
                    })
                    .collect();
                (
                    Box::new(HarmonicBondModel::chain(particles, force_constant, rest_length)),
                    Configuration::new(positions),
                )
            }
            SystemSpec::QuadraticWell {
                particles,
                stiffness,
                offset,
            } => {
                let centers: Vec<Point3<f64>> = (0..particles)
                    .map(|i| Point3::new(2.0 * i as f64, 0.0, 0.0))
                    .collect();
                let start = centers
                    .iter()
                    .map(|c| c + Vector3::repeat(offset))
                    .collect();
                (
                    Box::new(QuadraticWell::new(centers, Vector3::from(stiffness))),
                    Configuration::new(start),
                )
            }
            SystemSpec::LennardJonesCluster {
                per_side,
                spacing,
                r_min,
                well_depth,
            } => (
                Box::new(LennardJonesCluster::new(r_min, well_depth)),
                LennardJonesCluster::cubic_lattice(per_side, spacing),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NesterovSettings {
    pub step_size: f64,
    pub iterations: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BaselineSettings {
    pub energy_tolerance: f64,
    /// Zero means no cap.
    pub max_iterations: usize,
    pub lbfgs: LbfgsConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub system: SystemSpec,
    pub nesterov: NesterovSettings,
    pub baseline: BaselineSettings,
}
