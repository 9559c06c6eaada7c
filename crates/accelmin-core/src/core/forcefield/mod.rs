//! # Force Field Module
//!
//! Everything the minimizers know about energies lives behind the [`model::EnergyModel`]
//! trait. A model receives a configuration and returns the potential energy together with
//! the per-particle forces (the negative energy gradient). Whether the evaluation runs on a
//! CPU, in parallel, or on an accelerator is the model's own business.
//!
//! ## Key Components
//!
//! - [`model`] - The `EnergyModel` interface, the `Evaluation` result and `EvaluationError`
//! - [`potentials`] - Analytic pair potentials and their radial derivatives
//! - [`harmonic`] - Harmonic bond networks (the two-particle dimer is the canonical test case)
//! - [`quadratic`] - Separable, anisotropic quadratic wells with a known minimum
//! - [`lennard_jones`] - All-pairs 12-6 Lennard-Jones clusters
//!
//! The bundled models report the `"Reference"` platform. They exist to exercise and
//! benchmark the minimizers, not to replace a production physics backend.
//!
//! ```ignore
//! use accelmin::core::forcefield::harmonic::HarmonicBondModel;
//! use accelmin::core::forcefield::model::EnergyModel;
//!
//! let mut model = HarmonicBondModel::dimer(10.0, 1.0);
//! let evaluation = model.evaluate(&configuration)?;
//! ```

pub mod harmonic;
pub mod lennard_jones;
pub mod model;
pub(crate) mod potentials;
pub mod quadratic;

pub(crate) const REFERENCE_PLATFORM: &str = "Reference";
