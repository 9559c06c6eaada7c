//! # Workflows Module
//!
//! The user-facing layer. A [`minimizer::Minimizer`] is an energy model bound to a
//! configuration and an update rule; it can report its energy, minimize itself, and
//! describe the platform it runs on. [`benchmark`] times such a minimizer and turns the
//! result into a printable, serializable record.
//!
//! ```ignore
//! use accelmin::core::forcefield::harmonic::HarmonicBondModel;
//! use accelmin::workflows::minimizer::NesterovMinimizer;
//! use accelmin::workflows::benchmark;
//!
//! let mut minimizer =
//!     NesterovMinimizer::nesterov(HarmonicBondModel::dimer(10.0, 1.0), start, 1e-3, 500)?;
//! let record = benchmark::run(&mut minimizer, &ProgressReporter::new())?;
//! println!("{record}");
//! ```

pub mod benchmark;
pub mod minimizer;
