//! # AccelMin Core Library
//!
//! A local energy-minimization engine for particle systems. It provides an accelerated
//! first-order optimizer (Nesterov's accelerated gradient scheme) and a limited-memory
//! BFGS baseline behind one uniform minimizer surface, so the two can be benchmarked
//! against each other on the same energy model.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data (`Configuration`), the `EnergyModel`
//!   interface through which all energies and forces are obtained, analytic potentials,
//!   and a handful of reference energy models.
//!
//! - **[`engine`]: The Logic Core.** Configuration, error taxonomy, progress reporting,
//!   the update rules (`NesterovRule`, `LbfgsRule`) and the shared minimization loop that
//!   drives them.
//!
//! - **[`workflows`]: The Public API.** Bound minimizers exposing `minimize`, `energy`
//!   and particle/platform introspection, plus the benchmark reporter that times them.

pub mod core;
pub mod engine;
pub mod workflows;
