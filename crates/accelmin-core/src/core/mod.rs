//! # Core Module
//!
//! Fundamental building blocks shared by every minimizer.
//!
//! - **Particle Data** ([`models`]) - The `Configuration` of particle positions
//! - **Energy Evaluation** ([`forcefield`]) - The `EnergyModel` interface, analytic
//!   potentials, and reference models used for testing and benchmarking
//! - **Geometry** ([`utils`]) - Small vector helpers over whole configurations
//!
//! Nothing in this layer holds optimizer state; the engine owns all of it.

pub mod forcefield;
pub mod models;
pub mod utils;
