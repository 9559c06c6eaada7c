//! Data structures describing particle systems.

pub mod configuration;
