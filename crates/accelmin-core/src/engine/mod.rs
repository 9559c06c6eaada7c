//! # Engine Module
//!
//! The stateful half of AccelMin: everything that runs while a configuration is being
//! minimized.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Step size, iteration cap, energy tolerance and the
//!   L-BFGS tuning knobs, with validation
//! - **Error Handling** ([`error`]) - The `MinimizerError` taxonomy; every variant raised
//!   during a run names the iteration it happened at
//! - **Checked Evaluation** ([`evaluator`]) - Wraps an `EnergyModel` and rejects
//!   non-finite or mis-sized results
//! - **Update Rules** ([`rules`]) - Nesterov momentum and the L-BFGS baseline
//! - **Run Loop** ([`minimize`]) - Drives any rule to completion with uniform stopping
//!   and reporting
//! - **State Tracking** ([`state`]) - Momentum state and run outcomes
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//!
//! A failed run never leaves a half-minimized configuration behind: the loop operates on a
//! private copy and writes it back only on success.

pub mod config;
pub mod error;
pub mod evaluator;
pub mod minimize;
pub mod progress;
pub mod rules;
pub mod state;
