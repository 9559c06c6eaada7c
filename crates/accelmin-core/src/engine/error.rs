use super::config::ConfigError;
use crate::core::forcefield::model::EvaluationError;
use std::fmt;
use thiserror::Error;

/// The quantity in which a NaN or infinity was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Position,
    Force,
    Energy,
    MomentumCoefficient,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Quantity::Position => "position",
            Quantity::Force => "force",
            Quantity::Energy => "energy",
            Quantity::MomentumCoefficient => "momentum coefficient",
        };
        f.write_str(name)
    }
}

/// Why a minimization run was aborted.
///
/// `iteration` is zero for failures in the initial evaluation and `k` for failures
/// raised while performing the k-th update.
#[derive(Debug, Error)]
pub enum MinimizerError {
    #[error("Configuration must contain at least one particle")]
    EmptyConfiguration,

    #[error("Invalid minimizer configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(
        "Dimension mismatch at iteration {iteration}: expected {expected} force vectors, got {found}"
    )]
    DimensionMismatch {
        iteration: usize,
        expected: usize,
        found: usize,
    },

    #[error("Non-finite {quantity} at iteration {iteration}{}", particle_suffix(.particle))]
    NonFiniteValue {
        iteration: usize,
        quantity: Quantity,
        particle: Option<usize>,
    },

    #[error("Energy evaluation failed at iteration {iteration}: {source}")]
    EvaluatorFailure {
        iteration: usize,
        #[source]
        source: EvaluationError,
    },
}

fn particle_suffix(particle: &Option<usize>) -> String {
    particle
        .map(|p| format!(" (particle {p})"))
        .unwrap_or_default()
}

impl MinimizerError {
    /// Iteration at which the run was aborted, when the failure happened inside the loop.
    pub fn iteration(&self) -> Option<usize> {
        match self {
            MinimizerError::DimensionMismatch { iteration, .. }
            | MinimizerError::NonFiniteValue { iteration, .. }
            | MinimizerError::EvaluatorFailure { iteration, .. } => Some(*iteration),
            MinimizerError::EmptyConfiguration | MinimizerError::Config(_) => None,
        }
    }
}
