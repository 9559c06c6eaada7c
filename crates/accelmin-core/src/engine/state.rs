use crate::core::models::configuration::Configuration;

/// Per-run state of the Nesterov momentum scheme.
///
/// `a_cur`/`a_old` are the momentum coefficients, `y_cur`/`y_old` the look-ahead points.
/// Both buffers always hold exactly as many particles as the configuration being
/// minimized; [`MomentumState::reset`] re-establishes that at the start of each run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MomentumState {
    pub a_cur: f64,
    pub a_old: f64,
    pub y_cur: Configuration,
    pub y_old: Configuration,
}

impl MomentumState {
    pub fn new(configuration: &Configuration) -> Self {
        let mut state = Self::default();
        state.reset(configuration);
        state
    }

    pub fn reset(&mut self, configuration: &Configuration) {
        self.a_cur = 0.0;
        self.a_old = 0.0;
        if self.y_old.len() == configuration.len() {
            self.y_old.copy_from(configuration);
            self.y_cur.copy_from(configuration);
        } else {
            self.y_old = configuration.clone();
            self.y_cur = configuration.clone();
        }
    }

    #[inline]
    pub fn particle_count(&self) -> usize {
        self.y_old.len()
    }
}

/// Summary of a completed minimization run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimizationOutcome {
    /// Energy from a fresh evaluation at the final configuration.
    pub final_energy: f64,
    pub initial_energy: f64,
    pub iterations: usize,
    /// Number of energy model evaluations, including the initial one.
    pub evaluations: usize,
    /// Whether the run stopped on a convergence criterion rather than the iteration cap.
    pub converged: bool,
    /// RMSD between the starting and final configurations.
    pub rms_displacement: f64,
}
