use super::minimizer::Minimizer;
use crate::engine::error::MinimizerError;
use crate::engine::progress::{Progress, ProgressReporter};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::{info, instrument};

/// Timing and energy summary of one minimizer run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BenchmarkRecord {
    pub name: String,
    pub platform: String,
    pub particle_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    pub initial_energy: f64,
    pub final_energy: f64,
    pub iterations: usize,
    /// Wall-clock time spent inside `minimize`, excluding the energy queries around it.
    pub elapsed_seconds: f64,
}

impl fmt::Display for BenchmarkRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Minimizer: {}", self.name)?;
        writeln!(f, "Platform: {}", self.platform)?;
        writeln!(f, "Particles: {}", self.particle_count)?;
        if let Some(device) = &self.device {
            writeln!(f, "Device: {}", device)?;
        }
        writeln!(f, "Initial energy: {:.4}", self.initial_energy)?;
        writeln!(f, "Final energy: {:.4}", self.final_energy)?;
        writeln!(f, "Iterations: {}", self.iterations)?;
        write!(f, "Elapsed time: {:.4} s", self.elapsed_seconds)
    }
}

/// A set of records, serialized as `[[runs]]` tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub runs: Vec<BenchmarkRecord>,
}

impl BenchmarkReport {
    /// The record with the lowest final energy.
    pub fn best(&self) -> Option<&BenchmarkRecord> {
        self.runs
            .iter()
            .min_by(|a, b| a.final_energy.total_cmp(&b.final_energy))
    }

    /// The record with the shortest elapsed time.
    pub fn fastest(&self) -> Option<&BenchmarkRecord> {
        self.runs
            .iter()
            .min_by(|a, b| a.elapsed_seconds.total_cmp(&b.elapsed_seconds))
    }
}

/// Queries the energy, minimizes, and queries it again, timing only the minimization.
#[instrument(skip_all, name = "benchmark", fields(minimizer = minimizer.name()))]
pub fn run(
    minimizer: &mut dyn Minimizer,
    reporter: &ProgressReporter,
) -> Result<BenchmarkRecord, MinimizerError> {
    let initial_energy = minimizer.energy()?;

    let start = Instant::now();
    let outcome = minimizer.minimize_with_progress(reporter)?;
    let elapsed_seconds = start.elapsed().as_secs_f64();

    let final_energy = minimizer.energy()?;

    let record = BenchmarkRecord {
        name: minimizer.name().to_string(),
        platform: minimizer.platform_name().to_string(),
        particle_count: minimizer.particle_count(),
        device: minimizer.device_name().map(str::to_string),
        initial_energy,
        final_energy,
        iterations: outcome.iterations,
        elapsed_seconds,
    };
    reporter.report(Progress::Message(format!(
        "{} finished in {:.4} s",
        record.name, record.elapsed_seconds
    )));
    info!(
        initial_energy,
        final_energy,
        iterations = record.iterations,
        elapsed_seconds,
        "Benchmark run complete."
    );
    Ok(record)
}
