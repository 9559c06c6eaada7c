use crate::cli::{CompareArgs, Method};
use crate::config::build_config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use accelmin::engine::progress::ProgressReporter;
use accelmin::workflows::benchmark::BenchmarkReport;
use anyhow::Context;
use std::path::Path;
use tracing::info;

pub fn run(args: CompareArgs) -> Result<()> {
    info!("Merging configuration from defaults, file and CLI arguments...");
    let config = build_config(&args.scenario)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Comparing minimizers on {}...", config.system.label());
    let mut report = BenchmarkReport::default();
    for method in [Method::Nesterov, Method::Lbfgs] {
        let record = super::benchmark_method(method, &config, &reporter)?;
        println!("\n{}", record);
        report.runs.push(record);
    }

    if let (Some(best), Some(fastest)) = (report.best(), report.fastest()) {
        println!(
            "\nLowest final energy: {} ({:.4})\nFastest: {} ({:.4} s)",
            best.name, best.final_energy, fastest.name, fastest.elapsed_seconds
        );
    }

    if let Some(path) = &args.report {
        write_report(&report, path)?;
        println!("Report written to: {}", path.display());
    }
    Ok(())
}

fn write_report(report: &BenchmarkReport, path: &Path) -> Result<()> {
    info!("Writing benchmark report to {:?}", path);
    let content = toml::to_string(report)
        .context("Failed to serialize benchmark report")
        .map_err(CliError::Other)?;
    std::fs::write(path, content)?;
    Ok(())
}
