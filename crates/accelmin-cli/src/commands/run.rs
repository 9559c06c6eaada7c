use crate::cli::RunArgs;
use crate::config::build_config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use accelmin::engine::progress::ProgressReporter;
use tracing::info;

pub fn run(args: RunArgs) -> Result<()> {
    info!("Merging configuration from defaults, file and CLI arguments...");
    let config = build_config(&args.scenario)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Minimizing {}...", config.system.label());
    let record = super::benchmark_method(args.method, &config, &reporter)?;

    println!("\n{}", record);
    Ok(())
}
