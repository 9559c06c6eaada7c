use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu, William A. Goddard III, Victor Wai Tak Kam",
    version,
    about = "AccelMin CLI - Minimize particle systems with Nesterov's accelerated gradient and compare against an L-BFGS baseline.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used by parallel energy models.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Minimize a system with a single method and print its benchmark record.
    Run(RunArgs),
    /// Minimize the same system with both methods and compare the results.
    Compare(CompareArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Fixed-step Nesterov accelerated gradient.
    Nesterov,
    /// Limited-memory BFGS with a backtracking line search.
    Lbfgs,
}

/// Scenario selection shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct ScenarioArgs {
    /// Path to a scenario file in TOML format. Built-in defaults are used when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Nesterov Overrides ---
    /// Override the Nesterov step size (a unitless scale factor on the force).
    #[arg(long, value_name = "FLOAT")]
    pub step_size: Option<f64>,

    /// Override the number of Nesterov iterations.
    #[arg(long, value_name = "INT")]
    pub iterations: Option<usize>,

    // --- Baseline Overrides ---
    /// Override the L-BFGS energy tolerance.
    #[arg(long, value_name = "FLOAT")]
    pub energy_tolerance: Option<f64>,

    /// Override the L-BFGS iteration cap (0 for no cap).
    #[arg(long, value_name = "INT")]
    pub max_iterations: Option<usize>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S nesterov.step-size=0.002
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,

    /// Minimization method to use.
    #[arg(short, long, value_enum, default_value_t = Method::Nesterov)]
    pub method: Method,
}

/// Arguments for the `compare` subcommand.
#[derive(Args, Debug)]
pub struct CompareArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,

    /// Write both benchmark records to a TOML report.
    #[arg(short, long, value_name = "PATH")]
    pub report: Option<PathBuf>,
}
