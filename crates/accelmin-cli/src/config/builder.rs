use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileSystemConfig};
use super::models::{AppConfig, BaselineSettings, NesterovSettings, SystemSpec};
use crate::cli::ScenarioArgs;
use crate::error::{CliError, Result};
use accelmin::engine::config::{LbfgsConfig, MinimizerConfigBuilder};
use std::str::FromStr;

/// Merges built-in defaults, the scenario file, `-S` values and CLI flags, in increasing
/// order of precedence.
pub fn build_config(args: &ScenarioArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let system = merge_system(file_config.system.take(), &defaults);
    system.validate()?;

    let nesterov_file = file_config.nesterov.take().unwrap_or_default();
    let nesterov = NesterovSettings {
        step_size: args
            .step_size
            .or(nesterov_file.step_size)
            .unwrap_or(defaults.step_size),
        iterations: args
            .iterations
            .or(nesterov_file.iterations)
            .unwrap_or(defaults.iterations),
    };
    MinimizerConfigBuilder::new()
        .step_size(nesterov.step_size)
        .max_iterations(nesterov.iterations)
        .build()
        .map_err(|e| CliError::Config(format!("[nesterov] {}", e)))?;

    let baseline_file = file_config.baseline.take().unwrap_or_default();
    let lbfgs_defaults = LbfgsConfig::default();
    let lbfgs = LbfgsConfig {
        memory_size: baseline_file
            .memory_size
            .unwrap_or(lbfgs_defaults.memory_size),
        gradient_rms_tolerance: baseline_file
            .gradient_tolerance
            .unwrap_or(lbfgs_defaults.gradient_rms_tolerance),
        max_displacement: baseline_file
            .max_displacement
            .unwrap_or(lbfgs_defaults.max_displacement),
        ..lbfgs_defaults
    };
    lbfgs
        .validate()
        .map_err(|e| CliError::Config(format!("[baseline] {}", e)))?;

    let baseline = BaselineSettings {
        energy_tolerance: args
            .energy_tolerance
            .or(baseline_file.energy_tolerance)
            .unwrap_or(defaults.energy_tolerance),
        max_iterations: args
            .max_iterations
            .or(baseline_file.max_iterations)
            .unwrap_or(defaults.max_iterations),
        lbfgs,
    };
    let builder = MinimizerConfigBuilder::new()
        .step_size(1.0)
        .energy_tolerance(baseline.energy_tolerance);
    let builder = match baseline.max_iterations {
        0 => builder.unbounded(),
        cap => builder.max_iterations(cap),
    };
    builder
        .build()
        .map_err(|e| CliError::Config(format!("[baseline] {}", e)))?;

    Ok(AppConfig {
        system,
        nesterov,
        baseline,
    })
}

fn merge_system(file_val: Option<FileSystemConfig>, defaults: &DefaultsConfig) -> SystemSpec {
    match file_val {
        None => SystemSpec::HarmonicDimer {
            force_constant: defaults.force_constant,
            rest_length: defaults.rest_length,
            initial_separation: defaults.initial_separation,
        },
        Some(FileSystemConfig::HarmonicDimer {
            force_constant,
            rest_length,
            initial_separation,
        }) => SystemSpec::HarmonicDimer {
            force_constant: force_constant.unwrap_or(defaults.force_constant),
            rest_length: rest_length.unwrap_or(defaults.rest_length),
            initial_separation: initial_separation.unwrap_or(defaults.initial_separation),
        },
        Some(FileSystemConfig::HarmonicChain {
            particles,
            force_constant,
            rest_length,
            initial_spacing,
        }) => SystemSpec::HarmonicChain {
            particles: particles.unwrap_or(defaults.chain_particles),
            force_constant: force_constant.unwrap_or(defaults.force_constant),
            rest_length: rest_length.unwrap_or(defaults.rest_length),
            initial_spacing: initial_spacing.unwrap_or(defaults.initial_separation),
        },
        Some(FileSystemConfig::QuadraticWell {
            particles,
            stiffness,
            offset,
        }) => SystemSpec::QuadraticWell {
            particles: particles.unwrap_or(defaults.well_particles),
            stiffness: stiffness.unwrap_or(defaults.well_stiffness),
            offset: offset.unwrap_or(defaults.well_offset),
        },
        Some(FileSystemConfig::LennardJonesCluster {
            per_side,
            spacing,
            r_min,
            well_depth,
        }) => SystemSpec::LennardJonesCluster {
            per_side: per_side.unwrap_or(defaults.cluster_per_side),
            spacing: spacing.unwrap_or(defaults.cluster_spacing),
            r_min: r_min.unwrap_or(defaults.r_min),
            well_depth: well_depth.unwrap_or(defaults.well_depth),
        },
    }
}

fn parse_value<T: FromStr>(key: &str, value_str: &str, kind: &str) -> Result<T> {
    value_str.parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value_str))
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "nesterov.step-size" => {
                config
                    .nesterov
                    .get_or_insert_with(Default::default)
                    .step_size = Some(parse_value(key, value_str, "float")?);
            }
            "nesterov.iterations" => {
                config
                    .nesterov
                    .get_or_insert_with(Default::default)
                    .iterations = Some(parse_value(key, value_str, "integer")?);
            }
            "baseline.energy-tolerance" => {
                config
                    .baseline
                    .get_or_insert_with(Default::default)
                    .energy_tolerance = Some(parse_value(key, value_str, "float")?);
            }
            "baseline.max-iterations" => {
                config
                    .baseline
                    .get_or_insert_with(Default::default)
                    .max_iterations = Some(parse_value(key, value_str, "integer")?);
            }
            "baseline.memory-size" => {
                config
                    .baseline
                    .get_or_insert_with(Default::default)
                    .memory_size = Some(parse_value(key, value_str, "integer")?);
            }
            "baseline.gradient-tolerance" => {
                config
                    .baseline
                    .get_or_insert_with(Default::default)
                    .gradient_tolerance = Some(parse_value(key, value_str, "float")?);
            }
            "baseline.max-displacement" => {
                config
                    .baseline
                    .get_or_insert_with(Default::default)
                    .max_displacement = Some(parse_value(key, value_str, "float")?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use accelmin::core::forcefield::model::EnergyModel;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::{TempDir, tempdir};

    fn write_config(content: &str) -> (TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scenario.toml");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    fn args_with_file(path: PathBuf) -> ScenarioArgs {
        ScenarioArgs {
            config: Some(path),
            ..ScenarioArgs::default()
        }
    }

    #[test]
    fn build_config_without_file_uses_defaults() {
        let defaults = DefaultsConfig::default();
        let app = build_config(&ScenarioArgs::default()).expect("build ok");

        assert_eq!(
            app.system,
            SystemSpec::HarmonicDimer {
                force_constant: 10.0,
                rest_length: 1.0,
                initial_separation: 2.0,
            }
        );
        assert_eq!(app.nesterov.step_size, defaults.step_size);
        assert_eq!(app.nesterov.iterations, defaults.iterations);
        assert_eq!(app.baseline.energy_tolerance, defaults.energy_tolerance);
        assert_eq!(app.baseline.max_iterations, 0);
        assert_eq!(app.baseline.lbfgs, LbfgsConfig::default());
    }

    #[test]
    fn build_config_reads_file_and_merges() {
        let (_dir, path) = write_config(
            r#"
            [system]
            type = "quadratic-well"
            particles = 3
            stiffness = [1.0, 1.0, 1000.0]

            [nesterov]
            step-size = 0.0005
            iterations = 200

            [baseline]
            energy-tolerance = 1e-10
            max-iterations = 400
            memory-size = 5
            "#,
        );

        let app = build_config(&args_with_file(path)).expect("build ok");

        assert_eq!(
            app.system,
            SystemSpec::QuadraticWell {
                particles: 3,
                stiffness: [1.0, 1.0, 1000.0],
                offset: DefaultsConfig::default().well_offset,
            }
        );
        assert_eq!(app.nesterov.step_size, 0.0005);
        assert_eq!(app.nesterov.iterations, 200);
        assert_eq!(app.baseline.energy_tolerance, 1e-10);
        assert_eq!(app.baseline.max_iterations, 400);
        assert_eq!(app.baseline.lbfgs.memory_size, 5);
    }

    #[test]
    fn cli_flags_override_set_values_and_file() {
        let (_dir, path) = write_config(
            r#"
            [nesterov]
            step-size = 0.01
            iterations = 10
            "#,
        );
        let args = ScenarioArgs {
            config: Some(path),
            step_size: Some(0.002),
            set_values: vec![
                "nesterov.step-size=0.005".to_string(),
                "nesterov.iterations=42".to_string(),
            ],
            ..ScenarioArgs::default()
        };

        let app = build_config(&args).expect("build ok");

        assert_eq!(app.nesterov.step_size, 0.002);
        assert_eq!(app.nesterov.iterations, 42);
    }

    #[test]
    fn set_values_reach_every_baseline_key() {
        let args = ScenarioArgs {
            set_values: vec![
                "baseline.energy-tolerance=1e-9".to_string(),
                "baseline.max-iterations=123".to_string(),
                "baseline.memory-size=3".to_string(),
                "baseline.gradient-tolerance=1e-6".to_string(),
                "baseline.max-displacement=0.1".to_string(),
            ],
            ..ScenarioArgs::default()
        };

        let app = build_config(&args).expect("build ok");

        assert!((app.baseline.energy_tolerance - 1e-9).abs() < 1e-24);
        assert_eq!(app.baseline.max_iterations, 123);
        assert_eq!(app.baseline.lbfgs.memory_size, 3);
        assert!((app.baseline.lbfgs.gradient_rms_tolerance - 1e-6).abs() < 1e-24);
        assert!((app.baseline.lbfgs.max_displacement - 0.1).abs() < 1e-12);
    }

    #[test]
    fn malformed_set_values_are_rejected() {
        for bad in ["nesterov.step-size", "nesterov.iterations=ten", "system.type=dimer"] {
            let args = ScenarioArgs {
                set_values: vec![bad.to_string()],
                ..ScenarioArgs::default()
            };
            assert!(
                matches!(build_config(&args), Err(CliError::Config(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn unknown_file_keys_are_parse_errors() {
        let (_dir, path) = write_config(
            r#"
            [nesterov]
            step-size = 0.001
            momentum = 0.9
            "#,
        );
        let result = build_config(&args_with_file(path));
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn invalid_parameters_are_reported_as_config_errors() {
        let args = ScenarioArgs {
            step_size: Some(-1.0),
            ..ScenarioArgs::default()
        };
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));

        let args = ScenarioArgs {
            set_values: vec!["baseline.memory-size=0".to_string()],
            ..ScenarioArgs::default()
        };
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));

        let (_dir, path) = write_config(
            r#"
            [system]
            type = "harmonic-chain"
            particles = 1
            "#,
        );
        assert!(matches!(
            build_config(&args_with_file(path)),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn uncapped_baseline_with_zero_tolerance_is_rejected() {
        let args = ScenarioArgs {
            energy_tolerance: Some(0.0),
            set_values: vec!["baseline.gradient-tolerance=0".to_string()],
            ..ScenarioArgs::default()
        };
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));

        let capped = ScenarioArgs {
            energy_tolerance: Some(0.0),
            max_iterations: Some(100),
            ..ScenarioArgs::default()
        };
        assert!(build_config(&capped).is_ok());
    }

    #[test]
    fn every_system_type_builds_a_consistent_model() {
        let (_dir, path) = write_config(
            r#"
            [system]
            type = "lennard-jones-cluster"
            per-side = 2
            spacing = 1.1
            "#,
        );
        let cluster = build_config(&args_with_file(path)).unwrap().system;

        let systems = [
            SystemSpec::HarmonicDimer {
                force_constant: 10.0,
                rest_length: 1.0,
                initial_separation: 2.0,
            },
            SystemSpec::HarmonicChain {
                particles: 5,
                force_constant: 2.0,
                rest_length: 1.0,
                initial_spacing: 1.5,
            },
            SystemSpec::QuadraticWell {
                particles: 2,
                stiffness: [1.0, 2.0, 3.0],
                offset: 0.5,
            },
            cluster,
        ];
        let expected_counts = [2, 5, 2, 8];

        for (system, expected) in systems.iter().zip(expected_counts) {
            let (mut model, configuration) = system.build();
            assert_eq!(configuration.len(), expected, "{}", system.label());
            let evaluation = model.evaluate(&configuration).unwrap();
            assert_eq!(evaluation.forces.len(), expected);
            assert!(evaluation.energy.is_finite());
            assert_eq!(model.platform_name(), "Reference");
        }
    }
}
