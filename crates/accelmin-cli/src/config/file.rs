use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "kebab-case")]
pub enum FileSystemConfig {
    HarmonicDimer {
        force_constant: Option<f64>,
        rest_length: Option<f64>,
        initial_separation: Option<f64>,
    },
    HarmonicChain {
        particles: Option<usize>,
        force_constant: Option<f64>,
        rest_length: Option<f64>,
        initial_spacing: Option<f64>,
    },
    QuadraticWell {
        particles: Option<usize>,
        stiffness: Option<[f64; 3]>,
        offset: Option<f64>,
    },
    LennardJonesCluster {
        per_side: Option<usize>,
        spacing: Option<f64>,
        r_min: Option<f64>,
        well_depth: Option<f64>,
    },
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileNesterovConfig {
    pub step_size: Option<f64>,
    pub iterations: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileBaselineConfig {
    pub energy_tolerance: Option<f64>,
    pub max_iterations: Option<usize>,
    pub memory_size: Option<usize>,
    pub gradient_tolerance: Option<f64>,
    pub max_displacement: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub system: Option<FileSystemConfig>,
    pub nesterov: Option<FileNesterovConfig>,
    pub baseline: Option<FileBaselineConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading scenario from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
