// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of the analysis configuration.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Default radius of the sphere around each reference water (in Å).
pub const DEFAULT_RADIUS: f32 = 1.5;
/// Default width of the progress bar (in characters).
pub const DEFAULT_PROGRESS_WIDTH: usize = 50;
/// Default base name of the output files.
pub const DEFAULT_OUTPUT_NAME: &str = "WaterTracking";

/// Naming convention used to identify solvent atoms in structure and trajectory files.
///
/// Reference structures identify water oxygens with the generic oxygen name (`O`),
/// while trajectories use the simulation water oxygen name (`OW`).
/// This allows distinguishing crystallographic waters from simulation waters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolventConvention {
    /// Record name of the atom lines. Default: `HETATM`.
    pub record: String,
    /// Record name starting a new frame of the trajectory. Default: `MODEL`.
    pub model: String,
    /// Residue name of the waters. Default: `HOH`.
    pub residue: String,
    /// Atom name of the water oxygen in the reference structure. Default: `O`.
    pub reference_oxygen: String,
    /// Atom name of the water oxygen in the trajectories. Default: `OW`.
    pub trajectory_oxygen: String,
}

impl Default for SolventConvention {
    fn default() -> Self {
        SolventConvention {
            record: String::from("HETATM"),
            model: String::from("MODEL"),
            residue: String::from("HOH"),
            reference_oxygen: String::from("O"),
            trajectory_oxygen: String::from("OW"),
        }
    }
}

/// Layout of the report files accompanying the trajectories.
/// Columns are numbered from 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportLayout {
    /// Prefix of the report file name. The report of trajectory `trajectory_N` is `{prefix}N`. Default: `report_`.
    pub prefix: String,
    /// Column containing the total energy. Default: 4.
    pub total_energy: usize,
    /// Column containing the binding energy. Default: 5.
    pub binding_energy: usize,
    /// Column containing the RMSD. Default: 6.
    pub rmsd: usize,
}

impl Default for ReportLayout {
    fn default() -> Self {
        ReportLayout {
            prefix: String::from("report_"),
            total_energy: 4,
            binding_energy: 5,
            rmsd: 6,
        }
    }
}

/// Parameters of the water analysis.
///
/// ## Example
/// Reading the configuration from a YAML file:
/// ```no_run
/// # use watrack_rs::prelude::*;
/// #
/// // all fields are optional
/// // radius: 2.0
/// // n_threads: 4
/// // convention:
/// //   trajectory_oxygen: OH2
/// let config = AnalysisConfig::from_file("watrack.yaml").unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Radius of the sphere around each reference water (in Å). Default: 1.5.
    pub radius: f32,
    /// Number of trajectories analyzed in parallel. Default: 1.
    pub n_threads: usize,
    /// Width of the progress bar. Default: 50.
    pub progress_width: usize,
    /// Base name of the output files. Default: `WaterTracking`.
    pub output_name: String,
    /// Naming convention of the solvent atoms.
    pub convention: SolventConvention,
    /// Layout of the report files.
    pub report: ReportLayout,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            radius: DEFAULT_RADIUS,
            n_threads: 1,
            progress_width: DEFAULT_PROGRESS_WIDTH,
            output_name: String::from(DEFAULT_OUTPUT_NAME),
            convention: SolventConvention::default(),
            report: ReportLayout::default(),
        }
    }
}

impl AnalysisConfig {
    /// Read the configuration from a YAML file and validate it.
    pub fn from_file(filename: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = File::open(filename.as_ref())
            .map_err(|_| ConfigError::FileNotFound(Box::from(filename.as_ref())))?;

        let config: AnalysisConfig = serde_yaml::from_reader(file)
            .map_err(|e| ConfigError::ParseYamlErr(Box::from(filename.as_ref()), e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Set radius of the sphere.
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    /// Set number of threads.
    pub fn with_threads(mut self, n_threads: usize) -> Self {
        self.n_threads = n_threads;
        self
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.radius.is_nan() || self.radius <= 0.0 {
            return Err(ConfigError::InvalidRadius(self.radius));
        }

        if self.n_threads == 0 {
            return Err(ConfigError::InvalidThreads);
        }

        Ok(())
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults() {
        let config = AnalysisConfig::default();
        assert_approx_eq!(f32, config.radius, 1.5);
        assert_eq!(config.n_threads, 1);
        assert_eq!(config.progress_width, 50);
        assert_eq!(config.output_name, "WaterTracking");
        assert_eq!(config.convention.residue, "HOH");
        assert_eq!(config.convention.reference_oxygen, "O");
        assert_eq!(config.convention.trajectory_oxygen, "OW");
        assert_eq!(config.report.prefix, "report_");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn from_yaml_partial() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "radius: 2.5\nn_threads: 4\nconvention:\n  trajectory_oxygen: OH2").unwrap();

        let config = AnalysisConfig::from_file(file.path()).unwrap();
        assert_approx_eq!(f32, config.radius, 2.5);
        assert_eq!(config.n_threads, 4);
        assert_eq!(config.convention.trajectory_oxygen, "OH2");
        assert_eq!(config.convention.reference_oxygen, "O");
        assert_eq!(config.report, ReportLayout::default());
    }

    #[test]
    fn from_yaml_unknown_field() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "radius: 2.5\nradious: 3.0").unwrap();

        match AnalysisConfig::from_file(file.path()) {
            Err(ConfigError::ParseYamlErr(_, _)) => (),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn from_yaml_nonexistent() {
        match AnalysisConfig::from_file("test_files/nonexistent.yaml") {
            Err(ConfigError::FileNotFound(_)) => (),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn validate_fails() {
        assert_eq!(
            AnalysisConfig::default().with_radius(0.0).validate(),
            Err(ConfigError::InvalidRadius(0.0))
        );
        assert_eq!(
            AnalysisConfig::default().with_threads(0).validate(),
            Err(ConfigError::InvalidThreads)
        );
    }
}
