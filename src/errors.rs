// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of errors and warnings returned by `watrack_rs`.

use std::fmt::Display;
use std::path::Path;
use thiserror::Error;

use crate::structures::residue::ResidueKey;
use crate::structures::trajectory::TrajectoryId;

/// Errors that can occur when parsing residue keys (`CHAIN:ID`).
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseResidueError {
    #[error("Could not parse `{0}` as a residue key. Expected format is `CHAIN:ID`.")]
    InvalidKey(String),
    #[error("List of water ids is empty. No correct water ids were detected.")]
    NoKeys,
}

/// Errors that can occur when parsing a single atom line.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseAtomError {
    #[error("Atom line contains {0} fields, at least {1} are required.")]
    TooFewFields(usize, usize),
    #[error("Could not parse `{0}` as a coordinate.")]
    InvalidCoordinate(String),
}

/// Errors that can occur when reading a reference structure.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReadReferenceError {
    #[error("Reference structure `{0}` was not found.")]
    FileNotFound(Box<Path>),
    #[error("Could not read line {1} of reference structure `{0}`.")]
    LineNotFound(Box<Path>, usize),
    #[error("Could not parse line {1} of reference structure `{0}`: `{2}`.")]
    ParseLineErr(Box<Path>, usize, String),
}

/// Errors that can occur when reading a trajectory file.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReadTrajError {
    #[error("Trajectory file `{0}` was not found.")]
    FileNotFound(Box<Path>),
    #[error("Trajectory file `{0}` is empty.")]
    EmptyFile(Box<Path>),
    #[error("Could not read line {1} of trajectory file `{0}`.")]
    LineNotFound(Box<Path>, usize),
    #[error("Could not read the initial model number from the header of trajectory file `{0}`: `{1}`.")]
    InvalidHeader(Box<Path>, String),
    #[error("Could not parse line {1} of trajectory file `{0}` as atom: `{2}`.")]
    ParseAtomLineErr(Box<Path>, usize, String),
    #[error("Could not parse coordinates at line {1} of trajectory file `{0}`: `{2}`.")]
    ParseCoordinatesErr(Box<Path>, usize, String),
}

/// Errors that can occur when reading a simulation report file.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReadReportError {
    #[error("Report file `{0}` was not found.")]
    FileNotFound(Box<Path>),
    #[error("Could not read line {1} of report file `{0}`.")]
    LineNotFound(Box<Path>, usize),
    #[error("Line {1} of report file `{0}` has no column {2}.")]
    MissingColumn(Box<Path>, usize, usize),
    #[error("Could not parse value in column {2} at line {1} of report file `{0}`.")]
    ParseValueErr(Box<Path>, usize, usize),
    #[error("Report file `{0}` contains no entry for model {1}.")]
    MissingModel(Box<Path>, usize),
}

/// Errors that can occur when reading a dump of tracked coordinates.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReadCoordinatesError {
    #[error("Coordinate file `{0}` was not found.")]
    FileNotFound(Box<Path>),
    #[error("Coordinate file `{0}` does not specify a reference structure.")]
    MissingReference(Box<Path>),
    #[error("Could not parse line {1} of coordinate file `{0}`: `{2}`.")]
    ParseLineErr(Box<Path>, usize, String),
}

/// Errors that can occur when writing output files.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum WriteError {
    #[error("File `{0}` could not be created.")]
    CouldNotCreate(Box<Path>),
    #[error("Could not write into the output file.")]
    CouldNotWrite,
    #[error("Reference structure `{0}` could not be read.")]
    ReferenceNotFound(Box<Path>),
}

/// Errors in the configuration of an analysis. Detected before any trajectory is read.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("List of trajectories is empty.")]
    NoTrajectories,
    #[error("List of water ids is empty.")]
    NoWaters,
    #[error("Radius must be positive, not `{0}`.")]
    InvalidRadius(f32),
    #[error("Number of threads must be positive.")]
    InvalidThreads,
    #[error("Configuration file `{0}` was not found.")]
    FileNotFound(Box<Path>),
    #[error("Could not parse configuration file `{0}`: {1}")]
    ParseYamlErr(Box<Path>, String),
    #[error("Invalid glob pattern `{0}`.")]
    InvalidPattern(String),
}

/// Errors that can occur while analyzing trajectories.
#[derive(Error, Debug, PartialEq)]
pub enum AnalysisError {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Residue(#[from] ParseResidueError),
    #[error("{0}")]
    Reference(#[from] ReadReferenceError),
    #[error("{0}")]
    Trajectory(#[from] ReadTrajError),
    #[error("{0}")]
    Report(#[from] ReadReportError),
    #[error("Missing residues: {} could not be matched in the first frame of trajectory `{}`.", join_keys(.1), .0)]
    MissingResidues(TrajectoryId, Vec<ResidueKey>),
    #[error("Missing residues: {} not found in the reference structure.", join_keys(.0))]
    MissingReferences(Vec<ResidueKey>),
    #[error("Analysis was cancelled.")]
    Cancelled,
}

fn join_keys(keys: &[ResidueKey]) -> String {
    keys.iter()
        .map(|key| format!("`{}`", key))
        .collect::<Vec<String>>()
        .join(", ")
}

/// Non-fatal problems detected during an analysis.
/// The analysis proceeds with the reduced input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Requested water residue is not present in the reference structure.
    ResidueNotFound(ResidueKey),
    /// Trajectory path pattern did not match any file.
    PatternNotMatched(String),
}

impl Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::ResidueNotFound(key) => write!(
                f,
                "water residue `{}` could not be found in the reference structure",
                key
            ),
            Warning::PatternNotMatched(pattern) => {
                write!(f, "trajectory path `{}` not found", pattern)
            }
        }
    }
}
