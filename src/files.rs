// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Functions for locating input trajectory files and naming output files.

use std::path::{Path, PathBuf};

use crate::errors::{ConfigError, Warning};

/// Expand trajectory path patterns into a list of trajectory files.
///
/// ## Returns
/// - Paths to the matched files (in the order of the patterns; matches of each pattern sorted alphabetically)
///   and warnings about patterns that matched no file.
/// - `ConfigError::InvalidPattern` if any of the patterns is not a valid glob pattern.
/// - `ConfigError::NoTrajectories` if no file has been matched.
///
/// ## Example
/// ```no_run
/// # use watrack_rs::files::expand_trajectories;
/// #
/// let (trajectories, warnings) = expand_trajectories(&["output/*/trajectory_*.pdb"]).unwrap();
/// for warning in warnings {
///     eprintln!("Warning: {}", warning);
/// }
/// ```
pub fn expand_trajectories<S: AsRef<str>>(
    patterns: &[S],
) -> Result<(Vec<PathBuf>, Vec<Warning>), ConfigError> {
    let mut trajectories = Vec::new();
    let mut warnings = Vec::new();

    for pattern in patterns.iter().map(|p| p.as_ref()) {
        let paths = glob::glob(pattern)
            .map_err(|_| ConfigError::InvalidPattern(pattern.to_owned()))?
            .filter_map(Result::ok)
            .filter(|path| path.is_file())
            .collect::<Vec<PathBuf>>();

        if paths.is_empty() {
            colog_warn!("Trajectory path `{}` not found.", pattern);
            warnings.push(Warning::PatternNotMatched(pattern.to_owned()));
        }

        trajectories.extend(paths);
    }

    if trajectories.is_empty() {
        return Err(ConfigError::NoTrajectories);
    }

    Ok((trajectories, warnings))
}

/// Get a path to a file with the given base name and extension in the given directory
/// which does not overwrite any existing file.
///
/// `{name}.{extension}` is used if it does not exist,
/// otherwise `{name}_1.{extension}`, `{name}_2.{extension}`, and so on.
pub fn unique_output_path(directory: impl AsRef<Path>, name: &str, extension: &str) -> PathBuf {
    let mut path = directory.as_ref().join(format!("{}.{}", name, extension));

    let mut id = 0usize;
    while path.exists() {
        id += 1;
        path = directory
            .as_ref()
            .join(format!("{}_{}.{}", name, id, extension));
    }

    path
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn expand_single_pattern() {
        let (trajectories, warnings) =
            expand_trajectories(&["test_files/tracking/trajectory_*.pdb"]).unwrap();

        assert_eq!(
            trajectories,
            vec![
                PathBuf::from("test_files/tracking/trajectory_1.pdb"),
                PathBuf::from("test_files/tracking/trajectory_2.pdb"),
            ]
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn expand_unmatched_pattern() {
        let (trajectories, warnings) = expand_trajectories(&[
            "test_files/tracking/trajectory_2.pdb",
            "test_files/nothing_*.pdb",
        ])
        .unwrap();

        assert_eq!(
            trajectories,
            vec![PathBuf::from("test_files/tracking/trajectory_2.pdb")]
        );
        assert_eq!(
            warnings,
            vec![Warning::PatternNotMatched(String::from(
                "test_files/nothing_*.pdb"
            ))]
        );
    }

    #[test]
    fn expand_nothing() {
        assert_eq!(
            expand_trajectories(&["test_files/nothing_*.pdb"]),
            Err(ConfigError::NoTrajectories)
        );
        assert_eq!(
            expand_trajectories::<&str>(&[]),
            Err(ConfigError::NoTrajectories)
        );
    }

    #[test]
    fn expand_invalid_pattern() {
        assert_eq!(
            expand_trajectories(&["test_files/[.pdb"]),
            Err(ConfigError::InvalidPattern(String::from("test_files/[.pdb")))
        );
    }

    #[test]
    fn unique_paths() {
        let directory = TempDir::new().unwrap();

        let first = unique_output_path(directory.path(), "WaterTracking", "out");
        assert_eq!(first, directory.path().join("WaterTracking.out"));
        File::create(&first).unwrap();

        let second = unique_output_path(directory.path(), "WaterTracking", "out");
        assert_eq!(second, directory.path().join("WaterTracking_1.out"));
        File::create(&second).unwrap();

        let third = unique_output_path(directory.path(), "WaterTracking", "out");
        assert_eq!(third, directory.path().join("WaterTracking_2.out"));
    }
}
