// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of the trajectory identity and of the trajectory frame.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::structures::{residue::ResidueKey, vector3d::Vector3D};

/// Identity of a trajectory: directory containing the trajectory file and the numeric suffix of the file.
///
/// For `output/3/trajectory_12.pdb`, the directory is `output/3` and the suffix is `12`.
/// The identity is used as a key when aggregating results and when
/// looking up the report file belonging to the trajectory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrajectoryId {
    directory: PathBuf,
    suffix: String,
}

impl TrajectoryId {
    /// Create a new `TrajectoryId` from its parts.
    pub fn new(directory: impl AsRef<Path>, suffix: &str) -> Self {
        TrajectoryId {
            directory: directory.as_ref().to_path_buf(),
            suffix: suffix.to_owned(),
        }
    }

    /// Derive the identity of a trajectory from the path to its file.
    /// The suffix is the part of the file name following the last underscore, up to the next dot.
    /// If the name contains no underscore, the name up to its first dot is used.
    ///
    /// ## Example
    /// ```
    /// # use watrack_rs::structures::trajectory::TrajectoryId;
    /// # use std::path::Path;
    /// #
    /// let id = TrajectoryId::from_path("output/3/trajectory_12.pdb");
    /// assert_eq!(id.get_directory(), Path::new("output/3"));
    /// assert_eq!(id.get_suffix(), "12");
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        let suffix = name
            .rsplit('_')
            .next()
            .and_then(|last| last.split('.').next())
            .unwrap_or_default();

        TrajectoryId {
            directory,
            suffix: suffix.to_owned(),
        }
    }

    /// Get the directory containing the trajectory.
    #[inline(always)]
    pub fn get_directory(&self) -> &Path {
        &self.directory
    }

    /// Get the numeric suffix of the trajectory file.
    #[inline(always)]
    pub fn get_suffix(&self) -> &str {
        &self.suffix
    }

    /// Get the epoch of the trajectory, i.e. the name of its directory if it is a number.
    /// Returns "0" for trajectories in non-numbered directories.
    pub fn get_epoch(&self) -> String {
        match self.directory.file_name().map(|x| x.to_string_lossy()) {
            Some(name) if !name.is_empty() && name.chars().all(|c| c.is_ascii_digit()) => {
                name.to_string()
            }
            _ => String::from("0"),
        }
    }

    /// Get path to the report file associated with this trajectory.
    pub fn report_path(&self, prefix: &str) -> PathBuf {
        self.directory.join(format!("{}{}", prefix, self.suffix))
    }
}

impl Display for TrajectoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (epoch {})", self.suffix, self.get_epoch())
    }
}

/// Single snapshot of a trajectory: model number and the positions of the solvent oxygens,
/// keyed by residue and stored in the order in which they appear in the file.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    model: usize,
    waters: IndexMap<ResidueKey, Vector3D>,
}

impl Frame {
    /// Create a new empty frame.
    pub fn new(model: usize) -> Self {
        Frame {
            model,
            waters: IndexMap::new(),
        }
    }

    /// Add a water to the frame. Replaces the position of the water if it is already present.
    pub fn add_water(&mut self, key: ResidueKey, position: Vector3D) {
        self.waters.insert(key, position);
    }

    /// Get the model number of the frame.
    #[inline(always)]
    pub fn get_model(&self) -> usize {
        self.model
    }

    /// Get the waters of the frame.
    #[inline(always)]
    pub fn get_waters(&self) -> &IndexMap<ResidueKey, Vector3D> {
        &self.waters
    }

    /// Get position of the water with the given key.
    #[inline(always)]
    pub fn get_water(&self, key: &ResidueKey) -> Option<&Vector3D> {
        self.waters.get(key)
    }

    /// Get the number of waters in the frame.
    #[inline(always)]
    pub fn get_n_waters(&self) -> usize {
        self.waters.len()
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/
