// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Matching of trajectory waters to reference waters across multiple trajectories.

use std::path::{Path, PathBuf};

use hashbrown::HashSet;
use indexmap::IndexMap;

use crate::analysis::assignment::{resolve_assignment, Assignment};
use crate::analysis::containment::water_in_spheres;
use crate::analysis::{for_each_trajectory, CancellationToken, RunOptions};
use crate::config::AnalysisConfig;
use crate::errors::{AnalysisError, ConfigError};
use crate::io::pdb_io::ReferenceWaters;
use crate::io::traj_io::TrajReader;
use crate::progress::ProgressObserver;
use crate::structures::{
    residue::ResidueKey,
    trajectory::{Frame, TrajectoryId},
    vector3d::Vector3D,
};

/// Number of reference waters matched in a single trajectory frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameMatch {
    model: usize,
    count: usize,
}

impl FrameMatch {
    /// Create a new `FrameMatch`.
    pub fn new(model: usize, count: usize) -> Self {
        FrameMatch { model, count }
    }

    /// Get the model number of the frame.
    #[inline(always)]
    pub fn get_model(&self) -> usize {
        self.model
    }

    /// Get the number of matched reference waters.
    #[inline(always)]
    pub fn get_count(&self) -> usize {
        self.count
    }
}

/// Trajectory frame in which all reference waters have been matched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompleteMatch {
    trajectory: TrajectoryId,
    model: usize,
}

impl CompleteMatch {
    /// Create a new `CompleteMatch`.
    pub fn new(trajectory: TrajectoryId, model: usize) -> Self {
        CompleteMatch { trajectory, model }
    }

    /// Get the identity of the trajectory.
    #[inline(always)]
    pub fn get_trajectory(&self) -> &TrajectoryId {
        &self.trajectory
    }

    /// Get the model number of the frame.
    #[inline(always)]
    pub fn get_model(&self) -> usize {
        self.model
    }
}

/// Numbers of matched reference waters for all frames of all analyzed trajectories.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCounts {
    n_slots: usize,
    trajectories: IndexMap<TrajectoryId, Vec<FrameMatch>>,
}

impl MatchCounts {
    /// Get the number of reference waters.
    #[inline(always)]
    pub fn get_n_slots(&self) -> usize {
        self.n_slots
    }

    /// Get the frame matches of all trajectories, in the order in which the trajectories were provided.
    #[inline(always)]
    pub fn get_trajectories(&self) -> &IndexMap<TrajectoryId, Vec<FrameMatch>> {
        &self.trajectories
    }

    /// Get the frame matches of the given trajectory.
    #[inline(always)]
    pub fn get(&self, trajectory: &TrajectoryId) -> Option<&[FrameMatch]> {
        self.trajectories.get(trajectory).map(Vec::as_slice)
    }

    /// Get the total number of analyzed frames.
    pub fn n_frames(&self) -> usize {
        self.trajectories.values().map(Vec::len).sum()
    }

    /// Get the number of frames for each match count (`0..=n_slots`).
    pub fn totals(&self) -> Vec<usize> {
        self.categories().iter().map(Vec::len).collect()
    }

    /// Group the analyzed frames by their match count.
    ///
    /// Item `n` of the returned vector contains the (trajectory, model) pairs
    /// of all frames with exactly `n` matched reference waters.
    pub fn categories(&self) -> Vec<Vec<(&TrajectoryId, usize)>> {
        let mut categories = vec![Vec::new(); self.n_slots + 1];

        for (id, frames) in self.trajectories.iter() {
            for frame in frames {
                categories[frame.count].push((id, frame.model));
            }
        }

        categories
    }
}

/// Matches waters in trajectories to reference waters.
///
/// Each trajectory water is tested for containment in spheres of radius `config.radius`
/// centered on the reference waters. Waters competing for the same reference are resolved
/// by `resolve_assignment`.
///
/// ## Example
/// Counting the matched reference waters in each frame of two trajectories.
/// ```no_run
/// # use watrack_rs::prelude::*;
/// #
/// let config = AnalysisConfig::default().with_radius(1.0).with_threads(2);
/// let keys = vec![ResidueKey::new("A", "201"), ResidueKey::new("A", "202")];
/// let reference = read_reference_waters("reference.pdb", &keys, &config.convention).unwrap();
///
/// let counts = WaterMatcher::new(&reference, &config)
///     .unwrap()
///     .count_matches(&["1/trajectory_1.pdb", "1/trajectory_2.pdb"])
///     .unwrap();
///
/// for (count, frames) in counts.totals().iter().enumerate() {
///     println!("{} frames with {} matched waters", frames, count);
/// }
/// ```
pub struct WaterMatcher<'a> {
    reference: &'a ReferenceWaters,
    centers: Vec<Vector3D>,
    config: &'a AnalysisConfig,
    progress: Option<&'a dyn ProgressObserver>,
    cancellation: Option<&'a CancellationToken>,
}

impl<'a> WaterMatcher<'a> {
    /// Create a new matcher for the reference waters.
    ///
    /// ## Returns
    /// `ConfigError::NoWaters` if no reference water has been located.
    /// Other `ConfigError` if the configuration is invalid.
    pub fn new(
        reference: &'a ReferenceWaters,
        config: &'a AnalysisConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if reference.get_n_locations() == 0 {
            return Err(ConfigError::NoWaters);
        }

        Ok(WaterMatcher {
            reference,
            centers: reference.positions(),
            config,
            progress: None,
            cancellation: None,
        })
    }

    /// Report progress of the analysis to the observer.
    pub fn with_progress(mut self, observer: &'a dyn ProgressObserver) -> Self {
        self.progress = Some(observer);
        self
    }

    /// Allow cancelling the analysis using the token.
    pub fn with_cancellation(mut self, token: &'a CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Get the number of reference slots.
    #[inline(always)]
    pub fn n_slots(&self) -> usize {
        self.centers.len()
    }

    /// Get the reference slots satisfied by each water of the frame.
    /// Waters satisfying no slot are not included.
    pub fn frame_candidates(&self, frame: &Frame) -> IndexMap<ResidueKey, Vec<usize>> {
        frame
            .get_waters()
            .iter()
            .filter_map(|(key, position)| {
                let slots = water_in_spheres(position, &self.centers, self.config.radius);
                if slots.is_empty() {
                    None
                } else {
                    Some((key.clone(), slots))
                }
            })
            .collect()
    }

    /// Assign waters of the frame to the reference slots.
    pub fn assign_frame(&self, frame: &Frame) -> Assignment {
        resolve_assignment(&self.frame_candidates(frame))
    }

    /// Count the matched reference waters in each frame of each trajectory.
    ///
    /// ## Notes
    /// - Trajectories are identified by their directory and numeric suffix.
    ///   If several trajectories share the same identity, their frames are merged.
    pub fn count_matches<P: AsRef<Path>>(
        &self,
        trajectories: &[P],
    ) -> Result<MatchCounts, AnalysisError> {
        let paths = collect_paths(trajectories)?;

        colog_info!(
            "Matching {} reference water(s) in {} trajectory file(s)...",
            self.n_slots(),
            paths.len()
        );

        let results = for_each_trajectory(&paths, self.options(), |path| {
            self.count_trajectory(path)
        })?;

        let mut counts = IndexMap::new();
        for (id, frames) in results {
            merge_frames(&mut counts, id, frames);
        }

        Ok(MatchCounts {
            n_slots: self.n_slots(),
            trajectories: counts,
        })
    }

    /// Find all frames in which all reference waters are matched.
    ///
    /// ## Returns
    /// - Complete matches ordered by trajectory (in the order of `trajectories`) and then by frame.
    /// - `AnalysisError::MissingReferences` if any of the requested waters was not found in the reference structure.
    /// - `AnalysisError::MissingResidues` if, in the first frame of the first trajectory, some reference water
    ///   is not satisfied by any trajectory water. Such a search could never be successful.
    ///
    /// ## Notes
    /// - Only the very first inspected frame is checked for coverage.
    ///   Later trajectories starting with an uncovered reference water are searched normally.
    pub fn find_complete_matches<P: AsRef<Path>>(
        &self,
        trajectories: &[P],
    ) -> Result<Vec<CompleteMatch>, AnalysisError> {
        if !self.reference.get_missing().is_empty() {
            return Err(AnalysisError::MissingReferences(
                self.reference.get_missing().to_vec(),
            ));
        }

        let paths = collect_paths(trajectories)?;

        colog_info!(
            "Searching for frames matching all {} reference water(s) in {} trajectory file(s)...",
            self.n_slots(),
            paths.len()
        );

        let first = paths[0].as_path();
        let results = for_each_trajectory(&paths, self.options(), |path| {
            self.complete_trajectory(path, path == first)
        })?;

        let matches = results.into_iter().flatten().collect::<Vec<CompleteMatch>>();
        colog_info!("Found {} complete match(es).", matches.len());

        Ok(matches)
    }

    fn count_trajectory(&self, path: &Path) -> Result<(TrajectoryId, Vec<FrameMatch>), AnalysisError> {
        let reader = TrajReader::open(path, &self.config.convention)?;
        let id = reader.get_id();
        let mut frames = Vec::new();

        for frame in reader {
            self.options().check_cancelled()?;
            let frame = frame?;
            frames.push(FrameMatch::new(frame.get_model(), self.assign_frame(&frame).len()));
        }

        Ok((id, frames))
    }

    fn complete_trajectory(
        &self,
        path: &Path,
        check_coverage: bool,
    ) -> Result<Vec<CompleteMatch>, AnalysisError> {
        let reader = TrajReader::open(path, &self.config.convention)?;
        let id = reader.get_id();
        let mut matches = Vec::new();

        for (index, frame) in reader.enumerate() {
            self.options().check_cancelled()?;
            let frame = frame?;
            let candidates = self.frame_candidates(&frame);

            if check_coverage && index == 0 {
                self.check_coverage(&id, &candidates)?;
            }

            if resolve_assignment(&candidates).is_complete(self.n_slots()) {
                matches.push(CompleteMatch::new(id.clone(), frame.get_model()));
            }
        }

        Ok(matches)
    }

    /// Check that each reference slot is satisfied by at least one candidate.
    fn check_coverage(
        &self,
        id: &TrajectoryId,
        candidates: &IndexMap<ResidueKey, Vec<usize>>,
    ) -> Result<(), AnalysisError> {
        let covered = candidates
            .values()
            .flatten()
            .copied()
            .collect::<HashSet<usize>>();

        let missing = self
            .reference
            .get_locations()
            .iter()
            .enumerate()
            .filter(|(slot, _)| !covered.contains(slot))
            .map(|(_, location)| location.get_key().clone())
            .collect::<Vec<ResidueKey>>();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AnalysisError::MissingResidues(id.clone(), missing))
        }
    }

    fn options(&self) -> RunOptions<'a> {
        RunOptions {
            n_threads: self.config.n_threads,
            progress: self.progress,
            cancellation: self.cancellation,
        }
    }
}

fn collect_paths<P: AsRef<Path>>(trajectories: &[P]) -> Result<Vec<PathBuf>, ConfigError> {
    if trajectories.is_empty() {
        return Err(ConfigError::NoTrajectories);
    }

    Ok(trajectories
        .iter()
        .map(|p| p.as_ref().to_path_buf())
        .collect())
}

fn merge_frames(
    counts: &mut IndexMap<TrajectoryId, Vec<FrameMatch>>,
    id: TrajectoryId,
    frames: Vec<FrameMatch>,
) {
    match counts.get_mut(&id) {
        Some(existing) => {
            colog_warn!(
                "Trajectory {} in `{}` has been provided multiple times. Frames are merged.",
                id,
                id.get_directory().display()
            );
            existing.extend(frames);
        }
        None => {
            counts.insert(id, frames);
        }
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/
