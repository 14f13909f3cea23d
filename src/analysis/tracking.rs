// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Tracking positions of named waters across trajectories.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::analysis::statistics::{PositionStatistics, Statistics};
use crate::analysis::{for_each_trajectory, CancellationToken, RunOptions};
use crate::config::AnalysisConfig;
use crate::errors::{AnalysisError, ConfigError};
use crate::io::traj_io::TrajReader;
use crate::progress::ProgressObserver;
use crate::structures::{residue::ResidueKey, vector3d::Vector3D};

/// Positions of a single water in the order in which they were read.
///
/// Positions collected from consecutive trajectories are concatenated.
/// Start of each trajectory is recorded as a segment so that shifts
/// can be calculated with or without the jumps between trajectories.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplacementSeries {
    positions: Vec<Vector3D>,
    segments: Vec<usize>,
}

impl DisplacementSeries {
    /// Append positions read from a single trajectory.
    pub fn push_segment(&mut self, positions: Vec<Vector3D>) {
        if positions.is_empty() {
            return;
        }

        self.segments.push(self.positions.len());
        self.positions.extend(positions);
    }

    /// Get all positions of the water.
    #[inline(always)]
    pub fn get_positions(&self) -> &[Vector3D] {
        &self.positions
    }

    /// Get the number of positions.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` if the water has never been observed.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Iterate over the positions from individual trajectories.
    pub fn segments(&self) -> impl Iterator<Item = &[Vector3D]> {
        self.segments.iter().enumerate().map(move |(i, &start)| {
            let end = self
                .segments
                .get(i + 1)
                .copied()
                .unwrap_or(self.positions.len());
            &self.positions[start..end]
        })
    }

    /// Distances between all consecutive positions, including the jumps between trajectories.
    pub fn shifts(&self) -> Vec<f32> {
        consecutive_distances(&self.positions)
    }

    /// Distances between consecutive positions read from the same trajectory.
    pub fn segment_shifts(&self) -> Vec<f32> {
        self.segments().flat_map(consecutive_distances).collect()
    }

    /// Mean and variance of the shifts of the water.
    /// If `per_trajectory` is `true`, jumps between trajectories are not included.
    /// Returns `None` if there are no shifts.
    pub fn shift_statistics(&self, per_trajectory: bool) -> Option<Statistics> {
        if per_trajectory {
            Statistics::from_values(&self.segment_shifts())
        } else {
            Statistics::from_values(&self.shifts())
        }
    }

    /// Statistics of the positions of the water.
    /// Returns `None` if there are no positions.
    pub fn position_statistics(&self) -> Option<PositionStatistics> {
        PositionStatistics::from_positions(&self.positions)
    }
}

impl From<Vec<Vector3D>> for DisplacementSeries {
    fn from(positions: Vec<Vector3D>) -> Self {
        let mut series = DisplacementSeries::default();
        series.push_segment(positions);
        series
    }
}

fn consecutive_distances(positions: &[Vector3D]) -> Vec<f32> {
    positions
        .windows(2)
        .map(|pair| pair[0].distance(&pair[1]))
        .collect()
}

/// Displacement series of the tracked waters, in the order in which the waters were requested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaterTracks {
    series: IndexMap<ResidueKey, DisplacementSeries>,
}

impl WaterTracks {
    /// Get the displacement series of all tracked waters.
    #[inline(always)]
    pub fn get_series(&self) -> &IndexMap<ResidueKey, DisplacementSeries> {
        &self.series
    }

    /// Get the displacement series of the given water.
    #[inline(always)]
    pub fn get(&self, key: &ResidueKey) -> Option<&DisplacementSeries> {
        self.series.get(key)
    }
}

impl From<IndexMap<ResidueKey, DisplacementSeries>> for WaterTracks {
    fn from(series: IndexMap<ResidueKey, DisplacementSeries>) -> Self {
        WaterTracks { series }
    }
}

/// Collects positions of named waters from trajectories.
///
/// Every occurrence of a tracked water is recorded, regardless of its position.
///
/// ## Example
/// ```no_run
/// # use watrack_rs::prelude::*;
/// #
/// let keys = vec![ResidueKey::new("A", "201")];
/// let config = AnalysisConfig::default();
///
/// let tracks = WaterTracker::new(&keys, &config)
///     .unwrap()
///     .track(&["1/trajectory_1.pdb", "2/trajectory_1.pdb"])
///     .unwrap();
///
/// for (key, series) in tracks.get_series() {
///     if let Some(stats) = series.shift_statistics(true) {
///         println!("Water {}: {}", key, stats);
///     }
/// }
/// ```
pub struct WaterTracker<'a> {
    keys: &'a [ResidueKey],
    config: &'a AnalysisConfig,
    progress: Option<&'a dyn ProgressObserver>,
    cancellation: Option<&'a CancellationToken>,
}

impl<'a> WaterTracker<'a> {
    /// Create a new tracker of the given waters.
    ///
    /// ## Returns
    /// `ConfigError::NoWaters` if `keys` is empty. Other `ConfigError` if the configuration is invalid.
    pub fn new(keys: &'a [ResidueKey], config: &'a AnalysisConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        if keys.is_empty() {
            return Err(ConfigError::NoWaters);
        }

        Ok(WaterTracker {
            keys,
            config,
            progress: None,
            cancellation: None,
        })
    }

    /// Report progress of the tracking to the observer.
    pub fn with_progress(mut self, observer: &'a dyn ProgressObserver) -> Self {
        self.progress = Some(observer);
        self
    }

    /// Allow cancelling the tracking using the token.
    pub fn with_cancellation(mut self, token: &'a CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Collect positions of the tracked waters from all frames of the trajectories.
    ///
    /// Positions are ordered by trajectory (in the order of `trajectories`) and then by frame.
    pub fn track<P: AsRef<Path>>(&self, trajectories: &[P]) -> Result<WaterTracks, AnalysisError> {
        if trajectories.is_empty() {
            return Err(ConfigError::NoTrajectories.into());
        }

        let paths = trajectories
            .iter()
            .map(|p| p.as_ref().to_path_buf())
            .collect::<Vec<PathBuf>>();

        colog_info!(
            "Tracking {} water(s) in {} trajectory file(s)...",
            self.keys.len(),
            paths.len()
        );

        let per_trajectory = for_each_trajectory(&paths, self.options(), |path| {
            self.track_trajectory(path)
        })?;

        let mut series = self
            .keys
            .iter()
            .map(|key| (key.clone(), DisplacementSeries::default()))
            .collect::<IndexMap<ResidueKey, DisplacementSeries>>();

        for positions in per_trajectory {
            for (key, points) in positions {
                if let Some(water) = series.get_mut(&key) {
                    water.push_segment(points);
                }
            }
        }

        Ok(WaterTracks { series })
    }

    /// Collect positions of the tracked waters from a single trajectory.
    fn track_trajectory(
        &self,
        path: &Path,
    ) -> Result<IndexMap<ResidueKey, Vec<Vector3D>>, AnalysisError> {
        let reader = TrajReader::open(path, &self.config.convention)?;
        let mut positions = self
            .keys
            .iter()
            .map(|key| (key.clone(), Vec::new()))
            .collect::<IndexMap<ResidueKey, Vec<Vector3D>>>();

        for frame in reader {
            self.options().check_cancelled()?;
            let frame = frame?;

            for (key, points) in positions.iter_mut() {
                if let Some(position) = frame.get_water(key) {
                    points.push(*position);
                }
            }
        }

        Ok(positions)
    }

    fn options(&self) -> RunOptions<'a> {
        RunOptions {
            n_threads: self.config.n_threads,
            progress: self.progress,
            cancellation: self.cancellation,
        }
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ReadTrajError;
    use float_cmp::assert_approx_eq;

    fn series_from(points: &[[f32; 3]]) -> Vec<Vector3D> {
        points.iter().map(|&p| Vector3D::from(p)).collect()
    }

    #[test]
    fn concatenates_trajectories() {
        let keys = vec![ResidueKey::new("A", "1")];
        let config = AnalysisConfig::default();

        let tracks = WaterTracker::new(&keys, &config)
            .unwrap()
            .track(&[
                "test_files/tracking/trajectory_1.pdb",
                "test_files/tracking/trajectory_2.pdb",
            ])
            .unwrap();

        let series = tracks.get(&ResidueKey::new("A", "1")).unwrap();
        assert_eq!(
            series.get_positions(),
            series_from(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [5.0, 5.0, 5.0]]).as_slice()
        );
        assert_eq!(series.segments().count(), 2);
    }

    #[test]
    fn concatenates_trajectories_parallel() {
        let keys = vec![ResidueKey::new("A", "1"), ResidueKey::new("B", "7")];
        let config = AnalysisConfig::default().with_threads(4);

        let tracks = WaterTracker::new(&keys, &config)
            .unwrap()
            .track(&[
                "test_files/tracking/trajectory_2.pdb",
                "test_files/tracking/trajectory_1.pdb",
                "test_files/tracking/trajectory_2.pdb",
            ])
            .unwrap();

        assert_eq!(
            tracks.get_series().keys().collect::<Vec<&ResidueKey>>(),
            vec![&ResidueKey::new("A", "1"), &ResidueKey::new("B", "7")]
        );

        let series = tracks.get(&ResidueKey::new("A", "1")).unwrap();
        assert_eq!(
            series.get_positions(),
            series_from(&[
                [5.0, 5.0, 5.0],
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [5.0, 5.0, 5.0]
            ])
            .as_slice()
        );

        // B:7 never appears in the trajectories
        assert!(tracks.get(&ResidueKey::new("B", "7")).unwrap().is_empty());
    }

    #[test]
    fn track_fails_on_malformed() {
        let keys = vec![ResidueKey::new("A", "1")];
        let config = AnalysisConfig::default();

        match WaterTracker::new(&keys, &config)
            .unwrap()
            .track(&["test_files/trajectory_short.pdb"])
        {
            Err(AnalysisError::Trajectory(ReadTrajError::ParseAtomLineErr(_, 5, _))) => (),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn track_invalid_input() {
        let config = AnalysisConfig::default();

        assert!(matches!(
            WaterTracker::new(&[], &config),
            Err(ConfigError::NoWaters)
        ));

        let keys = vec![ResidueKey::new("A", "1")];
        let tracker = WaterTracker::new(&keys, &config).unwrap();
        assert_eq!(
            tracker.track::<&str>(&[]),
            Err(AnalysisError::Config(ConfigError::NoTrajectories))
        );
    }

    #[test]
    fn track_cancelled() {
        let keys = vec![ResidueKey::new("A", "1")];
        let config = AnalysisConfig::default();
        let token = CancellationToken::new();
        token.cancel();

        let result = WaterTracker::new(&keys, &config)
            .unwrap()
            .with_cancellation(&token)
            .track(&["test_files/tracking/trajectory_1.pdb"]);

        assert_eq!(result, Err(AnalysisError::Cancelled));
    }

    #[test]
    fn shifts() {
        let mut series = DisplacementSeries::from(series_from(&[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 2.0, 0.0],
        ]));
        series.push_segment(Vec::new());
        series.push_segment(series_from(&[[4.0, 6.0, 0.0], [4.0, 6.0, 3.0]]));

        assert_eq!(series.len(), 5);
        assert_eq!(series.segments().count(), 2);

        let shifts = series.shifts();
        assert_eq!(shifts.len(), 4);
        assert_approx_eq!(f32, shifts[0], 1.0);
        assert_approx_eq!(f32, shifts[1], 2.0);
        assert_approx_eq!(f32, shifts[2], 5.0);
        assert_approx_eq!(f32, shifts[3], 3.0);

        let segment_shifts = series.segment_shifts();
        assert_eq!(segment_shifts.len(), 3);
        assert_approx_eq!(f32, segment_shifts[0], 1.0);
        assert_approx_eq!(f32, segment_shifts[1], 2.0);
        assert_approx_eq!(f32, segment_shifts[2], 3.0);

        let all = series.shift_statistics(false).unwrap();
        assert_approx_eq!(f32, all.mean, 2.75);
        assert_approx_eq!(f32, all.variance, 2.1875);

        let per_trajectory = series.shift_statistics(true).unwrap();
        assert_approx_eq!(f32, per_trajectory.mean, 2.0);
        assert_approx_eq!(f32, per_trajectory.variance, 2.0 / 3.0);
    }

    #[test]
    fn shifts_single_position() {
        let series = DisplacementSeries::from(series_from(&[[1.0, 1.0, 1.0]]));
        assert!(series.shifts().is_empty());
        assert!(series.shift_statistics(true).is_none());
        assert!(series.position_statistics().is_some());
    }

    #[test]
    fn empty_series() {
        let series = DisplacementSeries::from(Vec::new());
        assert!(series.is_empty());
        assert_eq!(series.segments().count(), 0);
        assert!(series.position_statistics().is_none());
    }
}
