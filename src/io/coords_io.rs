// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of functions for writing and reading plain-text dumps of tracked water coordinates.
//!
//! ## Format
//! ```text
//! path/to/reference.pdb
//! A201   1.000  -2.500  10.125
//! A201   1.250  -2.375  10.000
//! B12   -5.000   0.000   3.000
//! ```
//! The first line contains the path to the reference structure.
//! Each following line contains a water label (chain immediately followed by residue id)
//! and the coordinates of a single tracked position.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use getset::Getters;
use indexmap::IndexMap;

use crate::analysis::statistics::PositionStatistics;
use crate::analysis::tracking::WaterTracks;
use crate::errors::{ReadCoordinatesError, WriteError};
use crate::io::format_coordinate;
use crate::structures::vector3d::Vector3D;

/// ## Methods for writing coordinate dumps.
impl WaterTracks {
    /// Write all tracked positions into a plain-text coordinate file.
    ///
    /// ## Returns
    /// `Ok` if writing has been successful. Otherwise `WriteError`.
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
    ///     .track(&["trajectory_1.pdb"])
    ///     .unwrap();
    ///
    /// tracks.write_coordinates("reference.pdb", "WaterTracking.out").unwrap();
    /// ```
    pub fn write_coordinates(
        &self,
        reference: impl AsRef<Path>,
        filename: impl AsRef<Path>,
    ) -> Result<(), WriteError> {
        let output = File::create(filename.as_ref())
            .map_err(|_| WriteError::CouldNotCreate(Box::from(filename.as_ref())))?;

        let mut writer = BufWriter::new(output);

        writeln!(writer, "{}", reference.as_ref().display()).map_err(|_| WriteError::CouldNotWrite)?;

        for (key, series) in self.get_series() {
            let label = key.to_label();
            for position in series.get_positions() {
                writeln!(
                    writer,
                    "{} {} {} {}",
                    label,
                    format_coordinate(position.x),
                    format_coordinate(position.y),
                    format_coordinate(position.z)
                )
                .map_err(|_| WriteError::CouldNotWrite)?;
            }
        }

        writer.flush().map_err(|_| WriteError::CouldNotWrite)?;

        Ok(())
    }
}

/// Contents of a coordinate dump.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct CoordinateDump {
    /// Path to the reference structure.
    #[getset(get = "pub")]
    reference: PathBuf,
    /// Positions of each water, in the order in which the waters first appear in the file.
    #[getset(get = "pub")]
    positions: IndexMap<String, Vec<Vector3D>>,
}

impl CoordinateDump {
    /// Calculate statistics of the positions of each water.
    pub fn statistics(&self) -> IndexMap<&str, PositionStatistics> {
        self.positions
            .iter()
            .filter_map(|(label, positions)| {
                PositionStatistics::from_positions(positions).map(|stats| (label.as_str(), stats))
            })
            .collect()
    }
}

/// Read a coordinate dump.
///
/// ## Returns
/// - `CoordinateDump` if successful.
/// - `ReadCoordinatesError::MissingReference` if the file is empty or its first line is blank.
/// - `ReadCoordinatesError::ParseLineErr` if any line does not contain a label and three coordinates.
///
/// Blank lines are skipped.
pub fn read_coordinates(filename: impl AsRef<Path>) -> Result<CoordinateDump, ReadCoordinatesError> {
    let file = File::open(filename.as_ref())
        .map_err(|_| ReadCoordinatesError::FileNotFound(Box::from(filename.as_ref())))?;

    let mut lines = BufReader::new(file).lines().enumerate();

    let reference = match lines.next() {
        Some((_, Ok(line))) if !line.trim().is_empty() => PathBuf::from(line.trim()),
        _ => {
            return Err(ReadCoordinatesError::MissingReference(Box::from(
                filename.as_ref(),
            )))
        }
    };

    let mut positions: IndexMap<String, Vec<Vector3D>> = IndexMap::new();

    for (i, raw_line) in lines {
        let line_number = i + 1;
        let parse_error = |line: &str| {
            ReadCoordinatesError::ParseLineErr(
                Box::from(filename.as_ref()),
                line_number,
                line.to_owned(),
            )
        };

        let line = raw_line.map_err(|_| parse_error(""))?;
        if line.trim().is_empty() {
            continue;
        }

        let (label, position) = parse_line(&line).ok_or_else(|| parse_error(&line))?;
        positions.entry(label.to_owned()).or_default().push(position);
    }

    Ok(CoordinateDump {
        reference,
        positions,
    })
}

fn parse_line(line: &str) -> Option<(&str, Vector3D)> {
    let mut fields = line.split_whitespace();
    let label = fields.next()?;

    let mut coordinates = [0.0f32; 3];
    for coordinate in coordinates.iter_mut() {
        *coordinate = fields.next()?.parse::<f32>().ok()?;
    }

    Some((label, coordinates.into()))
}

/******************************/
/*         UNIT TESTS         */
/******************************/
