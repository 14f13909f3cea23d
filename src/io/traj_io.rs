// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of a reader of multi-model pdb trajectories.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::config::SolventConvention;
use crate::errors::{ParseAtomError, ReadTrajError};
use crate::structures::{
    atom::AtomRecord,
    residue::ResidueKey,
    trajectory::{Frame, TrajectoryId},
    vector3d::Vector3D,
};

/// Iterator over the frames of a multi-model pdb trajectory.
///
/// ## Format
/// - The second whitespace-delimited field of the first line of the file is the number of the first model.
/// - Each line starting with `convention.model` starts a new frame with the model number incremented by one.
/// - Lines starting with `convention.record` with residue name `convention.residue` and atom name
///   `convention.trajectory_oxygen` are read as solvent oxygens.
/// - All other lines are ignored.
///
/// The reader is single-pass: each frame is read only once the previous one has been returned.
/// Reading stops after the first error.
#[derive(Debug)]
pub struct TrajReader {
    buffer: BufReader<File>,
    filename: Box<Path>,
    convention: SolventConvention,
    line_number: usize,
    current: Option<Frame>,
}

impl TrajReader {
    /// Open a trajectory file and read its header.
    ///
    /// ## Returns
    /// - `TrajReader` if the file exists and its header is valid.
    /// - `ReadTrajError::FileNotFound` if the file does not exist.
    /// - `ReadTrajError::EmptyFile` if the file is empty.
    /// - `ReadTrajError::InvalidHeader` if the initial model number can't be read.
    ///
    /// ## Example
    /// Reading all frames of a trajectory, propagating any error.
    /// ```no_run
    /// # use watrack_rs::prelude::*;
    /// # use watrack_rs::errors::ReadTrajError;
    /// # fn hidden_function() -> Result<(), ReadTrajError> {
    /// #
    /// let reader = TrajReader::open("trajectory_1.pdb", &SolventConvention::default())?;
    /// for frame in reader {
    ///     let frame = frame?;
    ///     println!("Model {} contains {} waters.", frame.get_model(), frame.get_n_waters());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn open(
        filename: impl AsRef<Path>,
        convention: &SolventConvention,
    ) -> Result<Self, ReadTrajError> {
        let file = File::open(filename.as_ref())
            .map_err(|_| ReadTrajError::FileNotFound(Box::from(filename.as_ref())))?;

        let mut buffer = BufReader::new(file);

        let mut header = String::new();
        match buffer.read_line(&mut header) {
            Ok(0) => return Err(ReadTrajError::EmptyFile(Box::from(filename.as_ref()))),
            Ok(_) => (),
            Err(_) => return Err(ReadTrajError::LineNotFound(Box::from(filename.as_ref()), 1)),
        }

        let model = header
            .split_whitespace()
            .nth(1)
            .and_then(|field| field.parse::<usize>().ok())
            .ok_or_else(|| {
                ReadTrajError::InvalidHeader(
                    Box::from(filename.as_ref()),
                    header.trim_end().to_owned(),
                )
            })?;

        Ok(TrajReader {
            buffer,
            filename: Box::from(filename.as_ref()),
            convention: convention.clone(),
            line_number: 1,
            current: Some(Frame::new(model)),
        })
    }

    /// Get the path to the trajectory file.
    #[inline(always)]
    pub fn get_filename(&self) -> &Path {
        &self.filename
    }

    /// Get the identity of the trajectory.
    #[inline(always)]
    pub fn get_id(&self) -> TrajectoryId {
        TrajectoryId::from_path(&self.filename)
    }

    /// Parse an atom line. Returns `None` if the atom is not a solvent oxygen.
    fn parse_atom(&self, line: &str) -> Result<Option<(ResidueKey, Vector3D)>, ReadTrajError> {
        let atom = AtomRecord::from_line(line).map_err(|e| self.convert_error(e, line))?;

        if !atom.is(&self.convention.residue, &self.convention.trajectory_oxygen) {
            return Ok(None);
        }

        // the position is parsed first so that short lines are reported as such
        let position = atom.get_position().map_err(|e| self.convert_error(e, line))?;
        let key = atom.get_key().map_err(|e| self.convert_error(e, line))?;

        Ok(Some((key, position)))
    }

    fn convert_error(&self, error: ParseAtomError, line: &str) -> ReadTrajError {
        match error {
            ParseAtomError::TooFewFields(_, _) => ReadTrajError::ParseAtomLineErr(
                self.filename.clone(),
                self.line_number,
                line.trim_end().to_owned(),
            ),
            ParseAtomError::InvalidCoordinate(_) => ReadTrajError::ParseCoordinatesErr(
                self.filename.clone(),
                self.line_number,
                line.trim_end().to_owned(),
            ),
        }
    }
}

impl Iterator for TrajReader {
    type Item = Result<Frame, ReadTrajError>;

    /// Read the next frame of the trajectory.
    ///
    /// ## Returns
    /// - `Some(Ok(Frame))` if the frame has been successfully read.
    /// - `Some(Err(ReadTrajError))` if the frame could not be read.
    /// - `None` if the end of the trajectory file has been reached or reading previously failed.
    fn next(&mut self) -> Option<Self::Item> {
        let mut line = String::new();

        loop {
            // reading is finished
            self.current.as_ref()?;

            line.clear();
            match self.buffer.read_line(&mut line) {
                Ok(0) => return self.current.take().map(Ok),
                Ok(_) => self.line_number += 1,
                Err(_) => {
                    self.current = None;
                    return Some(Err(ReadTrajError::LineNotFound(
                        self.filename.clone(),
                        self.line_number + 1,
                    )));
                }
            }

            if line.starts_with(&self.convention.model) {
                let next_model = self.current.as_ref().map(|f| f.get_model() + 1)?;
                return self.current.replace(Frame::new(next_model)).map(Ok);
            }

            if !line.starts_with(&self.convention.record) {
                continue;
            }

            match self.parse_atom(&line) {
                Ok(Some((key, position))) => {
                    if let Some(frame) = self.current.as_mut() {
                        frame.add_water(key, position);
                    }
                }
                Ok(None) => (),
                Err(e) => {
                    self.current = None;
                    return Some(Err(e));
                }
            }
        }
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    fn read_all(filename: &str) -> Vec<Frame> {
        TrajReader::open(filename, &SolventConvention::default())
            .unwrap()
            .collect::<Result<Vec<Frame>, ReadTrajError>>()
            .unwrap()
    }

    #[test]
    fn read_frames() {
        let frames = read_all("test_files/trajectory_1.pdb");

        assert_eq!(frames.len(), 3);
        assert_eq!(
            frames.iter().map(|f| f.get_model()).collect::<Vec<usize>>(),
            vec![1, 2, 3]
        );

        // only `OW` atoms of `HOH` residues are read
        assert_eq!(frames[0].get_n_waters(), 2);
        let water = frames[0].get_water(&ResidueKey::new("A", "1")).unwrap();
        assert_approx_eq!(f32, water.x, 0.1);
        assert_approx_eq!(f32, water.y, 0.0);
        assert_approx_eq!(f32, water.z, 0.0);

        let water = frames[0].get_water(&ResidueKey::new("B", "2")).unwrap();
        assert_approx_eq!(f32, water.z, 10.1);

        assert_eq!(frames[1].get_n_waters(), 2);
        let water = frames[1].get_water(&ResidueKey::new("B", "2")).unwrap();
        assert_approx_eq!(f32, water.x, 20.0);
        assert_approx_eq!(f32, water.y, 20.0);
        assert_approx_eq!(f32, water.z, 20.0);

        assert_eq!(frames[2].get_n_waters(), 0);
    }

    #[test]
    fn read_seeded_model_number() {
        let frames = read_all("test_files/trajectory_5.pdb");

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].get_model(), 5);
        assert_eq!(frames[1].get_model(), 6);
    }

    #[test]
    fn reader_id() {
        let reader =
            TrajReader::open("test_files/trajectory_1.pdb", &SolventConvention::default()).unwrap();
        assert_eq!(reader.get_id(), TrajectoryId::new("test_files", "1"));
        assert_eq!(reader.get_filename(), Path::new("test_files/trajectory_1.pdb"));
    }

    #[test]
    fn read_custom_convention() {
        let convention = SolventConvention {
            trajectory_oxygen: String::from("O"),
            ..SolventConvention::default()
        };

        let frames = TrajReader::open("test_files/trajectory_1.pdb", &convention)
            .unwrap()
            .collect::<Result<Vec<Frame>, ReadTrajError>>()
            .unwrap();

        // a single crystallographic water is present in the first frame
        assert_eq!(frames[0].get_n_waters(), 1);
        assert!(frames[0].get_water(&ResidueKey::new("C", "7")).is_some());
    }

    #[test]
    fn read_nonexistent() {
        match TrajReader::open("test_files/nonexistent.pdb", &SolventConvention::default()) {
            Err(ReadTrajError::FileNotFound(_)) => (),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn read_empty() {
        match TrajReader::open("test_files/trajectory_empty.pdb", &SolventConvention::default()) {
            Err(ReadTrajError::EmptyFile(_)) => (),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn read_invalid_header() {
        match TrajReader::open(
            "test_files/trajectory_noheader.pdb",
            &SolventConvention::default(),
        ) {
            Err(ReadTrajError::InvalidHeader(_, header)) => {
                assert_eq!(header, "REMARK produced by an unknown program")
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn read_short_line() {
        let mut reader = TrajReader::open(
            "test_files/trajectory_short.pdb",
            &SolventConvention::default(),
        )
        .unwrap();

        // first frame is valid
        assert_eq!(reader.next().unwrap().unwrap().get_n_waters(), 1);

        match reader.next() {
            Some(Err(ReadTrajError::ParseAtomLineErr(file, line, _))) => {
                assert_eq!(file.as_ref(), Path::new("test_files/trajectory_short.pdb"));
                assert_eq!(line, 5);
            }
            other => panic!("Unexpected result: {:?}", other),
        }

        // reading stops after the error
        assert!(reader.next().is_none());
    }

    #[test]
    fn read_invalid_coordinate() {
        let result = TrajReader::open(
            "test_files/trajectory_badcoord.pdb",
            &SolventConvention::default(),
        )
        .unwrap()
        .collect::<Result<Vec<Frame>, ReadTrajError>>();

        match result {
            Err(ReadTrajError::ParseCoordinatesErr(_, line, _)) => assert_eq!(line, 3),
            other => panic!("Unexpected result: {:?}", other),
        }
    }
}
