// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of functions for reading reference waters from pdb files
//! and for writing tracked water positions as pdb files.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::analysis::tracking::WaterTracks;
use crate::config::SolventConvention;
use crate::errors::{ReadReferenceError, Warning, WriteError};
use crate::io::format_coordinate;
use crate::structures::{atom::AtomRecord, residue::ResidueKey, vector3d::Vector3D};

/// Position of a reference water.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceLocation {
    key: ResidueKey,
    position: Vector3D,
}

impl ReferenceLocation {
    /// Create a new `ReferenceLocation`.
    pub fn new(key: ResidueKey, position: Vector3D) -> Self {
        ReferenceLocation { key, position }
    }

    /// Get the key of the reference water.
    #[inline(always)]
    pub fn get_key(&self) -> &ResidueKey {
        &self.key
    }

    /// Get the position of the reference water.
    #[inline(always)]
    pub fn get_position(&self) -> &Vector3D {
        &self.position
    }
}

/// Reference waters located in a reference structure.
///
/// Locations are stored in the order in which the waters were requested.
/// Containment results refer to the reference waters by their index in this order.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceWaters {
    locations: Vec<ReferenceLocation>,
    missing: Vec<ResidueKey>,
}

impl ReferenceWaters {
    /// Create `ReferenceWaters` from already known locations.
    pub fn new(locations: Vec<ReferenceLocation>) -> Self {
        ReferenceWaters {
            locations,
            missing: Vec::new(),
        }
    }

    /// Get the located reference waters.
    #[inline(always)]
    pub fn get_locations(&self) -> &[ReferenceLocation] {
        &self.locations
    }

    /// Get the number of located reference waters.
    #[inline(always)]
    pub fn get_n_locations(&self) -> usize {
        self.locations.len()
    }

    /// Get the keys of the requested waters that were not found in the reference structure.
    #[inline(always)]
    pub fn get_missing(&self) -> &[ResidueKey] {
        &self.missing
    }

    /// Get the positions of the located reference waters.
    pub fn positions(&self) -> Vec<Vector3D> {
        self.locations.iter().map(|loc| loc.position).collect()
    }

    /// Get warnings about the requested waters that were not located.
    pub fn warnings(&self) -> Vec<Warning> {
        self.missing
            .iter()
            .cloned()
            .map(Warning::ResidueNotFound)
            .collect()
    }
}

/// Locate the requested waters in a reference structure.
///
/// ## Returns
/// `ReferenceWaters` containing the positions of the waters in the order in which they were requested.
/// `ReadReferenceError` if the file can't be read or a matching line is malformed.
///
/// ## Notes
/// - Only lines starting with `convention.record` whose residue name is `convention.residue`
///   and whose atom name is `convention.reference_oxygen` are considered.
/// - Each requested water is matched at most once. If the reference contains the same water
///   multiple times, the first occurrence is used.
/// - Requested waters not present in the reference are not an error.
///   They are listed in `ReferenceWaters::get_missing` and logged as warnings.
///
/// ## Example
/// ```no_run
/// # use watrack_rs::prelude::*;
/// # use watrack_rs::io::pdb_io::read_reference_waters;
/// #
/// let keys = vec![ResidueKey::new("A", "201"), ResidueKey::new("A", "202")];
/// let reference = read_reference_waters("reference.pdb", &keys, &SolventConvention::default()).unwrap();
///
/// for warning in reference.warnings() {
///     eprintln!("Warning: {}", warning);
/// }
/// ```
pub fn read_reference_waters(
    filename: impl AsRef<Path>,
    keys: &[ResidueKey],
    convention: &SolventConvention,
) -> Result<ReferenceWaters, ReadReferenceError> {
    let file = File::open(filename.as_ref())
        .map_err(|_| ReadReferenceError::FileNotFound(Box::from(filename.as_ref())))?;

    let reader = BufReader::new(file);

    let mut positions: Vec<Option<Vector3D>> = vec![None; keys.len()];
    let mut n_unmatched = keys.len();

    for (i, raw_line) in reader.lines().enumerate() {
        if n_unmatched == 0 {
            break;
        }

        let line_number = i + 1;
        let line = raw_line.map_err(|_| {
            ReadReferenceError::LineNotFound(Box::from(filename.as_ref()), line_number)
        })?;

        if !line.starts_with(&convention.record) {
            continue;
        }

        let parse_error =
            || ReadReferenceError::ParseLineErr(Box::from(filename.as_ref()), line_number, line.clone());

        let atom = AtomRecord::from_line(&line).map_err(|_| parse_error())?;
        if !atom.is(&convention.residue, &convention.reference_oxygen) {
            continue;
        }

        let (chain, residue) = atom.get_chain_residue().map_err(|_| parse_error())?;

        // first unmatched key wins
        let slot = keys
            .iter()
            .zip(positions.iter())
            .position(|(key, pos)| pos.is_none() && key.matches(chain, residue));

        if let Some(index) = slot {
            positions[index] = Some(atom.get_position().map_err(|_| parse_error())?);
            n_unmatched -= 1;
        }
    }

    let mut locations = Vec::with_capacity(keys.len());
    let mut missing = Vec::new();
    for (key, position) in keys.iter().zip(positions) {
        match position {
            Some(pos) => locations.push(ReferenceLocation::new(key.clone(), pos)),
            None => {
                colog_warn!(
                    "Water residue `{}` could not be found in the reference structure `{}`.",
                    key,
                    filename.as_ref().display()
                );
                missing.push(key.clone());
            }
        }
    }

    Ok(ReferenceWaters { locations, missing })
}

/// ## Methods for writing pdb files.
impl WaterTracks {
    /// Write the tracked water positions into a pdb file together with the reference structure.
    ///
    /// ## Details
    /// Lines of the reference structure starting with `TITLE`, `MODEL`, `ATOM`, `TER`, and `HETATM`
    /// are copied into the output. Then, each tracked position is written as a `HETATM`
    /// pseudo-atom named `WAT` of residue `PNT` carrying the chain and residue id of the tracked water.
    ///
    /// ## Returns
    /// `Ok` if writing has been successful. Otherwise `WriteError`.
    pub fn write_pdb(
        &self,
        reference: impl AsRef<Path>,
        filename: impl AsRef<Path>,
    ) -> Result<(), WriteError> {
        let reference_file = File::open(reference.as_ref())
            .map_err(|_| WriteError::ReferenceNotFound(Box::from(reference.as_ref())))?;

        let output = File::create(filename.as_ref())
            .map_err(|_| WriteError::CouldNotCreate(Box::from(filename.as_ref())))?;

        let mut writer = BufWriter::new(output);

        for raw_line in BufReader::new(reference_file).lines() {
            let line = raw_line
                .map_err(|_| WriteError::ReferenceNotFound(Box::from(reference.as_ref())))?;

            if ["TITLE", "MODEL", "ATOM", "TER", "HETATM"]
                .iter()
                .any(|keyword| line.starts_with(keyword))
            {
                write_line(&mut writer, &line)?;
            }
        }

        write_line(&mut writer, "TER")?;

        let mut index = 1usize;
        for (key, series) in self.get_series() {
            for position in series.get_positions() {
                write_line(
                    &mut writer,
                    &format!(
                        "HETATM {:>4}  WAT PNT {} {:>3}    {} {} {}  1.00 31.67            C  ",
                        index,
                        key.get_chain(),
                        key.get_residue(),
                        format_coordinate(position.x),
                        format_coordinate(position.y),
                        format_coordinate(position.z),
                    ),
                )?;
                index += 1;
            }
        }

        write_line(&mut writer, "END")?;
        write_line(&mut writer, "")?;

        writer.flush().map_err(|_| WriteError::CouldNotWrite)?;

        Ok(())
    }
}

fn write_line<W: Write>(writer: &mut W, line: &str) -> Result<(), WriteError> {
    writeln!(writer, "{}", line).map_err(|_| WriteError::CouldNotWrite)
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests_read {
    use super::*;
    use float_cmp::assert_approx_eq;

    fn keys(strings: &[(&str, &str)]) -> Vec<ResidueKey> {
        strings
            .iter()
            .map(|(chain, residue)| ResidueKey::new(chain, residue))
            .collect()
    }

    #[test]
    fn read_in_requested_order() {
        let requested = keys(&[("B", "2"), ("A", "1")]);
        let reference = read_reference_waters(
            "test_files/reference.pdb",
            &requested,
            &SolventConvention::default(),
        )
        .unwrap();

        assert_eq!(reference.get_n_locations(), 2);
        assert!(reference.get_missing().is_empty());
        assert!(reference.warnings().is_empty());

        let locations = reference.get_locations();
        assert_eq!(locations[0].get_key(), &ResidueKey::new("B", "2"));
        assert_approx_eq!(f32, locations[0].get_position().x, 10.0);
        assert_approx_eq!(f32, locations[0].get_position().y, 10.0);
        assert_approx_eq!(f32, locations[0].get_position().z, 10.0);

        assert_eq!(locations[1].get_key(), &ResidueKey::new("A", "1"));
        assert_eq!(locations[1].get_position(), &Vector3D::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn read_missing_water() {
        let requested = keys(&[("A", "1"), ("C", "99"), ("B", "2")]);
        let reference = read_reference_waters(
            "test_files/reference.pdb",
            &requested,
            &SolventConvention::default(),
        )
        .unwrap();

        assert_eq!(reference.get_n_locations(), 2);
        assert_eq!(reference.get_locations()[0].get_key(), &requested[0]);
        assert_eq!(reference.get_locations()[1].get_key(), &requested[2]);
        assert_eq!(reference.get_missing(), &[ResidueKey::new("C", "99")]);
        assert_eq!(
            reference.warnings(),
            vec![Warning::ResidueNotFound(ResidueKey::new("C", "99"))]
        );
    }

    #[test]
    fn read_first_duplicate_wins() {
        // A:3 is present twice in the reference
        let requested = keys(&[("A", "3")]);
        let reference = read_reference_waters(
            "test_files/reference.pdb",
            &requested,
            &SolventConvention::default(),
        )
        .unwrap();

        assert_eq!(reference.get_n_locations(), 1);
        assert_eq!(
            reference.get_locations()[0].get_position(),
            &Vector3D::new(5.0, 5.0, 5.0)
        );
    }

    #[test]
    fn read_ignores_other_atoms() {
        // A:4 is present only as a simulation water oxygen (OW) and as a non-water residue
        let requested = keys(&[("A", "4")]);
        let reference = read_reference_waters(
            "test_files/reference.pdb",
            &requested,
            &SolventConvention::default(),
        )
        .unwrap();

        assert_eq!(reference.get_n_locations(), 0);
        assert_eq!(reference.get_missing(), requested.as_slice());
    }

    #[test]
    fn read_nonexistent() {
        match read_reference_waters(
            "test_files/nonexistent.pdb",
            &keys(&[("A", "1")]),
            &SolventConvention::default(),
        ) {
            Err(ReadReferenceError::FileNotFound(_)) => (),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn read_malformed() {
        match read_reference_waters(
            "test_files/reference_malformed.pdb",
            &keys(&[("A", "2")]),
            &SolventConvention::default(),
        ) {
            Err(ReadReferenceError::ParseLineErr(_, line, _)) => assert_eq!(line, 3),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn positions_in_requested_order() {
        let reference = read_reference_waters(
            "test_files/reference.pdb",
            &keys(&[("B", "2"), ("A", "1")]),
            &SolventConvention::default(),
        )
        .unwrap();

        let positions = reference.positions();
        assert_eq!(positions.len(), 2);
        assert_eq!(positions[0], Vector3D::new(10.0, 10.0, 10.0));
        assert_eq!(positions[1], Vector3D::new(0.0, 0.0, 0.0));
    }
}
