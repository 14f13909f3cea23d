// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of the AtomRecord structure: a view of a single whitespace-delimited atom line.

use crate::errors::ParseAtomError;
use crate::structures::{residue::ResidueKey, vector3d::Vector3D};

/// Minimal number of fields in an atom line allowing identification of the atom.
const MIN_FIELDS_NAMES: usize = 4;
/// Minimal number of fields in an atom line containing chain and residue id.
const MIN_FIELDS_KEY: usize = 6;
/// Minimal number of fields in an atom line containing coordinates.
const MIN_FIELDS_POSITION: usize = 9;

/// Atom line split into whitespace-delimited fields.
///
/// The fields are interpreted as follows (0-based):
/// `record serial atom_name residue_name chain residue_id x y z ...`
///
/// Only the atom and residue names are checked when the record is constructed.
/// Chain, residue id and coordinates are extracted on demand.
#[derive(Debug, Clone)]
pub struct AtomRecord<'a> {
    fields: Vec<&'a str>,
}

impl<'a> AtomRecord<'a> {
    /// Split the line into fields.
    ///
    /// ## Returns
    /// `ParseAtomError::TooFewFields` if the line does not contain atom and residue name.
    pub fn from_line(line: &'a str) -> Result<Self, ParseAtomError> {
        let fields: Vec<&str> = line.split_whitespace().collect();

        if fields.len() < MIN_FIELDS_NAMES {
            return Err(ParseAtomError::TooFewFields(fields.len(), MIN_FIELDS_NAMES));
        }

        Ok(AtomRecord { fields })
    }

    /// Get name of the atom.
    #[inline(always)]
    pub fn get_atom_name(&self) -> &'a str {
        self.fields[2]
    }

    /// Get name of the residue.
    #[inline(always)]
    pub fn get_residue_name(&self) -> &'a str {
        self.fields[3]
    }

    /// Returns `true` if the atom has the given residue name and atom name.
    #[inline(always)]
    pub fn is(&self, residue_name: &str, atom_name: &str) -> bool {
        self.get_residue_name() == residue_name && self.get_atom_name() == atom_name
    }

    /// Get the chain and residue id of the atom.
    pub fn get_chain_residue(&self) -> Result<(&'a str, &'a str), ParseAtomError> {
        self.require(MIN_FIELDS_KEY)?;
        Ok((self.fields[4], self.fields[5]))
    }

    /// Get the residue key (chain and residue id) of the atom.
    pub fn get_key(&self) -> Result<ResidueKey, ParseAtomError> {
        let (chain, residue) = self.get_chain_residue()?;
        Ok(ResidueKey::new(chain, residue))
    }

    /// Parse the coordinates of the atom.
    pub fn get_position(&self) -> Result<Vector3D, ParseAtomError> {
        self.require(MIN_FIELDS_POSITION)?;

        let mut position = [0.0f32; 3];
        for (coordinate, field) in position.iter_mut().zip(self.fields[6..9].iter()) {
            *coordinate = field
                .parse::<f32>()
                .map_err(|_| ParseAtomError::InvalidCoordinate(field.to_string()))?;
        }

        Ok(position.into())
    }

    fn require(&self, n_fields: usize) -> Result<(), ParseAtomError> {
        if self.fields.len() < n_fields {
            Err(ParseAtomError::TooFewFields(self.fields.len(), n_fields))
        } else {
            Ok(())
        }
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/
