// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of the residue key identifying a water molecule.

use std::cmp::Ordering;
use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ParseResidueError;

/// Identifier of a residue: chain and residue id.
///
/// Keys are ordered by chain and then by residue id.
/// Integer residue ids are compared numerically and precede all other residue ids
/// which are compared lexically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResidueKey {
    chain: String,
    residue: String,
}

impl ResidueKey {
    /// Create a new `ResidueKey`.
    pub fn new(chain: &str, residue: &str) -> Self {
        ResidueKey {
            chain: chain.to_owned(),
            residue: residue.to_owned(),
        }
    }

    /// Get the chain identifier.
    #[inline(always)]
    pub fn get_chain(&self) -> &str {
        &self.chain
    }

    /// Get the residue id.
    #[inline(always)]
    pub fn get_residue(&self) -> &str {
        &self.residue
    }

    /// Get the label used in coordinate dumps: chain immediately followed by residue id, e.g. `A12`.
    pub fn to_label(&self) -> String {
        format!("{}{}", self.chain, self.residue)
    }

    /// Check whether the key matches the provided chain and residue id.
    #[inline(always)]
    pub fn matches(&self, chain: &str, residue: &str) -> bool {
        self.chain == chain && self.residue == residue
    }
}

impl Display for ResidueKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.chain, self.residue)
    }
}

impl FromStr for ResidueKey {
    type Err = ParseResidueError;

    /// Parse `CHAIN:ID` string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.split(':').collect::<Vec<&str>>().as_slice() {
            [chain, residue] if !chain.trim().is_empty() && !residue.trim().is_empty() => {
                Ok(ResidueKey::new(chain.trim(), residue.trim()))
            }
            _ => Err(ParseResidueError::InvalidKey(trimmed.to_owned())),
        }
    }
}

impl PartialOrd for ResidueKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ResidueKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.chain.cmp(&other.chain).then_with(|| {
            match (
                self.residue.parse::<i64>(),
                other.residue.parse::<i64>(),
            ) {
                (Ok(a), Ok(b)) => a.cmp(&b).then_with(|| self.residue.cmp(&other.residue)),
                (Ok(_), Err(_)) => Ordering::Less,
                (Err(_), Ok(_)) => Ordering::Greater,
                (Err(_), Err(_)) => self.residue.cmp(&other.residue),
            }
        })
    }
}

/// Parse residue keys from a list of strings.
/// Each string may contain several comma-separated `CHAIN:ID` keys.
///
/// ## Returns
/// - Keys in the order in which they were provided. Duplicate keys are only included once.
/// - `ParseResidueError::NoKeys` if no valid key has been found.
///
/// ## Notes
/// - Malformed keys are skipped and logged.
///
/// ## Example
/// ```
/// # use watrack_rs::structures::residue::{parse_residue_keys, ResidueKey};
/// #
/// let keys = parse_residue_keys(&["A:12,B:3", "C:7"]).unwrap();
/// assert_eq!(keys.len(), 3);
/// assert_eq!(keys[1], ResidueKey::new("B", "3"));
/// ```
pub fn parse_residue_keys<S: AsRef<str>>(
    lists: &[S],
) -> Result<Vec<ResidueKey>, ParseResidueError> {
    let mut keys: Vec<ResidueKey> = Vec::new();

    for token in lists
        .iter()
        .flat_map(|list| list.as_ref().split(','))
        .filter(|token| !token.trim().is_empty())
    {
        match ResidueKey::from_str(token) {
            Ok(key) => {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
            Err(e) => colog_warn!("{} Skipping.", e),
        }
    }

    if keys.is_empty() {
        return Err(ParseResidueError::NoKeys);
    }

    Ok(keys)
}

/******************************/
/*         UNIT TESTS         */
/******************************/
