// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of functions for reading simulation reports and joining them with complete matches.

use std::fmt::Display;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use getset::{CopyGetters, Getters};
use hashbrown::HashMap;

use crate::analysis::matching::CompleteMatch;
use crate::config::ReportLayout;
use crate::errors::ReadReportError;
use crate::structures::trajectory::TrajectoryId;

/// Values reported for a single model of a trajectory.
#[derive(Debug, Clone, Copy, PartialEq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct ReportEntry {
    total_energy: f32,
    binding_energy: f32,
    rmsd: f32,
}

impl ReportEntry {
    /// Create a new `ReportEntry`.
    pub fn new(total_energy: f32, binding_energy: f32, rmsd: f32) -> Self {
        ReportEntry {
            total_energy,
            binding_energy,
            rmsd,
        }
    }
}

/// Read a report file.
///
/// ## Returns
/// Entries of the report, one per model. Entry `n` (0-based) belongs to model `n + 1`.
///
/// ## Notes
/// - The first line of the report is a header and is skipped.
/// - Blank lines are skipped.
/// - Columns are whitespace-delimited and numbered from 1 in `layout`.
pub fn read_report(
    filename: impl AsRef<Path>,
    layout: &ReportLayout,
) -> Result<Vec<ReportEntry>, ReadReportError> {
    let file = File::open(filename.as_ref())
        .map_err(|_| ReadReportError::FileNotFound(Box::from(filename.as_ref())))?;

    let mut entries = Vec::new();

    for (i, raw_line) in BufReader::new(file).lines().enumerate().skip(1) {
        let line_number = i + 1;
        let line = raw_line
            .map_err(|_| ReadReportError::LineNotFound(Box::from(filename.as_ref()), line_number))?;

        let fields = line.split_whitespace().collect::<Vec<&str>>();
        if fields.is_empty() {
            continue;
        }

        let value = |column: usize| -> Result<f32, ReadReportError> {
            let field = column
                .checked_sub(1)
                .and_then(|index| fields.get(index))
                .ok_or_else(|| {
                    ReadReportError::MissingColumn(Box::from(filename.as_ref()), line_number, column)
                })?;

            field.parse::<f32>().map_err(|_| {
                ReadReportError::ParseValueErr(Box::from(filename.as_ref()), line_number, column)
            })
        };

        entries.push(ReportEntry {
            total_energy: value(layout.total_energy)?,
            binding_energy: value(layout.binding_energy)?,
            rmsd: value(layout.rmsd)?,
        });
    }

    Ok(entries)
}

/// Complete match joined with the values from its report.
#[derive(Debug, Clone, PartialEq, Getters, CopyGetters)]
pub struct BestStructure {
    #[getset(get = "pub")]
    trajectory: TrajectoryId,
    #[getset(get_copy = "pub")]
    model: usize,
    #[getset(get_copy = "pub")]
    total_energy: f32,
    #[getset(get_copy = "pub")]
    binding_energy: f32,
    #[getset(get_copy = "pub")]
    rmsd: f32,
}

impl BestStructure {
    fn new(complete: &CompleteMatch, entry: &ReportEntry) -> Self {
        BestStructure {
            trajectory: complete.get_trajectory().clone(),
            model: complete.get_model(),
            total_energy: entry.total_energy,
            binding_energy: entry.binding_energy,
            rmsd: entry.rmsd,
        }
    }
}

impl Display for BestStructure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:>8} {:>12} {:>8} {:>14.3} {:>16.3} {:>8.3}",
            self.trajectory.get_epoch(),
            self.trajectory.get_suffix(),
            self.model,
            self.total_energy,
            self.binding_energy,
            self.rmsd
        )
    }
}

/// Join complete matches with the reports of their trajectories.
///
/// The report of trajectory `{directory}/trajectory_{N}` is `{directory}/{layout.prefix}{N}`.
/// Each report is read only once. Structures are returned in the order of `matches`.
///
/// ## Returns
/// - Vector of `BestStructure` if successful.
/// - `ReadReportError::MissingModel` if a report contains no entry for a matched model.
/// - Other `ReadReportError` if a report could not be read.
pub fn join_reports(
    matches: &[CompleteMatch],
    layout: &ReportLayout,
) -> Result<Vec<BestStructure>, ReadReportError> {
    let mut reports: HashMap<&TrajectoryId, Vec<ReportEntry>> = HashMap::new();
    let mut structures = Vec::with_capacity(matches.len());

    for complete in matches {
        let id = complete.get_trajectory();
        let path = id.report_path(&layout.prefix);

        if !reports.contains_key(id) {
            reports.insert(id, read_report(&path, layout)?);
        }

        let entry = complete
            .get_model()
            .checked_sub(1)
            .and_then(|index| reports.get(id).and_then(|entries| entries.get(index)))
            .ok_or_else(|| {
                ReadReportError::MissingModel(Box::from(path.as_path()), complete.get_model())
            })?;

        structures.push(BestStructure::new(complete, entry));
    }

    Ok(structures)
}

/// Sort structures by binding energy, lowest first.
pub fn sort_by_binding_energy(structures: &mut [BestStructure]) {
    structures.sort_by(|a, b| a.binding_energy.total_cmp(&b.binding_energy));
}

/******************************/
/*         UNIT TESTS         */
/******************************/
