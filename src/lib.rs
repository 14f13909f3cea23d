// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! # watrack_rs: Water Tracking Library for Rust
//!
//! Rust library for analyzing the occupancy of crystallographic water sites
//! in multi-model pdb trajectories.
//!
//! ## Usage
//!
//! Run
//!
//! ```bash
//! $ cargo add watrack_rs
//! ```
//!
//! Import the crate in your Rust code:
//! ```
//! use watrack_rs::prelude::*;
//! ```
//!
//! ## Examples
//!
//! #### Counting matched waters
//!
//! Locate reference waters in a structure and count, for each frame of the trajectories,
//! how many of them are occupied by a trajectory water.
//!
//! ```no_run
//! use watrack_rs::prelude::*;
//! use std::error::Error;
//!
//! fn main() -> Result<(), Box<dyn Error>> {
//!     let config = AnalysisConfig::default().with_radius(1.5);
//!
//!     // waters are identified by their chain and residue id
//!     let keys = parse_residue_keys(&["A:201,A:202", "B:17"])?;
//!
//!     // requested waters missing in the reference structure are reported as warnings
//!     let reference = read_reference_waters("reference.pdb", &keys, &config.convention)?;
//!     for warning in reference.warnings() {
//!         eprintln!("Warning: {}", warning);
//!     }
//!
//!     let counts = WaterMatcher::new(&reference, &config)?
//!         .count_matches(&["1/trajectory_1.pdb", "1/trajectory_2.pdb"])?;
//!
//!     for (id, frames) in counts.get_trajectories() {
//!         for frame in frames {
//!             println!("{} | model {} | {} matched", id, frame.get_model(), frame.get_count());
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! #### Searching for the best structures
//!
//! Find frames in which all reference waters are occupied
//! and join them with the energies from the simulation reports.
//!
//! ```no_run
//! use watrack_rs::prelude::*;
//! use std::error::Error;
//!
//! fn main() -> Result<(), Box<dyn Error>> {
//!     let config = AnalysisConfig::from_file("watrack.yaml")?;
//!     let keys = parse_residue_keys(&["A:201,A:202"])?;
//!     let reference = read_reference_waters("reference.pdb", &keys, &config.convention)?;
//!
//!     let printer = ProgressPrinter::new();
//!     let matches = WaterMatcher::new(&reference, &config)?
//!         .with_progress(&printer)
//!         .find_complete_matches(&["1/trajectory_1.pdb", "2/trajectory_1.pdb"])?;
//!
//!     let mut structures = join_reports(&matches, &config.report)?;
//!     sort_by_binding_energy(&mut structures);
//!
//!     for structure in structures {
//!         println!("{}", structure);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! #### Tracking waters
//!
//! Collect all positions of selected waters and calculate how much they move between frames.
//!
//! ```no_run
//! use watrack_rs::prelude::*;
//! use std::error::Error;
//!
//! fn main() -> Result<(), Box<dyn Error>> {
//!     let config = AnalysisConfig::default();
//!     let keys = parse_residue_keys(&["A:201"])?;
//!
//!     let tracks = WaterTracker::new(&keys, &config)?
//!         .track(&["1/trajectory_1.pdb", "2/trajectory_1.pdb"])?;
//!
//!     for (key, series) in tracks.get_series() {
//!         // shifts between the last frame of one trajectory and the first frame of the next are skipped
//!         if let Some(stats) = series.shift_statistics(true) {
//!             println!("Water {}: {}", key, stats);
//!         }
//!     }
//!
//!     tracks.write_coordinates("reference.pdb", "WaterTracking.out")?;
//!     tracks.write_pdb("reference.pdb", "WaterTracking.pdb")?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Input files
//! Reference structures and trajectories are read as whitespace-delimited pdb-like files:
//! `record serial atom_name residue_name chain residue_id x y z ...`.
//! Reference waters are identified by the atom name `O` while trajectory waters are
//! identified by the atom name `OW`. Both conventions can be changed in `AnalysisConfig`.
//!
//! ## Error handling
//! Individual error types are not exported into the `prelude` module.
//! Include them explicitly from the `errors` module if needed:
//! ```
//! use watrack_rs::errors::ReadTrajError;
//! ```
//!
//! ## License
//! This library is released under the MIT License.

/// Current version of the `watrack_rs` library.
pub const WATRACK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log colored info message.
#[macro_export]
macro_rules! colog_info {
    ($msg:expr) => {
        log::info!($msg)
    };
    ($msg:expr, $($arg:expr),+ $(,)?) => {{
        use colored::Colorize;
        log::info!($msg, $( $arg.to_string().cyan() ),+)
    }};
}

/// Log colored warning message.
#[macro_export]
macro_rules! colog_warn {
    ($msg:expr) => {
        log::warn!($msg)
    };
    ($msg:expr, $($arg:expr),+ $(,)?) => {{
        use colored::Colorize;
        log::warn!($msg, $( $arg.to_string().yellow() ),+)
    }};
}

pub mod analysis;
pub mod config;
pub mod errors;
pub mod files;
pub mod io;
pub mod progress;
pub mod structures {
    pub mod atom;
    pub mod residue;
    pub mod trajectory;
    pub mod vector3d;
}

/// Reexported basic `watrack_rs` structures, traits and functions.
pub mod prelude {
    pub use crate::analysis::assignment::{resolve_assignment, Assignment};
    pub use crate::analysis::containment::water_in_spheres;
    pub use crate::analysis::matching::{CompleteMatch, FrameMatch, MatchCounts, WaterMatcher};
    pub use crate::analysis::statistics::{PositionStatistics, Statistics};
    pub use crate::analysis::tracking::{DisplacementSeries, WaterTracker, WaterTracks};
    pub use crate::analysis::CancellationToken;
    pub use crate::config::{AnalysisConfig, ReportLayout, SolventConvention};
    pub use crate::errors::Warning;
    pub use crate::files::{expand_trajectories, unique_output_path};
    pub use crate::io::coords_io::{read_coordinates, CoordinateDump};
    pub use crate::io::pdb_io::{read_reference_waters, ReferenceLocation, ReferenceWaters};
    pub use crate::io::report_io::{join_reports, sort_by_binding_energy, BestStructure};
    pub use crate::io::traj_io::TrajReader;
    pub use crate::progress::{ProgressObserver, ProgressPrinter};
    pub use crate::structures::residue::{parse_residue_keys, ResidueKey};
    pub use crate::structures::trajectory::{Frame, TrajectoryId};
    pub use crate::structures::vector3d::Vector3D;
}
