// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of functions for reading reference structures, trajectories, reports,
//! and for writing the tracked water coordinates.

pub mod coords_io;
pub mod pdb_io;
pub mod report_io;
pub mod traj_io;

/// Format a coordinate with 3 decimal places, right-aligned to 7 characters,
/// with a space reserved for the sign of non-negative values.
#[inline]
pub(crate) fn format_coordinate(value: f32) -> String {
    let string = if value.is_sign_negative() {
        format!("{:.3}", value)
    } else {
        format!(" {:.3}", value)
    };

    format!("{:>7}", string)
}

/******************************/
/*         UNIT TESTS         */
/******************************/
