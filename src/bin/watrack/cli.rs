// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Command line arguments of the `watrack` program.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "watrack", version, about = "Occupancy and tracking of water sites in pdb trajectories.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Arguments shared by all commands analyzing trajectories.
#[derive(Args, Debug)]
pub struct TrajectoryArgs {
    /// Paths to trajectory files (glob patterns are expanded)
    #[arg(short = 'i', long = "input", value_name = "FILE", num_args = 1.., required = true)]
    pub input: Vec<String>,

    /// List of water ids
    #[arg(short = 'w', long = "waters", value_name = "CHAIN:ID", num_args = 1.., required = true)]
    pub waters: Vec<String>,

    /// YAML file with the analysis configuration
    #[arg(short = 'c', long = "config", value_name = "YAML")]
    pub config: Option<PathBuf>,

    /// Number of trajectories analyzed in parallel [default: 1]
    #[arg(short = 't', long = "threads")]
    pub threads: Option<usize>,

    /// Do not print the progress bar
    #[arg(long = "silent", default_value_t = false)]
    pub silent: bool,
}

/// Arguments of commands matching trajectory waters to reference waters.
#[derive(Args, Debug)]
pub struct MatchArgs {
    #[command(flatten)]
    pub trajectories: TrajectoryArgs,

    /// Path to the reference structure
    #[arg(short = 'r', long = "reference", value_name = "PDB")]
    pub reference: PathBuf,

    /// Radius of the spheres around the reference waters (in Å) [default: 1.5]
    #[arg(short = 'R', long = "radius")]
    pub radius: Option<f32>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Count matched reference waters in each trajectory frame
    Radius(MatchArgs),

    /// Find frames matching all reference waters and join them with the reports
    Best(MatchArgs),

    /// Save all positions of the waters
    Track {
        #[command(flatten)]
        trajectories: TrajectoryArgs,

        /// Path to the reference structure
        #[arg(short = 'r', long = "reference", value_name = "PDB")]
        reference: PathBuf,

        /// Directory for the output files [default: current directory]
        #[arg(short = 'o', long = "output", value_name = "DIR")]
        output: Option<PathBuf>,

        /// Also write the positions as pseudo-atoms into a pdb file
        #[arg(long = "pdb", default_value_t = false)]
        pdb: bool,
    },

    /// Calculate mean and variance of the water shifts between consecutive frames
    Shift {
        #[command(flatten)]
        trajectories: TrajectoryArgs,

        /// Include shifts between the last frame of a trajectory and the first frame of the next one
        #[arg(long = "concatenate", default_value_t = false)]
        concatenate: bool,
    },

    /// Calculate statistics of the water positions saved by the `track` command
    Positions {
        /// Path to the coordinate file
        #[arg(short = 'i', long = "input", value_name = "FILE")]
        input: PathBuf,
    },
}
