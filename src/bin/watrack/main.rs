// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! `watrack`: command line interface to the `watrack_rs` library.

mod cli;

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use watrack_rs::prelude::*;
use watrack_rs::{colog_info, WATRACK_VERSION};

use cli::{Cli, Command, MatchArgs, TrajectoryArgs};

fn main() -> ExitCode {
    colog::init();
    let cli = Cli::parse();

    colog_info!("watrack {}", WATRACK_VERSION);

    match run(cli.command) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Radius(args) => radius(args),
        Command::Best(args) => best(args),
        Command::Track {
            trajectories,
            reference,
            output,
            pdb,
        } => track(trajectories, &reference, output, pdb),
        Command::Shift {
            trajectories,
            concatenate,
        } => shift(trajectories, concatenate),
        Command::Positions { input } => positions(&input),
    }
}

/// Prepared input shared by all trajectory commands.
struct Input {
    config: AnalysisConfig,
    keys: Vec<ResidueKey>,
    trajectories: Vec<PathBuf>,
    printer: Option<ProgressPrinter>,
}

impl Input {
    fn new(args: TrajectoryArgs, radius: Option<f32>) -> Result<Self, Box<dyn Error>> {
        let mut config = match &args.config {
            Some(path) => AnalysisConfig::from_file(path)?,
            None => AnalysisConfig::default(),
        };

        if let Some(radius) = radius {
            config = config.with_radius(radius);
        }
        if let Some(threads) = args.threads {
            config = config.with_threads(threads);
        }
        config.validate()?;

        let keys = parse_residue_keys(&args.waters)?;
        let (trajectories, _) = expand_trajectories(&args.input)?;

        colog_info!(
            "{} water(s) and {} trajectory file(s) will be analyzed.",
            keys.len(),
            trajectories.len()
        );

        let printer = if args.silent {
            None
        } else {
            Some(ProgressPrinter::new().with_width(config.progress_width))
        };

        Ok(Input {
            config,
            keys,
            trajectories,
            printer,
        })
    }

    fn reference(&self, path: &Path) -> Result<ReferenceWaters, Box<dyn Error>> {
        Ok(read_reference_waters(
            path,
            &self.keys,
            &self.config.convention,
        )?)
    }

    fn matcher<'a>(
        &'a self,
        reference: &'a ReferenceWaters,
    ) -> Result<WaterMatcher<'a>, Box<dyn Error>> {
        let matcher = WaterMatcher::new(reference, &self.config)?;
        Ok(match &self.printer {
            Some(printer) => matcher.with_progress(printer),
            None => matcher,
        })
    }

    fn tracker(&self) -> Result<WaterTracker<'_>, Box<dyn Error>> {
        let tracker = WaterTracker::new(&self.keys, &self.config)?;
        Ok(match &self.printer {
            Some(printer) => tracker.with_progress(printer),
            None => tracker,
        })
    }
}

fn radius(args: MatchArgs) -> Result<(), Box<dyn Error>> {
    let input = Input::new(args.trajectories, args.radius)?;
    let reference = input.reference(&args.reference)?;
    let counts = input.matcher(&reference)?.count_matches(&input.trajectories)?;

    println!();
    for (id, frames) in counts.get_trajectories() {
        let mut totals = vec![0usize; counts.get_n_slots() + 1];
        for frame in frames {
            totals[frame.get_count()] += 1;
        }

        println!(
            "{} {} ({}):",
            "Trajectory".bold(),
            id.get_suffix().cyan(),
            id.get_directory().display()
        );
        for (count, n_frames) in totals.iter().enumerate() {
            println!("  {} matched: {:>6} frame(s)", count, n_frames);
        }
    }

    println!("{}", "Total:".bold());
    for (count, n_frames) in counts.totals().iter().enumerate() {
        println!("  {} matched: {:>6} frame(s)", count, n_frames);
    }

    Ok(())
}

fn best(args: MatchArgs) -> Result<(), Box<dyn Error>> {
    let input = Input::new(args.trajectories, args.radius)?;
    let reference = input.reference(&args.reference)?;
    let matches = input
        .matcher(&reference)?
        .find_complete_matches(&input.trajectories)?;

    let mut structures = join_reports(&matches, &input.config.report)?;
    sort_by_binding_energy(&mut structures);

    println!();
    println!(
        "{:>8} {:>12} {:>8} {:>14} {:>16} {:>8}",
        "epoch", "trajectory", "model", "total energy", "binding energy", "rmsd"
    );
    for structure in structures {
        println!("{}", structure);
    }

    Ok(())
}

fn track(
    args: TrajectoryArgs,
    reference: &Path,
    output: Option<PathBuf>,
    pdb: bool,
) -> Result<(), Box<dyn Error>> {
    let input = Input::new(args, None)?;
    let tracks = input.tracker()?.track(&input.trajectories)?;

    let directory = output.unwrap_or_else(|| PathBuf::from("."));

    let coordinates = unique_output_path(&directory, &input.config.output_name, "out");
    tracks.write_coordinates(reference, &coordinates)?;
    colog_info!("Coordinates written into `{}`.", coordinates.display());

    if pdb {
        let structure = unique_output_path(&directory, &input.config.output_name, "pdb");
        tracks.write_pdb(reference, &structure)?;
        colog_info!("Structure written into `{}`.", structure.display());
    }

    Ok(())
}

fn shift(args: TrajectoryArgs, concatenate: bool) -> Result<(), Box<dyn Error>> {
    let input = Input::new(args, None)?;
    let tracks = input.tracker()?.track(&input.trajectories)?;

    println!();
    for (key, series) in tracks.get_series() {
        println!("{} {}:", "Water".bold(), key.to_string().cyan());
        match series.shift_statistics(!concatenate) {
            Some(stats) => {
                println!(" - Mean shift: {:.3} Å", stats.mean);
                println!(" - Variance:   {:.3} Å²", stats.variance);
            }
            None => println!(" - not enough positions"),
        }
    }

    Ok(())
}

fn positions(input: &Path) -> Result<(), Box<dyn Error>> {
    let dump = read_coordinates(input)?;
    colog_info!("Reference structure: `{}`.", dump.reference().display());

    for (label, stats) in dump.statistics() {
        println!("\n{} {}", "Water".bold(), label.cyan());
        println!(
            "x:\n\t- mean     = {:7.3}\n\t- variance = {:7.3}",
            stats.mean.x, stats.variance.x
        );
        println!(
            "y:\n\t- mean     = {:7.3}\n\t- variance = {:7.3}",
            stats.mean.y, stats.variance.y
        );
        println!(
            "z:\n\t- mean     = {:7.3}\n\t- variance = {:7.3}",
            stats.mean.z, stats.variance.z
        );
        println!(
            "central point:\n\t({:7.3},{:7.3},{:7.3})",
            stats.mean.x, stats.mean.y, stats.mean.z
        );
        println!(
            "average distance from central point:\n\t{:7.3}",
            stats.mean_distance
        );
    }

    Ok(())
}
