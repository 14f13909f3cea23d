// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of progress observation and of the ProgressPrinter structure
//! for printing the progress of multi-trajectory analyses.

use colored::{ColoredString, Colorize};
use parking_lot::Mutex;
use std::io::Write;

/// Receiver of progress updates of a multi-trajectory analysis.
///
/// Updates may arrive from several threads, but the number of completed trajectories
/// never decreases between two consecutive updates.
///
/// Any closure `Fn(usize, usize)` can be used as an observer.
/// ```
/// # use watrack_rs::progress::ProgressObserver;
/// #
/// let observer = |completed: usize, total: usize| println!("{} / {}", completed, total);
/// observer.update(1, 3);
/// ```
pub trait ProgressObserver: Send + Sync {
    /// Called whenever a trajectory has been fully analyzed (and once before the analysis starts).
    fn update(&self, completed: usize, total: usize);

    /// Called if the analysis fails. Does nothing by default.
    fn fail(&self) {}
}

impl<F> ProgressObserver for F
where
    F: Fn(usize, usize) + Send + Sync,
{
    fn update(&self, completed: usize, total: usize) {
        self(completed, total)
    }
}

/// Progress of the analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProgressStatus {
    /// Analysis is in progress.
    Running,
    /// All trajectories have been analyzed.
    Completed,
    /// Analysis failed.
    Failed,
}

/// String that can be used inside `ProgressPrinter`.
#[derive(Debug, Clone, PartialEq)]
struct ProgressMessage {
    msg: ColoredString,
}

impl ProgressMessage {
    /// Create new `ProgressMessage`.
    ///
    /// ## Panics
    /// Panics if the string is longer than 9 characters.
    fn new(string: ColoredString) -> Self {
        if string.chars().count() > 9 {
            panic!("FATAL WATRACK ERROR | ProgressMessage::new | `ProgressMessage` can not be longer than 9 characters.");
        }

        ProgressMessage { msg: string }
    }

    /// Format `ProgressMessage`.
    fn format(&self, colored: bool) -> String {
        if colored {
            format!("[{: ^9}]   ", self.msg)
        } else {
            format!("[{: ^9}]   ", self.msg.as_ref() as &str)
        }
    }
}

/// Structure handling printing of the progress of an analysis.
///
/// Prints the status of the analysis and a bar showing the fraction of analyzed trajectories:
/// ```text
/// [ RUNNING ]   [##########          ]     2 / 4
/// ```
pub struct ProgressPrinter {
    /// Stream to write the progress info to.
    output: Mutex<Box<dyn Write + Send>>,
    /// Number of characters of the progress bar. Default: 50.
    width: usize,
    /// If true, the output will be colored. Default: true.
    colored: bool,
    /// Default: "RUNNING".yellow().
    running_msg: ProgressMessage,
    /// Default: "COMPLETED".green().
    completed_msg: ProgressMessage,
    /// Default: "FAILED!".red().
    failed_msg: ProgressMessage,
    /// String terminating the progress message while the analysis is running. Default: `\r` (carriage return).
    terminating: String,
}

impl ProgressPrinter {
    /// Create an instance of `ProgressPrinter` with default parameters.
    ///
    /// The default values of the `ProgressPrinter` parameters.
    /// - `output`: `std::io::stderr()` (stream to write the progress info to)
    /// - `width`: `50` (number of characters of the progress bar)
    /// - `colored`: `true` (should the output be colored?)
    /// - `running_msg`: `"RUNNING".yellow()` (string printed while the analysis is running)
    /// - `completed_msg`: `"COMPLETED".green()` (string printed when the analysis is completed)
    /// - `failed_msg`: `"FAILED!".red()` (string printed when the analysis failed)
    /// - `terminating`: `\r` (string terminating the progress message; useful to set to `\n` when printing to a file)
    ///
    /// ## Example
    /// ```no_run
    /// use watrack_rs::prelude::*;
    /// use colored::Colorize;
    ///
    /// let printer = ProgressPrinter::new()
    ///     .with_width(30)
    ///     .with_running_msg("MATCHING".yellow());
    ///
    /// let config = AnalysisConfig::default();
    /// let keys = vec![ResidueKey::new("A", "201")];
    /// let reference = read_reference_waters("reference.pdb", &keys, &config.convention).unwrap();
    ///
    /// let counts = WaterMatcher::new(&reference, &config)
    ///     .unwrap()
    ///     .with_progress(&printer)
    ///     .count_matches(&["trajectory_1.pdb", "trajectory_2.pdb"])
    ///     .unwrap();
    /// ```
    pub fn new() -> Self {
        ProgressPrinter {
            output: Mutex::new(Box::from(std::io::stderr())),
            width: crate::config::DEFAULT_PROGRESS_WIDTH,
            colored: true,
            running_msg: ProgressMessage::new("RUNNING".yellow()),
            completed_msg: ProgressMessage::new("COMPLETED".green()),
            failed_msg: ProgressMessage::new("FAILED!".red()),
            terminating: String::from("\r"),
        }
    }

    /// Create new `ProgressPrinter` with specific `output` stream.
    pub fn with_output(mut self, stream: Box<dyn Write + Send>) -> Self {
        self.output = Mutex::new(stream);
        self
    }

    /// Create new `ProgressPrinter` with specific width of the progress bar.
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Create new `ProgressPrinter` with specific value for `colored`.
    pub fn with_colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// Create new `ProgressPrinter` with specific value for `running_msg`.
    ///
    /// ## Panics
    /// Panics if the `running_msg` is longer than 9 characters.
    pub fn with_running_msg(mut self, running_msg: ColoredString) -> Self {
        self.running_msg = ProgressMessage::new(running_msg);
        self
    }

    /// Create new `ProgressPrinter` with specific value for `completed_msg`.
    ///
    /// ## Panics
    /// Panics if the `completed_msg` is longer than 9 characters.
    pub fn with_completed_msg(mut self, completed_msg: ColoredString) -> Self {
        self.completed_msg = ProgressMessage::new(completed_msg);
        self
    }

    /// Create new `ProgressPrinter` with specific value for `failed_msg`.
    ///
    /// ## Panics
    /// Panics if the `failed_msg` is longer than 9 characters.
    pub fn with_failed_msg(mut self, failed_msg: ColoredString) -> Self {
        self.failed_msg = ProgressMessage::new(failed_msg);
        self
    }

    /// Create new `ProgressPrinter` with specific value for `terminating`.
    pub fn with_terminating(mut self, string: &str) -> Self {
        self.terminating = string.to_string();
        self
    }

    /// Print progress info. Completed and failed analyses are always terminated by a newline.
    pub fn print(&self, status: ProgressStatus, completed: usize, total: usize) {
        let (message, terminating) = match status {
            ProgressStatus::Running => (&self.running_msg, self.terminating.as_str()),
            ProgressStatus::Completed => (&self.completed_msg, "\n"),
            ProgressStatus::Failed => (&self.failed_msg, "\n"),
        };

        let filled = if total == 0 {
            self.width
        } else {
            (completed.min(total) * self.width) / total
        };

        let mut output = self.output.lock();
        write!(
            output,
            "{}[{}{}] {:>5} / {}{}",
            message.format(self.colored),
            "#".repeat(filled),
            " ".repeat(self.width - filled),
            completed,
            total,
            terminating,
        )
        .expect("FATAL WATRACK ERROR | ProgressPrinter::print (1) | Could not write to `ProgressPrinter` stream.");

        output
            .flush()
            .expect("FATAL WATRACK ERROR | ProgressPrinter::print (2) | Could not flush `ProgressPrinter` stream.");
    }
}

impl Default for ProgressPrinter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressObserver for ProgressPrinter {
    fn update(&self, completed: usize, total: usize) {
        if completed >= total {
            self.print(ProgressStatus::Completed, completed, total);
        } else {
            self.print(ProgressStatus::Running, completed, total);
        }
    }

    fn fail(&self) {
        let mut output = self.output.lock();
        write!(output, "\n{}\n", self.failed_msg.format(self.colored))
            .expect("FATAL WATRACK ERROR | ProgressPrinter::fail | Could not write to `ProgressPrinter` stream.");
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/
