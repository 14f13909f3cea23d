// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Spatial matching and tracking of waters across trajectories.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::errors::AnalysisError;
use crate::progress::ProgressObserver;

pub mod assignment;
pub mod containment;
pub mod matching;
pub mod statistics;
pub mod tracking;

/// Token allowing to cancel a running analysis from another thread.
///
/// Cancellation is checked before each trajectory frame is analyzed.
/// A cancelled analysis returns `AnalysisError::Cancelled`.
///
/// ## Example
/// ```
/// # use watrack_rs::analysis::CancellationToken;
/// #
/// let token = CancellationToken::new();
/// let handle = token.clone();
///
/// assert!(!token.is_cancelled());
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Create a new token which has not been cancelled.
    pub fn new() -> Self {
        CancellationToken::default()
    }

    /// Request cancellation of all analyses using this token.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns `true` if cancellation has been requested.
    #[inline(always)]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Returns `AnalysisError::Cancelled` if cancellation has been requested.
    #[inline(always)]
    pub(crate) fn check(&self) -> Result<(), AnalysisError> {
        if self.is_cancelled() {
            Err(AnalysisError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Options shared by all multi-trajectory analyses.
#[derive(Clone, Copy, Default)]
pub(crate) struct RunOptions<'a> {
    pub n_threads: usize,
    pub progress: Option<&'a dyn ProgressObserver>,
    pub cancellation: Option<&'a CancellationToken>,
}

impl<'a> RunOptions<'a> {
    pub(crate) fn check_cancelled(&self) -> Result<(), AnalysisError> {
        match self.cancellation {
            Some(token) => token.check(),
            None => Ok(()),
        }
    }
}

/// Apply `body` to each trajectory, distributing the trajectories between `options.n_threads` threads.
///
/// Each trajectory is analyzed by exactly one thread; results are returned in the order of the trajectories.
/// If analysis of any trajectory fails, the remaining trajectories are not started and
/// the error of the first failed trajectory (in input order) is returned.
pub(crate) fn for_each_trajectory<T, F>(
    trajectories: &[PathBuf],
    options: RunOptions,
    body: F,
) -> Result<Vec<T>, AnalysisError>
where
    T: Send,
    F: Fn(&Path) -> Result<T, AnalysisError> + Sync,
{
    let total = trajectories.len();
    let n_threads = options.n_threads.clamp(1, total.max(1));

    let next = AtomicUsize::new(0);
    let abort = AtomicBool::new(false);
    let completed = Mutex::new(0usize);

    if let Some(observer) = options.progress {
        observer.update(0, total);
    }

    let mut results = std::thread::scope(|s| {
        let handles = (0..n_threads)
            .map(|_| {
                s.spawn(|| {
                    let mut local = Vec::new();

                    while !abort.load(Ordering::Relaxed) {
                        let index = next.fetch_add(1, Ordering::Relaxed);
                        if index >= total {
                            break;
                        }

                        let result = options
                            .check_cancelled()
                            .and_then(|_| body(&trajectories[index]));

                        if result.is_err() {
                            abort.store(true, Ordering::Relaxed);
                        } else if let Some(observer) = options.progress {
                            let mut n_completed = completed.lock();
                            *n_completed += 1;
                            observer.update(*n_completed, total);
                        }

                        local.push((index, result));
                    }

                    local
                })
            })
            .collect::<Vec<_>>();

        handles
            .into_iter()
            .flat_map(|handle| {
                handle.join().expect(
                    "FATAL WATRACK ERROR | analysis::for_each_trajectory | A thread panicked!",
                )
            })
            .collect::<Vec<(usize, Result<T, AnalysisError>)>>()
    });

    results.sort_by_key(|(index, _)| *index);

    let collected = results
        .into_iter()
        .map(|(_, result)| result)
        .collect::<Result<Vec<T>, AnalysisError>>();

    if collected.is_err() {
        if let Some(observer) = options.progress {
            observer.fail();
        }
    }

    collected
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ConfigError;

    fn paths(n: usize) -> Vec<PathBuf> {
        (0..n)
            .map(|i| PathBuf::from(format!("trajectory_{}.pdb", i)))
            .collect()
    }

    #[test]
    fn results_in_input_order() {
        for n_threads in [1, 2, 3, 8, 64] {
            let options = RunOptions {
                n_threads,
                ..RunOptions::default()
            };

            let results = for_each_trajectory(&paths(20), options, |path| {
                Ok(path.to_string_lossy().to_string())
            })
            .unwrap();

            let expected = paths(20)
                .iter()
                .map(|p| p.to_string_lossy().to_string())
                .collect::<Vec<String>>();

            assert_eq!(results, expected);
        }
    }

    #[test]
    fn progress_is_monotonic() {
        let updates = Mutex::new(Vec::new());
        let observer = |completed: usize, total: usize| {
            assert_eq!(total, 10);
            updates.lock().push(completed);
        };

        let options = RunOptions {
            n_threads: 4,
            progress: Some(&observer),
            cancellation: None,
        };

        for_each_trajectory(&paths(10), options, |_| Ok(())).unwrap();

        let updates = updates.into_inner();
        assert_eq!(updates, (0..=10).collect::<Vec<usize>>());
    }

    #[test]
    fn first_error_wins() {
        let options = RunOptions {
            n_threads: 1,
            ..RunOptions::default()
        };

        let result = for_each_trajectory(&paths(10), options, |path| {
            if path.to_string_lossy().contains('3') {
                Err(AnalysisError::Config(ConfigError::NoWaters))
            } else if path.to_string_lossy().contains('5') {
                Err(AnalysisError::Config(ConfigError::InvalidThreads))
            } else {
                Ok(())
            }
        });

        assert_eq!(result, Err(AnalysisError::Config(ConfigError::NoWaters)));
    }

    #[test]
    fn cancelled() {
        let token = CancellationToken::new();
        token.cancel();

        let options = RunOptions {
            n_threads: 2,
            progress: None,
            cancellation: Some(&token),
        };

        let result = for_each_trajectory(&paths(4), options, |_| Ok(()));
        assert_eq!(result, Err(AnalysisError::Cancelled));
    }

    #[test]
    fn empty() {
        let results =
            for_each_trajectory(&[], RunOptions::default(), |_| Ok(0usize)).unwrap();
        assert!(results.is_empty());
    }
}
