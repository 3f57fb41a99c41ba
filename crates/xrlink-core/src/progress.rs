//! Per-tick loading progress reporting
//!
//! While a load is in flight every tick yields a progress message. The first
//! tick that sees the load finished yields a single `1.0` and the reporter goes
//! quiet until the next open-scene call re-arms it.

use tracing::{debug, info};

use crate::host::{LoadCounters, SceneHost};
use crate::message::OutgoingStatusMessage;

#[derive(Debug)]
pub struct LoadingProgressReporter {
    is_loading: bool,
}

impl Default for LoadingProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadingProgressReporter {
    /// Starts armed: the host is loading its initial stage
    pub fn new() -> Self {
        Self { is_loading: true }
    }

    #[cfg(test)]
    pub(crate) fn idle() -> Self {
        Self { is_loading: false }
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Begin a new load cycle
    pub fn arm(&mut self) {
        debug!("Progress reporting armed");
        self.is_loading = true;
    }

    /// Sample the host counters for this tick
    pub fn on_tick<H: SceneHost + ?Sized>(&mut self, host: &H) -> Option<OutgoingStatusMessage> {
        if !self.is_loading {
            return None;
        }
        self.sample(host.load_counters())
    }

    /// Compute the message for one counter snapshot
    pub fn sample(&mut self, counters: LoadCounters) -> Option<OutgoingStatusMessage> {
        if !self.is_loading {
            return None;
        }

        let LoadCounters {
            loaded_count,
            total_count,
        } = counters;

        // Nothing left to load, including the 0/0 case
        let progress = if total_count == 0 {
            1.0
        } else {
            (loaded_count as f64 / total_count as f64).min(1.0)
        };

        if progress >= 1.0 {
            self.is_loading = false;
            info!(loaded = loaded_count, total = total_count, "File loading complete");
        }

        Some(OutgoingStatusMessage::FileLoadingProgress { progress })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress_of(msg: Option<OutgoingStatusMessage>) -> Option<f64> {
        msg.map(|m| match m {
            OutgoingStatusMessage::FileLoadingProgress { progress } => progress,
            other => panic!("unexpected message: {other:?}"),
        })
    }

    #[test]
    fn test_nothing_to_load_completes_once() {
        let mut reporter = LoadingProgressReporter::idle();
        reporter.arm();

        assert_eq!(progress_of(reporter.sample(LoadCounters::new(0, 0))), Some(1.0));
        assert!(!reporter.is_loading());
        assert_eq!(reporter.sample(LoadCounters::new(0, 0)), None);
    }

    #[test]
    fn test_progress_sequence_with_single_completion() {
        let mut reporter = LoadingProgressReporter::idle();
        reporter.arm();

        let emitted: Vec<f64> = [
            LoadCounters::new(3, 10),
            LoadCounters::new(10, 10),
            LoadCounters::new(0, 0),
        ]
        .into_iter()
        .filter_map(|c| progress_of(reporter.sample(c)))
        .collect();

        assert_eq!(emitted, vec![0.3, 1.0]);
        assert!(!reporter.is_loading());
    }

    #[test]
    fn test_chatty_while_loading() {
        let mut reporter = LoadingProgressReporter::new();
        for _ in 0..3 {
            assert_eq!(progress_of(reporter.sample(LoadCounters::new(1, 4))), Some(0.25));
        }
        assert!(reporter.is_loading());
    }

    #[test]
    fn test_idle_until_rearmed() {
        let mut reporter = LoadingProgressReporter::idle();
        assert_eq!(reporter.sample(LoadCounters::new(1, 4)), None);

        reporter.arm();
        assert_eq!(progress_of(reporter.sample(LoadCounters::new(2, 4))), Some(0.5));
    }

    #[test]
    fn test_odd_counters_never_produce_nan() {
        let mut reporter = LoadingProgressReporter::new();
        assert_eq!(progress_of(reporter.sample(LoadCounters::new(5, 0))), Some(1.0));

        reporter.arm();
        assert_eq!(progress_of(reporter.sample(LoadCounters::new(12, 10))), Some(1.0));
        assert!(!reporter.is_loading());
    }

    #[test]
    fn test_on_tick_reads_host_counters() {
        let mut host = crate::host::fake::FakeHost::default();
        host.counters = LoadCounters::new(1, 2);
        let mut reporter = LoadingProgressReporter::new();
        assert_eq!(progress_of(reporter.on_tick(&host)), Some(0.5));
    }
}
