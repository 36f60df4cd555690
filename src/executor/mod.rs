//! Probe loop and run lifecycle
//!
//! [`ProbeScheduler`] issues one probe at a time, records each outcome and
//! waits out the interval between probes. [`CancellationController`] owns
//! the token that ends the loop early and the task that fires it on an
//! operator interrupt.

pub mod cancellation;

pub use cancellation::CancellationController;

use crate::{
    client::Prober,
    logging::Logger,
    models::{Options, ProbeOutcome},
    stats::StatisticsAggregator,
};
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Duration};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Lifecycle of a probe run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulerState {
    Idle,
    Running,
    /// A probe is in flight
    Probing,
    /// Between two probes
    Waiting,
    Completed,
    Cancelled,
}

impl SchedulerState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SchedulerState::Completed | SchedulerState::Cancelled)
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub final_state: SchedulerState,
    /// Probes started, including one aborted by cancellation
    pub probes_issued: u64,
}

/// Receives every probe outcome as it happens
pub trait ProbeObserver: Send + Sync {
    /// A probe finished and was recorded
    fn on_outcome(&self, outcome: &ProbeOutcome);

    /// A probe was aborted by cancellation and not recorded
    fn on_cancelled(&self, _outcome: &ProbeOutcome) {}
}

/// Sequential probe loop
pub struct ProbeScheduler {
    count: u64,
    interval: Duration,
    prober: Arc<dyn Prober>,
    aggregator: Arc<StatisticsAggregator>,
    observer: Arc<dyn ProbeObserver>,
    logger: Logger,
    state: watch::Sender<SchedulerState>,
}

impl ProbeScheduler {
    pub fn new(
        options: &Options,
        prober: Arc<dyn Prober>,
        aggregator: Arc<StatisticsAggregator>,
        observer: Arc<dyn ProbeObserver>,
        logger: Logger,
    ) -> Self {
        let (state, _) = watch::channel(SchedulerState::Idle);
        Self {
            count: options.count,
            interval: options.interval(),
            prober,
            aggregator,
            observer,
            logger,
            state,
        }
    }

    pub fn state(&self) -> SchedulerState {
        *self.state.borrow()
    }

    /// Watch state transitions, e.g. from another task
    pub fn subscribe(&self) -> watch::Receiver<SchedulerState> {
        self.state.subscribe()
    }

    pub fn aggregator(&self) -> &Arc<StatisticsAggregator> {
        &self.aggregator
    }

    fn set_state(&self, state: SchedulerState) {
        let previous = self.state.send_replace(state);
        if previous != state {
            self.logger
                .trace("Scheduler state changed")
                .field("from", previous)
                .field("to", state)
                .log();
        }
    }

    fn finish(&self, final_state: SchedulerState, probes_issued: u64) -> RunSummary {
        self.set_state(final_state);
        self.logger
            .debug("Probe run finished")
            .field("state", final_state)
            .field("probes_issued", probes_issued)
            .log();
        RunSummary {
            final_state,
            probes_issued,
        }
    }

    /// Run until `count` probes were made or `cancel` fires.
    ///
    /// A count of zero repeats until cancellation.
    pub async fn run(&self, cancel: CancellationToken) -> RunSummary {
        let mode = self.prober.mode();
        self.set_state(SchedulerState::Running);
        self.logger
            .debug("Probe run started")
            .field("mode", mode.to_string())
            .field("count", self.count)
            .field("interval_ms", self.interval.as_millis() as u64)
            .log();

        let mut seq: u64 = 0;
        loop {
            if cancel.is_cancelled() {
                return self.finish(SchedulerState::Cancelled, seq);
            }

            self.set_state(SchedulerState::Probing);
            let outcome = self.prober.probe(seq, &cancel).await;

            if outcome.is_cancelled() {
                self.observer.on_cancelled(&outcome);
                return self.finish(SchedulerState::Cancelled, seq + 1);
            }

            self.aggregator.record_outcome(mode, &outcome);
            self.logger
                .trace("Probe recorded")
                .field("seq", seq)
                .field("status", outcome.status.to_string())
                .field("elapsed_ms", outcome.elapsed_ms)
                .log();
            if let Some(ref error) = outcome.error {
                self.logger
                    .debug("Probe failed")
                    .field("seq", seq)
                    .field("kind", error.kind())
                    .field("error", error.to_string())
                    .log();
            }
            self.observer.on_outcome(&outcome);

            if self.count != 0 && seq == self.count - 1 {
                return self.finish(SchedulerState::Completed, seq + 1);
            }

            self.set_state(SchedulerState::Waiting);
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return self.finish(SchedulerState::Cancelled, seq + 1),
                _ = tokio::time::sleep(self.interval) => {}
            }

            seq += 1;
        }
    }
}
