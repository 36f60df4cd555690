//! Running statistics for a probe run
//!
//! `sent` is a lock-free counter bumped on every record call. Everything
//! else only changes on success and is updated as one unit under a mutex,
//! so extrema and averages are never computed from a torn state.

use crate::{
    models::{bandwidth_mbps, ProbeOutcome, Statistics},
    types::ProbeMode,
};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Mutex, MutexGuard,
};

#[derive(Debug, Default)]
struct SuccessState {
    responded: u64,
    total_ms: f64,
    min_ms: f64,
    max_ms: f64,
    total_bytes: u64,
    total_bandwidth: f64,
    min_bandwidth: f64,
    max_bandwidth: f64,
}

impl SuccessState {
    fn record_time(&mut self, elapsed_ms: f64) {
        if self.responded == 0 {
            self.min_ms = elapsed_ms;
            self.max_ms = elapsed_ms;
        } else {
            self.min_ms = self.min_ms.min(elapsed_ms);
            self.max_ms = self.max_ms.max(elapsed_ms);
        }
        self.total_ms += elapsed_ms;
    }

    fn record_bandwidth(&mut self, bandwidth: f64) {
        if self.responded == 0 {
            self.min_bandwidth = bandwidth;
            self.max_bandwidth = bandwidth;
        } else {
            self.min_bandwidth = self.min_bandwidth.min(bandwidth);
            self.max_bandwidth = self.max_bandwidth.max(bandwidth);
        }
        self.total_bandwidth += bandwidth;
    }
}

/// Thread-safe accumulator of probe results
#[derive(Debug, Default)]
pub struct StatisticsAggregator {
    sent: AtomicU64,
    state: Mutex<SuccessState>,
}

impl StatisticsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SuccessState> {
        // The state is always left consistent, a poisoned lock is still usable
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record one TCP connect attempt
    pub fn record_tcp(&self, elapsed_ms: f64, success: bool) {
        self.sent.fetch_add(1, Ordering::SeqCst);
        if !success {
            return;
        }

        let mut state = self.lock();
        state.record_time(elapsed_ms);
        state.responded += 1;
    }

    /// Record one HTTP request; `bytes` is body plus header estimate
    pub fn record_http(&self, elapsed_ms: f64, bytes: u64, success: bool) {
        self.sent.fetch_add(1, Ordering::SeqCst);
        if !success {
            return;
        }

        let bandwidth = bandwidth_mbps(bytes, elapsed_ms);
        let mut state = self.lock();
        state.record_time(elapsed_ms);
        state.record_bandwidth(bandwidth);
        state.total_bytes += bytes;
        state.responded += 1;
    }

    /// Record a probe outcome for the given mode. Cancelled probes are not
    /// counted at all.
    pub fn record_outcome(&self, mode: ProbeMode, outcome: &ProbeOutcome) {
        if outcome.is_cancelled() {
            return;
        }

        match mode {
            ProbeMode::Tcp => self.record_tcp(outcome.elapsed_ms, outcome.is_success()),
            ProbeMode::Http => self.record_http(outcome.elapsed_ms, outcome.bytes, outcome.is_success()),
        }
    }

    /// Number of record calls so far
    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::SeqCst)
    }

    /// Consistent copy of the current statistics
    pub fn snapshot(&self) -> Statistics {
        let state = self.lock();
        let sent = self.sent();

        if state.responded == 0 {
            return Statistics {
                sent,
                ..Statistics::empty()
            };
        }

        let responded = state.responded as f64;
        Statistics {
            sent,
            responded: state.responded,
            min_ms: state.min_ms,
            max_ms: state.max_ms,
            avg_ms: bounded_mean(state.total_ms, responded, state.min_ms, state.max_ms),
            total_bytes: state.total_bytes,
            min_bandwidth_mbps: state.min_bandwidth,
            max_bandwidth_mbps: state.max_bandwidth,
            avg_bandwidth_mbps: bounded_mean(
                state.total_bandwidth,
                responded,
                state.min_bandwidth,
                state.max_bandwidth,
            ),
        }
    }
}

/// `total / count` kept inside `[min, max]`; summing rounds, so the raw
/// quotient can land an ulp outside the observed range
fn bounded_mean(total: f64, count: f64, min: f64, max: f64) -> f64 {
    (total / count).max(min).min(max)
}
