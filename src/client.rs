//! Probe executors for the two probe kinds
//!
//! A [`Prober`] owns its target and timeout and performs one attempt per
//! call. Every attempt races against the run's cancellation token, so a
//! Ctrl-C never waits for a slow connect or download to finish.

pub mod http;
pub mod tcp;

pub use http::HttpProber;
pub use tcp::TcpProber;

use crate::{models::ProbeOutcome, types::ProbeMode};
use async_trait::async_trait;
use std::{
    future::Future,
    time::{Duration, Instant},
};
use tokio_util::sync::CancellationToken;

/// One probe attempt against a fixed target
#[async_trait]
pub trait Prober: Send + Sync {
    /// Kind of probe this executor performs
    fn mode(&self) -> ProbeMode;

    /// Perform attempt number `seq`.
    ///
    /// Never fails: network problems become a failed outcome, and a fired
    /// `cancel` token yields a cancelled outcome.
    async fn probe(&self, seq: u64, cancel: &CancellationToken) -> ProbeOutcome;
}

/// Run `future` under an optional deadline. `None` is returned when the
/// deadline passed first.
pub(crate) async fn with_deadline<F: Future>(deadline: Option<Duration>, future: F) -> Option<F::Output> {
    match deadline {
        Some(limit) => tokio::time::timeout(limit, future).await.ok(),
        None => Some(future.await),
    }
}

/// Fractional milliseconds since `start`, microsecond resolution
pub(crate) fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_micros() as f64 / 1000.0
}
