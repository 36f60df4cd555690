//! Probe outcome and statistics data models

use crate::error::ProbeError;
use crate::types::ProbeStatus;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Bandwidth estimate in Mbps for `bytes` transferred in `elapsed_ms`.
///
/// `(bytes * 8) / (elapsed_ms * 1000)`; zero when no time elapsed.
pub fn bandwidth_mbps(bytes: u64, elapsed_ms: f64) -> f64 {
    if elapsed_ms > 0.0 {
        (bytes as f64 * 8.0) / (elapsed_ms * 1000.0)
    } else {
        0.0
    }
}

/// Extra response details kept for verbose output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpDetail {
    /// Status line such as `200 OK`
    pub status_line: String,
    /// Response headers in arrival order
    pub headers: Vec<(String, String)>,
}

impl HttpDetail {
    /// First value of a header, case-insensitive
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Result of one probe attempt.
///
/// Produced once per iteration, handed to the aggregator and the
/// observer, then dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    /// 0-based sequence number within the run
    pub seq: u64,
    /// Success, failure or cancellation
    pub status: ProbeStatus,
    /// Wall-clock time of the attempt in fractional milliseconds
    pub elapsed_ms: f64,
    /// Bytes transferred (HTTP only, body plus header estimate)
    pub bytes: u64,
    /// HTTP status code when a response was received
    pub status_code: Option<u16>,
    /// Why the attempt failed
    #[serde(skip)]
    pub error: Option<ProbeError>,
    /// Local socket address of a successful TCP connect
    pub local_addr: Option<SocketAddr>,
    /// Response details for verbose output
    pub http: Option<HttpDetail>,
}

impl ProbeOutcome {
    fn base(seq: u64, status: ProbeStatus, elapsed_ms: f64) -> Self {
        Self {
            seq,
            status,
            elapsed_ms,
            bytes: 0,
            status_code: None,
            error: None,
            local_addr: None,
            http: None,
        }
    }

    /// Successful TCP connect
    pub fn tcp_success(seq: u64, elapsed_ms: f64, local_addr: Option<SocketAddr>) -> Self {
        Self {
            local_addr,
            ..Self::base(seq, ProbeStatus::Success, elapsed_ms)
        }
    }

    /// Any attempt that failed before a usable answer
    pub fn failure(seq: u64, elapsed_ms: f64, error: ProbeError) -> Self {
        Self {
            error: Some(error),
            ..Self::base(seq, ProbeStatus::Failed, elapsed_ms)
        }
    }

    /// HTTP response fully read. Status codes in `[200, 400)` succeed,
    /// anything else is recorded as a failed probe.
    pub fn http_response(seq: u64, elapsed_ms: f64, bytes: u64, status_code: u16, detail: HttpDetail) -> Self {
        let success = (200..400).contains(&status_code);
        let mut outcome = Self::base(
            seq,
            if success { ProbeStatus::Success } else { ProbeStatus::Failed },
            elapsed_ms,
        );
        outcome.bytes = bytes;
        outcome.status_code = Some(status_code);
        outcome.http = Some(detail);
        if !success {
            outcome.error = Some(ProbeError::HttpStatus(status_code));
        }
        outcome
    }

    /// Attempt aborted by cancellation
    pub fn cancelled(seq: u64, elapsed_ms: f64) -> Self {
        Self::base(seq, ProbeStatus::Cancelled, elapsed_ms)
    }

    pub fn is_success(&self) -> bool {
        self.status == ProbeStatus::Success
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == ProbeStatus::Cancelled
    }

    /// Bandwidth estimate for this attempt in Mbps
    pub fn bandwidth_mbps(&self) -> f64 {
        bandwidth_mbps(self.bytes, self.elapsed_ms)
    }
}

/// Point-in-time view of the run statistics.
///
/// Extrema and averages only cover successful probes and are zero while
/// `responded == 0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub sent: u64,
    pub responded: u64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub avg_ms: f64,
    /// HTTP only
    pub total_bytes: u64,
    pub min_bandwidth_mbps: f64,
    pub max_bandwidth_mbps: f64,
    pub avg_bandwidth_mbps: f64,
}

impl Statistics {
    /// Create empty statistics
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn lost(&self) -> u64 {
        self.sent.saturating_sub(self.responded)
    }

    /// Loss rate as a percentage, `0` before anything was sent
    pub fn loss_rate(&self) -> f64 {
        if self.sent == 0 {
            0.0
        } else {
            self.lost() as f64 / self.sent as f64 * 100.0
        }
    }

    /// Total transferred data in MiB
    pub fn total_megabytes(&self) -> f64 {
        self.total_bytes as f64 / 1024.0 / 1024.0
    }
}
