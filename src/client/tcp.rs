//! TCP connect probe

use super::{elapsed_ms, with_deadline, Prober};
use crate::{error::ProbeError, models::ProbeOutcome, types::ProbeMode};
use async_trait::async_trait;
use std::{net::SocketAddr, time::{Duration, Instant}};
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;

/// Measures how long a TCP handshake with `addr` takes
#[derive(Debug, Clone)]
pub struct TcpProber {
    addr: SocketAddr,
    timeout: Option<Duration>,
}

impl TcpProber {
    /// `timeout` of `None` waits for the operating system to give up
    pub fn new(addr: SocketAddr, timeout: Option<Duration>) -> Self {
        Self { addr, timeout }
    }
}

#[async_trait]
impl Prober for TcpProber {
    fn mode(&self) -> ProbeMode {
        ProbeMode::Tcp
    }

    async fn probe(&self, seq: u64, cancel: &CancellationToken) -> ProbeOutcome {
        let start = Instant::now();

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return ProbeOutcome::cancelled(seq, elapsed_ms(start)),
            result = with_deadline(self.timeout, TcpStream::connect(self.addr)) => result,
        };
        let elapsed = elapsed_ms(start);

        match result {
            Some(Ok(stream)) => {
                // Only the handshake is measured, the connection is closed right away
                let local_addr = stream.local_addr().ok();
                drop(stream);
                ProbeOutcome::tcp_success(seq, elapsed, local_addr)
            }
            Some(Err(e)) => ProbeOutcome::failure(seq, elapsed, ProbeError::Connect(e.to_string())),
            None => ProbeOutcome::failure(
                seq,
                elapsed,
                ProbeError::Timeout(self.timeout.unwrap_or_default()),
            ),
        }
    }
}
