//! Type definitions and aliases

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Probe kind for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProbeMode {
    /// Raw TCP connect
    #[default]
    Tcp,
    /// HTTP(S) GET
    Http,
}

impl ProbeMode {
    pub fn name(&self) -> &'static str {
        match self {
            ProbeMode::Tcp => "TCP",
            ProbeMode::Http => "HTTP",
        }
    }
}

impl fmt::Display for ProbeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// IP address family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressFamily {
    V4,
    V6,
}

impl AddressFamily {
    /// Family of a parsed address
    pub fn of(ip: &IpAddr) -> Self {
        match ip {
            IpAddr::V4(_) => AddressFamily::V4,
            IpAddr::V6(_) => AddressFamily::V6,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AddressFamily::V4 => "IPv4",
            AddressFamily::V6 => "IPv6",
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome classification of a single probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbeStatus {
    /// The target answered in a way that counts as responded
    Success,
    /// The attempt failed; counted as lost
    Failed,
    /// The run was cancelled while the attempt was in flight; not recorded
    Cancelled,
}

impl ProbeStatus {
    pub fn name(&self) -> &'static str {
        match self {
            ProbeStatus::Success => "success",
            ProbeStatus::Failed => "failed",
            ProbeStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
