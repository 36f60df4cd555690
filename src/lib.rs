//! TCPing
//!
//! Repeatedly probes a network target, either by TCP connect or by HTTP(S)
//! GET, at a fixed cadence and aggregates latency, payload size and
//! bandwidth into running statistics reported when the run ends.

pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod dns;
pub mod error;
pub mod executor;
pub mod logging;
pub mod messages;
pub mod models;
pub mod output;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, ProbeError, ResolveError, Result};
pub use models::{Options, ProbeOutcome, Statistics};
pub use stats::StatisticsAggregator;
pub use executor::{CancellationController, ProbeObserver, ProbeScheduler, RunSummary, SchedulerState};
pub use client::{HttpProber, Prober, TcpProber};
pub use app::{App, RunReport};
pub use messages::Locale;

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PROGRAM_NAME: &str = "TCPing";
pub const COPYRIGHT: &str = "Copyright (c) 2025. All rights reserved.";

/// Commit hash captured by the build script, `unknown` outside a git checkout
pub const GIT_COMMIT: &str = match option_env!("TCPING_GIT_COMMIT") {
    Some(commit) => commit,
    None => "unknown",
};

/// Build timestamp captured by the build script
pub const BUILD_TIME: Option<&str> = option_env!("TCPING_BUILD_TIME");

/// Identifying client tag sent with every HTTP probe
pub fn user_agent() -> String {
    format!("tcping/{}.{}", VERSION, GIT_COMMIT)
}

/// Default configuration values
pub mod defaults {
    pub const DEFAULT_COUNT: u64 = 4;
    pub const DEFAULT_INTERVAL_MS: u64 = 1000;
    pub const DEFAULT_TIMEOUT_MS: u64 = 1000;
    pub const DEFAULT_PORT: u16 = 80;
    pub const DEFAULT_ENABLE_COLOR: bool = false;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_carries_version_and_commit() {
        let ua = user_agent();
        assert!(ua.starts_with("tcping/"));
        assert!(ua.contains(VERSION));
        assert!(ua.ends_with(GIT_COMMIT));
    }
}
