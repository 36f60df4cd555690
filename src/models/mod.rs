//! Data models and structures for tcping

pub mod config;
pub mod metrics;

// Re-export main model types
pub use config::Options;
pub use metrics::{bandwidth_mbps, HttpDetail, ProbeOutcome, Statistics};
