//! Configuration management module

pub mod env;
pub mod parser;
pub mod validation;

// Re-export main functionality
pub use env::EnvManager;
pub use parser::{display_config_summary, load_config, ConfigParser, RunConfig};
pub use validation::{validate_config, ConfigValidator, TargetSpec};

// Re-export from models for convenience
pub use crate::models::Options;
