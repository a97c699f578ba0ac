//! Pocket Player CLI Library
//!
//! Headless driver for the playback core: configuration loading, the command
//! grammar and the loop that feeds commands to a session.
//!
//! This library exposes the driver for testing purposes.

pub mod commands;
pub mod config;
pub mod driver;
pub mod error;

// Re-export commonly used types for convenience
pub use commands::ReplCommand;
pub use config::{CliConfig, DurationOverride, SimulationSettings};
pub use driver::{Driver, Outcome, StatusSnapshot};
pub use error::{CliError, Result};
