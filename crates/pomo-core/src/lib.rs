//! Pomo Core - Shared functionality for the pomo timer
//!
//! Everything here is independent of any rendering surface: the time
//! formatter, cycle configuration and the standard paths.

pub mod config;
pub mod format;
pub mod paths;

pub use config::{ConfigError, ConfigOverrides, CycleConfig, Preset};
pub use format::seconds_to_time;
pub use paths::Paths;
