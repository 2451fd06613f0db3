//! CLI tool for exploring bounded-load hash rings.
//!
//! Provides commands for:
//! - Locating the partition and bucket of a key
//! - Inspecting per-bucket loads against the load cap
//! - Dumping the full ring state as JSON

pub mod commands;
pub mod config;

pub use commands::{Command, CommandResult};
pub use config::{CliConfig, RingArgs};
