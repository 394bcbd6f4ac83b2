//! Configuration for the Selene planet renderer.
//!
//! Runtime-configurable settings persisted to disk as RON files, with CLI
//! overrides via clap, hot-reload detection, and forward/backward
//! compatible serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, DemoConfig, FetchConfig, LodConfig, PlanetConfig};
pub use error::ConfigError;
