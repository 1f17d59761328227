//! Small helpers shared by the workspace crates: environment lookup,
//! TOML configuration loading and tracing setup.

pub mod config;
pub mod env;
pub mod logging;
