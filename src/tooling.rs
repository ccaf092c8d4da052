//! Tooling Layer
//!
//! Command-line entry points over the catalog scanner, sidecar writer and
//! remote clients.

pub mod cli;

pub use cli::{Cli, CliContext, Commands, EagleCommands};
