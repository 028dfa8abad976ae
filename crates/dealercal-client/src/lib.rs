//! CLI, configuration, selection notifiers
//!
//! This crate provides the `dealercal` command-line interface.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod notify;
pub mod secret;

pub use cli::Cli;
pub use error::{ClientError, ClientResult};
