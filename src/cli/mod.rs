//! CLI module
//!
//! Command-line interface for exercising a paginator against local data.
//!
//! # Commands
//!
//! - `browse` - Run a navigation script over a JSON array of items
//! - `normalize` - Normalize a raw page response and print the record

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
