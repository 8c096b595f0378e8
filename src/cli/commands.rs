//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Solidafy Pager CLI
#[derive(Parser, Debug)]
#[command(name = "solidafy-pager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Browse a JSON array of items page by page
    Browse {
        /// JSON file holding an array of items
        #[arg(short, long)]
        data: PathBuf,

        /// Items per page
        #[arg(long, default_value = "10")]
        per_page: u32,

        /// Simulated latency of every page request
        #[arg(long, default_value = "0")]
        latency_ms: u64,

        /// Paginator settings file (YAML or JSON)
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Comma-separated steps: next, prev, first, last, goto:N, clear, refresh
        #[arg(long, default_value = "")]
        script: String,
    },

    /// Normalize a raw page response
    Normalize {
        /// JSON file holding the raw response
        #[arg(short, long)]
        input: PathBuf,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
