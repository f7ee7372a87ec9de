// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Every setting can come from three places, highest priority first:
// 1. A command-line flag (--timeout 5)
// 2. An environment variable (TIMEOUT=5)
// 3. A `.env` file in the working directory (loaded in main.rs)
// and falls back to the defaults in config.rs.
// =============================================================================

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{
    ConfigError, ProbeConfig, DEFAULT_MAX_WORKERS, DEFAULT_TIMEOUT_SECS, DEFAULT_URL_FILE,
};

#[derive(Parser, Debug)]
#[command(
    name = "endpoint-sweep",
    version,
    about = "Probe a list of HTTP endpoints concurrently and report availability and latency",
    long_about = "endpoint-sweep reads a list of URLs (one per line, '#' for comments), sends one GET \
                  to each with a bounded number of requests in flight, and prints a table of \
                  UP / TIMEOUT / DOWN results with status codes and response times."
)]
pub struct Cli {
    /// File containing the endpoints to probe
    #[arg(short, long, env = "URL_FILE", default_value = DEFAULT_URL_FILE)]
    pub file: PathBuf,

    /// Per-request timeout in seconds
    #[arg(short, long, env = "TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Maximum number of probes running at the same time
    #[arg(short = 'w', long, env = "MAX_WORKERS", default_value_t = DEFAULT_MAX_WORKERS)]
    pub max_workers: usize,

    /// Output results in JSON format instead of a table
    #[arg(long)]
    pub json: bool,

    /// Do not print the progress line on stderr
    #[arg(long)]
    pub no_progress: bool,
}

impl Cli {
    /// Builds the validated probe configuration from the parsed arguments
    pub fn probe_config(&self) -> Result<ProbeConfig, ConfigError> {
        ProbeConfig::new(Duration::from_secs(self.timeout), self.max_workers)
    }
}
