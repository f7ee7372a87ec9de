// src/config.rs
// =============================================================================
// The run configuration handed to the scheduler.
//
// The raw values come from the command line / environment (see cli.rs).
// This module turns them into a validated ProbeConfig that is built once at
// startup and then only read.
// =============================================================================

use std::time::Duration;
use thiserror::Error;

/// Default per-request deadline, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of probes allowed in flight at once
pub const DEFAULT_MAX_WORKERS: usize = 10;

/// Default location of the endpoint list
pub const DEFAULT_URL_FILE: &str = "endpoints.txt";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max workers must be at least 1")]
    ZeroConcurrency,

    #[error("timeout must be greater than zero")]
    ZeroTimeout,
}

/// Per-run probing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeConfig {
    timeout: Duration,
    max_concurrency: usize,
}

impl ProbeConfig {
    pub fn new(timeout: Duration, max_concurrency: usize) -> Result<Self, ConfigError> {
        if max_concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(Self {
            timeout,
            max_concurrency,
        })
    }

    /// Deadline applied to every single request
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Upper bound on simultaneously running probes
    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_concurrency: DEFAULT_MAX_WORKERS,
        }
    }
}
