// src/sweep/mod.rs
// =============================================================================
// The probing engine.
//
// Submodules:
// - outcome: ProbeOutcome, Classification and the failure tags
// - probe: one HTTP GET against one endpoint, classified
// - scheduler: the worker pool that runs all probes with bounded concurrency
// - aggregator: collects outcomes in any order and tracks progress
// =============================================================================

mod aggregator;
mod outcome;
mod probe;
mod scheduler;

#[cfg(test)]
mod fixture;

pub use aggregator::Progress;
pub use outcome::{Classification, FailureKind, ProbeOutcome};
pub use scheduler::{Scheduler, SweepError};
