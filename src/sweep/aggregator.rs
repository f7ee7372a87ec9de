// src/sweep/aggregator.rs
// =============================================================================
// Collects outcomes as probes finish.
//
// Every submitted endpoint owns one slot (its position in the input list).
// Workers report `(slot, outcome)` pairs in whatever order they complete; the
// aggregator accepts each slot exactly once, so nothing is lost, duplicated or
// overwritten. It is fed from a single collecting task, so it needs no locks
// of its own.
// =============================================================================

use thiserror::Error;

use super::outcome::{FailureKind, ProbeOutcome, ResultSet};

/// How far a run has come.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn is_done(&self) -> bool {
        self.completed >= self.total
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RecordError {
    #[error("slot {slot} is out of range for {total} endpoints")]
    OutOfRange { slot: usize, total: usize },

    #[error("slot {0} already has an outcome")]
    Duplicate(usize),
}

#[derive(Debug)]
pub struct Aggregator {
    slots: Vec<Option<ProbeOutcome>>,
    completed: usize,
}

impl Aggregator {
    pub fn new(total: usize) -> Self {
        Self {
            slots: vec![None; total],
            completed: 0,
        }
    }

    /// Stores the outcome for `slot`. A slot can only be filled once.
    pub fn record(&mut self, slot: usize, outcome: ProbeOutcome) -> Result<(), RecordError> {
        let total = self.slots.len();
        let entry = self
            .slots
            .get_mut(slot)
            .ok_or(RecordError::OutOfRange { slot, total })?;

        if entry.is_some() {
            return Err(RecordError::Duplicate(slot));
        }

        *entry = Some(outcome);
        self.completed += 1;
        Ok(())
    }

    pub fn progress(&self) -> Progress {
        Progress {
            completed: self.completed,
            total: self.slots.len(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed == self.slots.len()
    }

    /// Consumes the aggregator and returns one outcome per submitted endpoint.
    ///
    /// Slots nobody reported are filled with a `worker_lost` outcome, so the
    /// result always has as many entries as `endpoints`.
    pub fn finish(self, endpoints: &[String]) -> ResultSet {
        self.slots
            .into_iter()
            .zip(endpoints)
            .map(|(slot, endpoint)| {
                slot.unwrap_or_else(|| ProbeOutcome::down(endpoint.as_str(), FailureKind::WorkerLost))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sweep::outcome::Classification;
    use std::time::Duration;

    fn endpoints() -> Vec<String> {
        vec!["http://a.test".to_string(), "http://b.test".to_string(), "http://c.test".to_string()]
    }

    #[test]
    fn test_records_out_of_order() {
        let endpoints = endpoints();
        let mut aggregator = Aggregator::new(endpoints.len());

        aggregator.record(2, ProbeOutcome::timed_out("http://c.test")).unwrap();
        aggregator
            .record(0, ProbeOutcome::up("http://a.test", 200, Duration::from_millis(5)))
            .unwrap();
        assert_eq!(aggregator.progress(), Progress { completed: 2, total: 3 });
        assert!(!aggregator.is_complete());

        aggregator
            .record(1, ProbeOutcome::down("http://b.test", FailureKind::DnsFailure))
            .unwrap();
        assert!(aggregator.is_complete());
        assert!(aggregator.progress().is_done());

        let results = aggregator.finish(&endpoints);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].classification, Classification::Up);
        assert_eq!(results[1].classification, Classification::Down);
        assert_eq!(results[2].classification, Classification::Timeout);
    }

    #[test]
    fn test_rejects_duplicate_slot() {
        let mut aggregator = Aggregator::new(1);
        aggregator.record(0, ProbeOutcome::timed_out("http://a.test")).unwrap();

        let err = aggregator
            .record(0, ProbeOutcome::up("http://a.test", 200, Duration::from_millis(1)))
            .unwrap_err();

        assert_eq!(err, RecordError::Duplicate(0));
        assert_eq!(aggregator.progress().completed, 1);
        // The first outcome is kept
        let results = aggregator.finish(&["http://a.test".to_string()]);
        assert_eq!(results[0].classification, Classification::Timeout);
    }

    #[test]
    fn test_rejects_out_of_range_slot() {
        let mut aggregator = Aggregator::new(2);
        let err = aggregator.record(5, ProbeOutcome::timed_out("x")).unwrap_err();
        assert_eq!(err, RecordError::OutOfRange { slot: 5, total: 2 });
    }

    #[test]
    fn test_finish_fills_missing_slots() {
        let endpoints = endpoints();
        let mut aggregator = Aggregator::new(endpoints.len());
        aggregator.record(1, ProbeOutcome::timed_out("http://b.test")).unwrap();

        let results = aggregator.finish(&endpoints);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].endpoint, "http://a.test");
        assert_eq!(results[0].error_detail.as_deref(), Some("worker_lost"));
        assert_eq!(results[2].error_detail.as_deref(), Some("worker_lost"));
    }

    #[test]
    fn test_empty_is_complete() {
        let aggregator = Aggregator::new(0);
        assert!(aggregator.is_complete());
        assert!(aggregator.finish(&[]).is_empty());
    }
}
