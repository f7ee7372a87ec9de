// src/sweep/scheduler.rs
// =============================================================================
// Runs probes over a fixed-size worker pool.
//
// How it works:
// 1. Every endpoint is put in a shared FIFO queue together with its slot
//    (its index in the input list)
// 2. `min(max_concurrency, endpoints)` workers are spawned; each one pops an
//    endpoint, probes it, sends `(slot, outcome)` down a channel, and repeats
//    until the queue is empty
// 3. The calling task drains the channel into the Aggregator and publishes
//    progress after every outcome
// 4. Once every slot is filled, the workers are joined and the ResultSet is
//    returned
//
// Since each worker runs one probe at a time, the number of probes in flight
// can never exceed the number of workers.
// =============================================================================

use futures::future::join_all;
use reqwest::Client;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, watch, Mutex};
use tracing::{debug, info, warn};

use super::aggregator::{Aggregator, Progress};
use super::outcome::{FailureKind, ProbeOutcome, ResultSet};
use super::probe::probe;
use crate::config::ProbeConfig;

/// Redirects followed before a probe is classified as `too_many_redirects`
const MAX_REDIRECTS: usize = 10;

#[derive(Error, Debug)]
pub enum SweepError {
    #[error("failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

type PendingQueue = Arc<Mutex<VecDeque<(usize, String)>>>;

pub struct Scheduler {
    client: Client,
    config: ProbeConfig,
    progress: watch::Sender<Progress>,
}

impl Scheduler {
    pub fn new(config: ProbeConfig) -> Result<Self, SweepError> {
        // Reused for every probe (connection pooling); the deadline is set per request
        let client = Client::builder()
            .user_agent(concat!("endpoint-sweep/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;

        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: ProbeConfig, client: Client) -> Self {
        let (progress, _) = watch::channel(Progress::default());
        Self {
            client,
            config,
            progress,
        }
    }

    /// Subscribes to the completed/total counter of the current run.
    pub fn subscribe(&self) -> watch::Receiver<Progress> {
        self.progress.subscribe()
    }

    /// Probes every endpoint and waits for all of them.
    ///
    /// The returned set has exactly one outcome per input entry, duplicates
    /// included. Its order is not meaningful.
    pub async fn run(&self, endpoints: Vec<String>) -> ResultSet {
        let total = endpoints.len();
        self.progress.send_replace(Progress {
            completed: 0,
            total,
        });

        if endpoints.is_empty() {
            debug!("no endpoints to probe");
            return ResultSet::new();
        }

        let workers = self.config.max_concurrency().min(total);
        info!(
            endpoints = total,
            workers,
            timeout = ?self.config.timeout(),
            "starting sweep"
        );

        let queue: PendingQueue = Arc::new(Mutex::new(
            endpoints.iter().cloned().enumerate().collect(),
        ));
        let (tx, mut rx) = mpsc::unbounded_channel();

        let handles: Vec<_> = (0..workers)
            .map(|id| {
                tokio::spawn(worker(
                    id,
                    self.client.clone(),
                    self.config.timeout(),
                    queue.clone(),
                    tx.clone(),
                ))
            })
            .collect();

        // Only the workers hold senders now, so the channel closes when they exit
        drop(tx);

        let mut aggregator = Aggregator::new(total);
        while let Some((slot, outcome)) = rx.recv().await {
            if let Err(e) = aggregator.record(slot, outcome) {
                warn!(error = %e, "discarding outcome");
                continue;
            }
            self.progress.send_replace(aggregator.progress());
            if aggregator.is_complete() {
                break;
            }
        }

        for result in join_all(handles).await {
            if let Err(e) = result {
                warn!(error = %e, "worker task ended abnormally");
            }
        }

        let results = aggregator.finish(&endpoints);
        self.progress.send_replace(Progress {
            completed: results.len(),
            total,
        });
        info!(endpoints = total, "sweep finished");
        results
    }
}

// One worker: pull, probe, report, repeat
async fn worker(
    id: usize,
    client: Client,
    timeout: Duration,
    queue: PendingQueue,
    results: mpsc::UnboundedSender<(usize, ProbeOutcome)>,
) {
    loop {
        let next = queue.lock().await.pop_front();
        let Some((slot, endpoint)) = next else {
            break;
        };

        debug!(worker = id, endpoint = %endpoint, "dispatching probe");
        let probe_client = client.clone();
        let probe_endpoint = endpoint.clone();
        let outcome = isolate(&endpoint, async move {
            probe(&probe_client, &probe_endpoint, timeout).await
        })
        .await;

        if results.send((slot, outcome)).is_err() {
            // Collector is gone; nobody wants the rest
            break;
        }
    }
    debug!(worker = id, "queue drained, worker exiting");
}

// Runs a probe on its own task so a panic only costs that one endpoint
async fn isolate<F>(endpoint: &str, probe: F) -> ProbeOutcome
where
    F: Future<Output = ProbeOutcome> + Send + 'static,
{
    match tokio::spawn(probe).await {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(endpoint, error = %e, "probe task failed");
            ProbeOutcome::down(endpoint, FailureKind::ProbePanicked)
        }
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why a queue and workers instead of buffer_unordered?
//    - Both bound concurrency; the pool makes the bound an explicit number of
//      tasks, and each probe still gets its own task for panic isolation
//
// 2. Why an unbounded channel?
//    - At most one message per endpoint is ever sent, so the channel can
//      never hold more than the input list
//
// 3. What does `let ... else` do?
//    - Binds the pattern or runs the else block, which must leave the scope
//    - Here: stop the worker once the queue is empty
// -----------------------------------------------------------------------------
