// src/sweep/probe.rs
// =============================================================================
// Probes a single endpoint and classifies what happened.
//
// Key functionality:
// - Sends exactly one HTTP GET with a per-request deadline
// - Measures the time until the response headers arrive
// - Turns every failure into a classification instead of an error
//
// The public function never fails: whatever goes wrong with one endpoint is
// recorded in that endpoint's outcome.
// =============================================================================

use reqwest::{Client, StatusCode};
use std::error::Error as StdError;
use std::io;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

use super::outcome::{FailureKind, ProbeOutcome};

/// Probes one endpoint with a single GET bounded by `timeout`.
pub async fn probe(client: &Client, endpoint: &str, timeout: Duration) -> ProbeOutcome {
    if !is_probeable(endpoint) {
        debug!(endpoint, "not an absolute http(s) url, skipping request");
        return ProbeOutcome::down(endpoint, FailureKind::InvalidUrl);
    }

    let start = Instant::now();
    let result = client.get(endpoint).timeout(timeout).send().await;

    // Match on the result to handle success and the various error types
    match result {
        Ok(response) => analyze_response(endpoint, response.status(), start.elapsed(), timeout),
        Err(e) => categorize_error(endpoint, &e),
    }
}

// Only absolute http:// and https:// URLs are sent over the wire
fn is_probeable(endpoint: &str) -> bool {
    match Url::parse(endpoint) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

// Any status code counts as the endpoint being up: the server answered.
//
// A response that arrived after the deadline is reported as a timeout. With
// the deadline enforced by the client this branch is practically unreachable,
// but the comparison is kept so the rule is explicit.
fn analyze_response(
    endpoint: &str,
    status: StatusCode,
    elapsed: Duration,
    timeout: Duration,
) -> ProbeOutcome {
    if elapsed <= timeout {
        debug!(endpoint, status = status.as_u16(), ?elapsed, "endpoint up");
        ProbeOutcome::up(endpoint, status.as_u16(), elapsed)
    } else {
        debug!(endpoint, ?elapsed, ?timeout, "response arrived after deadline");
        ProbeOutcome::timed_out(endpoint)
    }
}

// Categorizes the different error types coming out of reqwest
fn categorize_error(endpoint: &str, error: &reqwest::Error) -> ProbeOutcome {
    if error.is_timeout() {
        debug!(endpoint, "request timed out");
        return ProbeOutcome::timed_out(endpoint);
    }

    let kind = failure_kind(error);
    debug!(endpoint, kind = kind.as_str(), error = %error, "endpoint down");
    ProbeOutcome::down(endpoint, kind)
}

fn failure_kind(error: &reqwest::Error) -> FailureKind {
    // The interesting part is usually a few levels down the source chain
    // (reqwest -> hyper -> connector -> io::Error), so look at all of it.
    let text = chain_text(error);

    if error.is_builder() {
        FailureKind::InvalidRequest
    } else if error.is_redirect() {
        FailureKind::TooManyRedirects
    } else if error.is_connect() {
        if chain_has_io_kind(error, io::ErrorKind::ConnectionRefused) {
            FailureKind::ConnectionRefused
        } else if text.contains("dns error")
            || text.contains("failed to lookup address")
            || text.contains("name or service not known")
        {
            FailureKind::DnsFailure
        } else if looks_like_tls(&text) {
            FailureKind::TlsFailure
        } else {
            FailureKind::ConnectFailure
        }
    } else if looks_like_tls(&text) {
        FailureKind::TlsFailure
    } else {
        FailureKind::ProtocolError
    }
}

fn looks_like_tls(text: &str) -> bool {
    text.contains("certificate") || text.contains("tls") || text.contains("ssl")
}

fn chain_has_io_kind(error: &(dyn StdError + 'static), kind: io::ErrorKind) -> bool {
    let mut current = Some(error);
    while let Some(err) = current {
        if let Some(io_error) = err.downcast_ref::<io::Error>() {
            if io_error.kind() == kind {
                return true;
            }
        }
        current = err.source();
    }
    false
}

// Lower-cased messages of the whole error chain, joined together
fn chain_text(error: &(dyn StdError + 'static)) -> String {
    let mut text = error.to_string();
    let mut current = error.source();
    while let Some(err) = current {
        text.push_str(": ");
        text.push_str(&err.to_string());
        current = err.source();
    }
    text.to_lowercase()
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why no Result return type?
//    - A refused connection or a DNS failure is the answer to "is this
//      endpoint healthy?", not a bug in the sweep
//    - Returning a ProbeOutcome for everything keeps the scheduler simple:
//      one endpoint in, one outcome out
//
// 2. Why walk the error chain?
//    - reqwest::Error wraps hyper errors, which wrap connector errors, which
//      wrap std::io::Error
//    - downcast_ref lets us look for a concrete io::ErrorKind anywhere in it
//
// 3. Why RequestBuilder::timeout instead of Client::builder().timeout()?
//    - The deadline belongs to the run configuration, so it is applied per
//      request and the client can be built independently of it
// -----------------------------------------------------------------------------
