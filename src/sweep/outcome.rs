// src/sweep/outcome.rs
// =============================================================================
// The data produced by a sweep: one ProbeOutcome per endpoint.
//
// An outcome is always one of three classifications:
// - Up: we got an HTTP response (any status code) in time
// - Timeout: the deadline passed before a response arrived
// - Down: the request failed at the network level (refused, DNS, TLS, ...)
//
// Which optional fields are filled in depends on the classification, so the
// fields are only ever set through the constructors below.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Terminal category of a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    Up,
    Timeout,
    Down,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Classification::Up => "UP",
            Classification::Timeout => "TIMEOUT",
            Classification::Down => "DOWN",
        };
        f.write_str(label)
    }
}

/// Why a probe ended up `Down`.
///
/// The string tags returned by `as_str` are stable: they end up in the
/// rendered table and in JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Endpoint is not an absolute http(s) URL; no request was sent
    InvalidUrl,
    /// The remote host actively refused the TCP connection
    ConnectionRefused,
    /// Hostname could not be resolved
    DnsFailure,
    /// TLS handshake or certificate problem
    TlsFailure,
    /// Any other failure while establishing the connection
    ConnectFailure,
    /// Redirect limit exceeded
    TooManyRedirects,
    /// reqwest could not build the request
    InvalidRequest,
    /// Connection was made but the exchange broke (malformed response, reset, ...)
    ProtocolError,
    /// The probe task panicked
    ProbePanicked,
    /// The worker that owned this endpoint went away before reporting it
    WorkerLost,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::InvalidUrl => "invalid_url",
            FailureKind::ConnectionRefused => "connection_refused",
            FailureKind::DnsFailure => "dns_failure",
            FailureKind::TlsFailure => "tls_failure",
            FailureKind::ConnectFailure => "connect_failure",
            FailureKind::TooManyRedirects => "too_many_redirects",
            FailureKind::InvalidRequest => "invalid_request",
            FailureKind::ProtocolError => "protocol_error",
            FailureKind::ProbePanicked => "probe_panicked",
            FailureKind::WorkerLost => "worker_lost",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The result of probing one endpoint.
///
/// Field presence by classification:
///
/// | classification | http_status | elapsed | error_detail |
/// |----------------|-------------|---------|--------------|
/// | Up             | yes         | yes     | no           |
/// | Timeout        | no          | no      | no           |
/// | Down           | no          | no      | yes          |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    /// The endpoint string exactly as it was submitted
    pub endpoint: String,
    pub classification: Classification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    /// Time from sending the request to receiving the response headers
    #[serde(
        rename = "elapsed_secs",
        with = "elapsed_secs",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub elapsed: Option<Duration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

impl ProbeOutcome {
    pub fn up(endpoint: impl Into<String>, http_status: u16, elapsed: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            classification: Classification::Up,
            http_status: Some(http_status),
            elapsed: Some(elapsed),
            error_detail: None,
        }
    }

    pub fn timed_out(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            classification: Classification::Timeout,
            http_status: None,
            elapsed: None,
            error_detail: None,
        }
    }

    pub fn down(endpoint: impl Into<String>, kind: FailureKind) -> Self {
        Self {
            endpoint: endpoint.into(),
            classification: Classification::Down,
            http_status: None,
            elapsed: None,
            error_detail: Some(kind.as_str().to_string()),
        }
    }

    pub fn is_up(&self) -> bool {
        self.classification == Classification::Up
    }
}

/// Every probe's outcome for one run. Order carries no meaning.
pub type ResultSet = Vec<ProbeOutcome>;

// Durations go over the wire as fractional seconds, e.g. 0.12
mod elapsed_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_f64(d.as_secs_f64()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        let secs = Option::<f64>::deserialize(d)?;
        Ok(secs.map(Duration::from_secs_f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_up_carries_status_and_elapsed_only() {
        let outcome = ProbeOutcome::up("http://ok.test", 200, Duration::from_millis(100));
        assert_eq!(outcome.classification, Classification::Up);
        assert_eq!(outcome.http_status, Some(200));
        assert_eq!(outcome.elapsed, Some(Duration::from_millis(100)));
        assert!(outcome.error_detail.is_none());
        assert!(outcome.is_up());
    }

    #[test]
    fn test_timeout_carries_nothing() {
        let outcome = ProbeOutcome::timed_out("http://slow.test");
        assert_eq!(outcome.classification, Classification::Timeout);
        assert!(outcome.http_status.is_none());
        assert!(outcome.elapsed.is_none());
        assert!(outcome.error_detail.is_none());
    }

    #[test]
    fn test_down_carries_error_detail_only() {
        let outcome = ProbeOutcome::down("http://refused.test", FailureKind::ConnectionRefused);
        assert_eq!(outcome.classification, Classification::Down);
        assert_eq!(outcome.error_detail.as_deref(), Some("connection_refused"));
        assert!(outcome.http_status.is_none());
        assert!(outcome.elapsed.is_none());
        assert!(!outcome.is_up());
    }

    #[test]
    fn test_json_shape() {
        let outcome = ProbeOutcome::up("http://ok.test", 204, Duration::from_millis(250));
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["classification"], "UP");
        assert_eq!(json["http_status"], 204);
        assert_eq!(json["elapsed_secs"], 0.25);
        assert!(json.get("error_detail").is_none());

        let outcome = ProbeOutcome::timed_out("http://slow.test");
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["classification"], "TIMEOUT");
        assert!(json.get("elapsed_secs").is_none());
    }
}
