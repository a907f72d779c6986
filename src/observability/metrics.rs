//! Metrics collection and exposition.
//!
//! # Metrics
//! - `asset_proxy_requests_total` (counter): requests by method, status, outcome
//! - `asset_proxy_request_duration_seconds` (histogram): latency distribution
//!
//! The `outcome` label separates responses relayed from the internal asset
//! host (`forwarded`) from 404s the proxy built itself (`synthesized`).

use std::fmt;
use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Where a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Forwarded,
    Synthesized,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Forwarded => "forwarded",
            Outcome::Synthesized => "synthesized",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Label value for a request method.
///
/// Extension methods collapse to `OTHER` so client input cannot grow the
/// label set.
pub fn method_label(method: &str) -> &'static str {
    match method {
        "GET" => "GET",
        "HEAD" => "HEAD",
        "POST" => "POST",
        "PUT" => "PUT",
        "DELETE" => "DELETE",
        "CONNECT" => "CONNECT",
        "OPTIONS" => "OPTIONS",
        "TRACE" => "TRACE",
        "PATCH" => "PATCH",
        _ => "OTHER",
    }
}

/// Record one handled request.
pub fn record_request(method: &str, status: u16, outcome: Outcome, start: Instant) {
    let labels = [
        ("method", method_label(method).to_string()),
        ("status", status.to_string()),
        ("outcome", outcome.as_str().to_string()),
    ];
    ::metrics::counter!("asset_proxy_requests_total", &labels).increment(1);
    ::metrics::histogram!("asset_proxy_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_methods_keep_their_label() {
        for method in ["GET", "HEAD", "POST", "PUT", "DELETE", "OPTIONS", "PATCH"] {
            assert_eq!(method_label(method), method);
        }
    }

    #[test]
    fn extension_methods_collapse() {
        assert_eq!(method_label("PURGE"), "OTHER");
        assert_eq!(method_label("get"), "OTHER");
        assert_eq!(method_label("X-RANDOM-1234"), "OTHER");
    }

    #[test]
    fn recording_without_exporter_is_a_no_op() {
        record_request("BREW", 404, Outcome::Synthesized, Instant::now());
        assert_eq!(Outcome::Forwarded.to_string(), "forwarded");
    }
}
