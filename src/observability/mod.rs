//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! forward + http subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters, histograms via `metrics`)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log line of a request
//! - Metrics are no-ops until an exporter is installed
//! - Logging never influences the response a client gets

pub mod logging;
pub mod metrics;
