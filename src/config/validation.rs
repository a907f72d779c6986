//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses (bind, metrics, service discovery targets)
//! - Validate the rewrite convention (host, root segment, index document)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ProxyConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid socket address for {field}: {value:?}")]
    InvalidAddress { field: String, value: String },

    #[error("upstream.internal_host is not a valid host: {0:?}")]
    InvalidHost(String),

    #[error("{field} must start with '/': {value:?}")]
    NotAbsolutePath { field: &'static str, value: String },

    #[error("upstream.static_root must not end with '/': {0:?}")]
    TrailingSlash(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,
}

/// Check every semantic rule and collect all failures.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_addr(&mut errors, "listener.bind_address", &config.listener.bind_address);

    let upstream = &config.upstream;
    if upstream.internal_host.is_empty() || url::Host::parse(&upstream.internal_host).is_err() {
        errors.push(ValidationError::InvalidHost(upstream.internal_host.clone()));
    }
    if !upstream.static_root.starts_with('/') {
        errors.push(ValidationError::NotAbsolutePath {
            field: "upstream.static_root",
            value: upstream.static_root.clone(),
        });
    } else if upstream.static_root.len() > 1 && upstream.static_root.ends_with('/') {
        errors.push(ValidationError::TrailingSlash(upstream.static_root.clone()));
    }
    if !upstream.index_document.starts_with('/') {
        errors.push(ValidationError::NotAbsolutePath {
            field: "upstream.index_document",
            value: upstream.index_document.clone(),
        });
    }
    for (host, target) in &upstream.resolve {
        check_addr(&mut errors, &format!("upstream.resolve.{host}"), target);
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if config.observability.metrics_enabled {
        check_addr(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_addr(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
}
