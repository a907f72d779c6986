//! Path rewriting and forwarding to the internal asset host.
//!
//! # Responsibilities
//! - Recover the absolute URL of the inbound request
//! - Rewrite it onto the internal asset host
//! - Build a fresh outbound request carrying method, headers and body
//! - Issue exactly one fetch and hand back its response untouched
//!
//! # Design Decisions
//! - The inbound request is consumed, never mutated in place
//! - Failures are returned as `ForwardError`; the service layer decides
//!   what the client sees

use std::sync::Arc;

use axum::body::Body;
use axum::http::uri::PathAndQuery;
use axum::http::{header, HeaderValue, Request, Response};
use thiserror::Error;
use url::Url;

use crate::forward::fetcher::{Fetch, FetchError};
use crate::forward::rewrite::RewriteRules;
use crate::http::request::RequestIdExt;

/// Reasons a request could not be forwarded.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// Neither the URI nor the `Host` header names a host.
    #[error("request has no host")]
    MissingHost,

    /// The inbound URL, or its rewrite, is not a valid URL.
    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The outbound request could not be assembled.
    #[error("cannot build outbound request: {0}")]
    Build(#[from] axum::http::Error),

    /// The internal asset host could not be reached.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Rewrites inbound requests and forwards them through a fetch capability.
#[derive(Debug)]
pub struct AssetForwarder<F> {
    rules: Arc<RewriteRules>,
    fetcher: F,
}

impl<F: Fetch> AssetForwarder<F> {
    /// Create a forwarder around an injected fetch capability.
    pub fn new(rules: RewriteRules, fetcher: F) -> Self {
        Self {
            rules: Arc::new(rules),
            fetcher,
        }
    }

    /// The rewrite convention in use.
    pub fn rules(&self) -> &RewriteRules {
        &self.rules
    }

    /// Forward one request to the internal asset host.
    pub async fn forward(&self, request: Request<Body>) -> Result<Response<Body>, ForwardError> {
        let request_id = request.request_id().to_owned();
        let inbound = inbound_url(&request)?;
        let target = self
            .rules
            .rewrite(&inbound)
            .map_err(|source| ForwardError::InvalidUrl {
                url: inbound.to_string(),
                source,
            })?;
        let outbound = outbound_request(request, &target)?;

        tracing::debug!(
            request_id = %request_id,
            method = %outbound.method(),
            target = %target,
            "Forwarding request"
        );

        match self.fetcher.fetch(outbound).await {
            Ok(response) => Ok(response),
            Err(e) => {
                tracing::error!(
                    request_id = %request_id,
                    target = %target,
                    error = %e,
                    "Error reading asset"
                );
                Err(e.into())
            }
        }
    }
}

/// Absolute URL of an inbound request.
///
/// HTTP/1.1 requests arrive in origin-form, so the authority comes from the
/// `Host` header unless the URI already carries one.
fn inbound_url(request: &Request<Body>) -> Result<Url, ForwardError> {
    let uri = request.uri();
    let authority = match uri.authority() {
        Some(authority) => authority.as_str(),
        None => request
            .headers()
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .ok_or(ForwardError::MissingHost)?,
    };
    let scheme = uri.scheme_str().unwrap_or("http");
    let path_and_query = uri
        .path_and_query()
        .map(PathAndQuery::as_str)
        .unwrap_or("/");

    let raw = format!("{scheme}://{authority}{path_and_query}");
    Url::parse(&raw).map_err(|source| ForwardError::InvalidUrl { url: raw, source })
}

fn outbound_request(request: Request<Body>, target: &Url) -> Result<Request<Body>, ForwardError> {
    let (parts, body) = request.into_parts();

    let host = match (target.host_str(), target.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        (None, _) => return Err(ForwardError::MissingHost),
    };
    let host = HeaderValue::from_str(&host).map_err(axum::http::Error::from)?;

    let mut builder = Request::builder()
        .method(parts.method)
        .uri(target.as_str());
    if let Some(headers) = builder.headers_mut() {
        *headers = parts.headers;
        headers.insert(header::HOST, host);
    }

    Ok(builder.body(body)?)
}
