//! Network fetch capability.
//!
//! # Responsibilities
//! - Define the `Fetch` seam the forwarder is built around
//! - Send outbound requests over a pooled hyper client
//! - Map logical internal hosts to socket addresses (service discovery)
//!
//! # Design Decisions
//! - The capability is injected, never looked up globally
//! - Logical host stays in the `Host` header when the address is swapped
//! - One attempt per call; transport failures surface as `FetchError`

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::uri::{Authority, Uri};
use axum::http::{header, HeaderValue, Request, Response};
use hyper::body::Incoming;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use thiserror::Error;

/// Failure to obtain a response from the network.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection refused, DNS failure, reset, protocol error.
    #[error("transport error: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),

    /// Only plain `http` is spoken to internal hosts.
    #[error("unsupported scheme {0:?}, internal hosts are reached over http")]
    UnsupportedScheme(String),

    /// The outbound URI could not be pointed at its resolved address.
    #[error("cannot resolve {host}: {reason}")]
    Resolve { host: String, reason: String },
}

/// Something that can turn a request into a response over the network.
pub trait Fetch: Send + Sync + 'static {
    /// Send `request` and wait for the response head.
    fn fetch(
        &self,
        request: Request<Body>,
    ) -> impl Future<Output = Result<Response<Body>, FetchError>> + Send;
}

impl<F: Fetch> Fetch for Arc<F> {
    fn fetch(
        &self,
        request: Request<Body>,
    ) -> impl Future<Output = Result<Response<Body>, FetchError>> + Send {
        (**self).fetch(request)
    }
}

/// Production fetcher backed by the hyper-util legacy client.
#[derive(Debug, Clone)]
pub struct HyperFetcher {
    client: Client<HttpConnector, Body>,
    services: Arc<HashMap<String, SocketAddr>>,
}

impl HyperFetcher {
    /// Create a fetcher with an empty service table.
    pub fn new() -> Self {
        let mut connector = HttpConnector::new();
        connector.set_nodelay(true);
        connector.set_keepalive(Some(Duration::from_secs(60)));

        let client = Client::builder(TokioExecutor::new()).build(connector);
        Self {
            client,
            services: Arc::new(HashMap::new()),
        }
    }

    /// Register logical hosts and their addresses.
    ///
    /// Entries whose address does not parse are skipped with a warning;
    /// config validation rejects them before this point.
    pub fn with_services(mut self, table: &BTreeMap<String, String>) -> Self {
        let mut services = HashMap::with_capacity(table.len());
        for (host, addr) in table {
            match addr.parse::<SocketAddr>() {
                Ok(addr) => {
                    tracing::debug!(host = %host, address = %addr, "Registered internal service");
                    services.insert(host.to_ascii_lowercase(), addr);
                }
                Err(e) => {
                    tracing::warn!(host = %host, address = %addr, error = %e, "Ignoring service entry");
                }
            }
        }
        self.services = Arc::new(services);
        self
    }

    /// Point the request at the resolved address of its logical host.
    fn resolve(&self, mut request: Request<Body>) -> Result<Request<Body>, FetchError> {
        let Some(host) = request.uri().host().map(str::to_ascii_lowercase) else {
            return Ok(request);
        };
        let Some(addr) = self.services.get(&host) else {
            return Ok(request);
        };

        let resolve_err = |reason: String| FetchError::Resolve {
            host: host.clone(),
            reason,
        };

        if !request.headers().contains_key(header::HOST) {
            let logical = request
                .uri()
                .authority()
                .map(Authority::as_str)
                .unwrap_or(host.as_str());
            let value =
                HeaderValue::from_str(logical).map_err(|e| resolve_err(e.to_string()))?;
            request.headers_mut().insert(header::HOST, value);
        }

        let mut parts = request.uri().clone().into_parts();
        parts.authority = Some(
            addr.to_string()
                .parse::<Authority>()
                .map_err(|e| resolve_err(e.to_string()))?,
        );
        *request.uri_mut() = Uri::from_parts(parts).map_err(|e| resolve_err(e.to_string()))?;

        Ok(request)
    }
}

impl Default for HyperFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetch for HyperFetcher {
    async fn fetch(&self, request: Request<Body>) -> Result<Response<Body>, FetchError> {
        let scheme = request.uri().scheme_str().unwrap_or("http");
        if scheme != "http" {
            tracing::warn!(uri = %request.uri(), "Internal asset host only reachable over http");
            return Err(FetchError::UnsupportedScheme(scheme.to_string()));
        }

        let request = self.resolve(request)?;
        let response: Response<Incoming> = self.client.request(request).await?;
        let (parts, body) = response.into_parts();
        Ok(Response::from_parts(parts, Body::new(body)))
    }
}
