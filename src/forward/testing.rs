//! Fetch doubles for unit tests.

use std::sync::Mutex;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Method, Request, Response, StatusCode};

use super::fetcher::{Fetch, FetchError};

/// What a fetcher saw for one outbound request.
#[derive(Debug, Clone)]
pub struct Seen {
    pub method: Method,
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Records every request and answers with a fixed status and body.
#[derive(Debug)]
pub struct RecordingFetcher {
    seen: Mutex<Vec<Seen>>,
    status: StatusCode,
    body: &'static str,
}

impl RecordingFetcher {
    pub fn new(status: StatusCode, body: &'static str) -> Self {
        Self {
            seen: Mutex::new(Vec::new()),
            status,
            body,
        }
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }
}

impl Fetch for RecordingFetcher {
    async fn fetch(&self, request: Request<Body>) -> Result<Response<Body>, FetchError> {
        let (parts, body) = request.into_parts();
        let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        self.seen.lock().unwrap().push(Seen {
            method: parts.method,
            uri: parts.uri.to_string(),
            headers: parts.headers,
            body,
        });

        Ok(Response::builder()
            .status(self.status)
            .header("x-upstream", "recording")
            .body(Body::from(self.body))
            .unwrap())
    }
}

/// Always fails as if the internal host were unreachable.
#[derive(Debug, Default)]
pub struct FailingFetcher;

impl Fetch for FailingFetcher {
    async fn fetch(&self, request: Request<Body>) -> Result<Response<Body>, FetchError> {
        Err(FetchError::Resolve {
            host: request.uri().host().unwrap_or_default().to_string(),
            reason: "connection refused".into(),
        })
    }
}

/// Answers with the outbound path after a delay derived from it.
#[derive(Debug, Default)]
pub struct EchoPathFetcher;

impl Fetch for EchoPathFetcher {
    async fn fetch(&self, request: Request<Body>) -> Result<Response<Body>, FetchError> {
        let path = request.uri().path().to_string();
        let jitter = path.bytes().map(u64::from).sum::<u64>() % 7;
        tokio::time::sleep(Duration::from_millis(jitter)).await;
        Ok(Response::new(Body::from(path)))
    }
}
