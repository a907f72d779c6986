//! Asset service: the boundary where forwarding failures become responses.

use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};

use crate::forward::fetcher::Fetch;
use crate::forward::forwarder::AssetForwarder;
use crate::http::response::asset_not_found;
use crate::observability::metrics::{self, Outcome};

/// Serves static assets through a forwarder, never failing.
#[derive(Debug)]
pub struct AssetService<F> {
    forwarder: AssetForwarder<F>,
}

impl<F: Fetch> AssetService<F> {
    pub fn new(forwarder: AssetForwarder<F>) -> Self {
        Self { forwarder }
    }

    pub fn forwarder(&self) -> &AssetForwarder<F> {
        &self.forwarder
    }

    /// Forward `request`; any failure becomes a plain-text 404.
    ///
    /// Responses from the internal asset host are returned as they are,
    /// including its own 404s.
    pub async fn handle_static_assets(&self, request: Request<Body>) -> Response<Body> {
        let start = Instant::now();
        let method = request.method().to_string();

        match self.forwarder.forward(request).await {
            Ok(response) => {
                metrics::record_request(&method, response.status().as_u16(), Outcome::Forwarded, start);
                response
            }
            Err(e) => {
                tracing::error!(error = %e, "Error serving static asset");
                metrics::record_request(
                    &method,
                    StatusCode::NOT_FOUND.as_u16(),
                    Outcome::Synthesized,
                    start,
                );
                asset_not_found()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::forward::rewrite::RewriteRules;
    use crate::forward::testing::{EchoPathFetcher, FailingFetcher, RecordingFetcher};
    use crate::http::response::ASSET_NOT_FOUND;

    async fn body_string(response: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn get(path: &str) -> Request<Body> {
        Request::builder()
            .uri(path)
            .header("host", "site.example")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn success_is_returned_unchanged() {
        let service = AssetService::new(AssetForwarder::new(
            RewriteRules::default(),
            RecordingFetcher::new(StatusCode::OK, "console.log(1)"),
        ));

        let response = service.handle_static_assets(get("/app.js")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-upstream"], "recording");
        assert_eq!(body_string(response).await, "console.log(1)");
    }

    #[tokio::test]
    async fn upstream_404_is_not_replaced() {
        let service = AssetService::new(AssetForwarder::new(
            RewriteRules::default(),
            RecordingFetcher::new(StatusCode::NOT_FOUND, "no such object"),
        ));

        let response = service.handle_static_assets(get("/gone.css")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(response).await, "no such object");
    }

    #[tokio::test]
    async fn upstream_errors_pass_through() {
        let service = AssetService::new(AssetForwarder::new(
            RewriteRules::default(),
            RecordingFetcher::new(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
        ));

        let response = service.handle_static_assets(get("/x")).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(response).await, "boom");
    }

    #[tokio::test]
    async fn fetch_failure_becomes_synthesized_404() {
        let service = AssetService::new(AssetForwarder::new(RewriteRules::default(), FailingFetcher));

        let response = service.handle_static_assets(get("/app.js")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(response).await, ASSET_NOT_FOUND);
    }

    #[tokio::test]
    async fn unroutable_request_becomes_synthesized_404() {
        let service = AssetService::new(AssetForwarder::new(
            RewriteRules::default(),
            RecordingFetcher::new(StatusCode::OK, ""),
        ));
        let request = Request::builder().uri("/app.js").body(Body::empty()).unwrap();

        let response = service.handle_static_assets(request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_string(response).await, ASSET_NOT_FOUND);
        assert!(service.forwarder().rules().internal_host() == "static.spin.internal");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_requests_keep_their_own_paths() {
        let service = Arc::new(AssetService::new(AssetForwarder::new(
            RewriteRules::default(),
            EchoPathFetcher,
        )));

        let tasks: Vec<_> = (0..64)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move {
                    let path = format!("/bundle/chunk-{i}.js");
                    let response = service.handle_static_assets(get(&path)).await;
                    (path, body_string(response).await)
                })
            })
            .collect();

        for task in tasks {
            let (path, body) = task.await.unwrap();
            assert_eq!(body, format!("/static{path}"));
        }
    }
}
