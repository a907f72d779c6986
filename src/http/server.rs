//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create Axum Router matching every method and path to the asset service
//! - Optionally mount the `/hello/{name}` example route
//! - Wire up middleware (tracing, request ID, host timeout)
//! - Serve on a listener until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Path, State},
    http::{Request, Response},
    routing::{any, get},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ProxyConfig;
use crate::forward::{AssetForwarder, AssetService, Fetch, HyperFetcher, RewriteRules};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::lifecycle::shutdown::ShutdownSignal;

/// Application state injected into handlers.
#[derive(Debug)]
pub struct AppState<F> {
    pub assets: Arc<AssetService<F>>,
}

impl<F> Clone for AppState<F> {
    fn clone(&self) -> Self {
        Self {
            assets: self.assets.clone(),
        }
    }
}

/// HTTP server for the asset proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a server that fetches over the network.
    pub fn new(config: ProxyConfig) -> Self {
        let fetcher = HyperFetcher::new().with_services(&config.upstream.resolve);
        Self::with_fetcher(config, fetcher)
    }

    /// Create a server around any fetch capability.
    pub fn with_fetcher<F: Fetch>(config: ProxyConfig, fetcher: F) -> Self {
        let rules = RewriteRules::from_config(&config.upstream);
        let assets = AssetService::new(AssetForwarder::new(rules, fetcher));
        let state = AppState {
            assets: Arc::new(assets),
        };

        let router = build_router(&config, state);
        Self { router, config }
    }

    /// A handle to the router, for serving or driving it directly.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            internal_host = %self.config.upstream.internal_host,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.fired())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router<F: Fetch>(config: &ProxyConfig, state: AppState<F>) -> Router {
    let mut router = Router::new();
    if config.routes.hello_example {
        // Other methods on this path still go to the asset service.
        router = router.route(
            "/hello/{name}",
            get(hello_handler).fallback(asset_handler::<F>),
        );
    }

    router
        .route("/", any(asset_handler::<F>))
        .route("/{*path}", any(asset_handler::<F>))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(set_request_id_layer())
                .layer(
                    TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        tracing::info_span!(
                            "request",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id = %request.request_id(),
                        )
                    }),
                )
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.timeouts.request_secs,
                )))
                .layer(propagate_request_id_layer()),
        )
}

/// Catch-all handler: every request is an asset request.
async fn asset_handler<F: Fetch>(
    State(state): State<AppState<F>>,
    request: Request<Body>,
) -> Response<Body> {
    state.assets.handle_static_assets(request).await
}

async fn hello_handler(Path(name): Path<String>) -> String {
    format!("Hello, {name}!")
}
