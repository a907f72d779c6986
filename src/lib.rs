//! Static asset proxy library.
//!
//! Every inbound request is rewritten onto the internal asset host
//! (`/` → `/static/index.html`, `/p` → `/static/p`) and forwarded; transport
//! failures become a plain-text 404.

pub mod config;
pub mod forward;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::schema::ProxyConfig;
pub use forward::{AssetForwarder, AssetService, Fetch, HyperFetcher, RewriteRules};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
