//! Asset forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → service.rs (AssetService: failure boundary)
//!     → forwarder.rs (recover URL, build outbound request)
//!     → rewrite.rs (path + host rewrite)
//!     → fetcher.rs (Fetch capability → internal asset host)
//!     → response unchanged, or synthesized 404 on failure
//! ```
//!
//! # Design Decisions
//! - Stateless: every request builds its own URL and outbound request
//! - The fetch capability is injected, so tests swap in doubles
//! - No retries and no timeouts at this layer

pub mod fetcher;
pub mod forwarder;
pub mod rewrite;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;

pub use fetcher::{Fetch, FetchError, HyperFetcher};
pub use forwarder::{AssetForwarder, ForwardError};
pub use rewrite::RewriteRules;
pub use service::AssetService;
