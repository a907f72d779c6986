//! HTTP host subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, wildcard dispatch)
//!     → request.rs (request ID assigned / propagated)
//!     → forward::AssetService (rewrite + fetch)
//!     → response.rs (synthesized 404 when forwarding failed)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdExt, X_REQUEST_ID};
pub use response::{asset_not_found, ASSET_NOT_FOUND};
pub use server::{AppState, HttpServer};
