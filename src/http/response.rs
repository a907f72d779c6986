//! Responses synthesized by the proxy itself.
//!
//! Everything else the client sees is the internal asset host's response,
//! passed through unchanged.

use axum::body::Body;
use axum::http::{header, HeaderValue, Response, StatusCode};

/// Body of the synthesized not-found response.
pub const ASSET_NOT_FOUND: &str = "Asset not found";

/// The 404 returned when forwarding itself failed.
pub fn asset_not_found() -> Response<Body> {
    let mut response = Response::new(Body::from(ASSET_NOT_FOUND));
    *response.status_mut() = StatusCode::NOT_FOUND;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}
