//! Request extractors

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

/// Effective address the caller reached this server on, e.g.
/// `http://localhost:3000`. Used to build self-referential links in
/// responses. Honors `x-forwarded-proto` when running behind a proxy.
#[derive(Debug, Clone)]
pub struct HostAddress(pub String);

impl<S> FromRequestParts<S> for HostAddress
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let scheme = parts
            .headers
            .get("x-forwarded-proto")
            .and_then(|value| value.to_str().ok())
            .unwrap_or("http");

        let host = parts
            .headers
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("localhost");

        Ok(HostAddress(format!("{scheme}://{host}")))
    }
}
