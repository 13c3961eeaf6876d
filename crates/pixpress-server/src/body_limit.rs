//! Early rejection of oversized uploads.
//!
//! [`BodyLimit`] answers `413 Payload Too Large` for a `POST` whose declared
//! `Content-Length` exceeds the limit, before the multipart body is read.
//! Requests without the header (chunked uploads) pass through and are caught
//! by the per-file size check once the form is parsed.

use poem::http::{header, Method, StatusCode};
use poem::{Endpoint, IntoResponse, Middleware, Request, Response, Result};
use tracing::warn;

/// Room for multipart boundaries, part headers and the text fields.
pub const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub struct BodyLimit {
    max_bytes: usize,
}

impl BodyLimit {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    /// Limit for a form carrying one file of at most `max_upload_bytes`.
    pub fn for_upload(max_upload_bytes: usize) -> Self {
        Self::new(max_upload_bytes.saturating_add(MULTIPART_OVERHEAD))
    }
}

impl<E: Endpoint> Middleware<E> for BodyLimit {
    type Output = BodyLimitEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        BodyLimitEndpoint {
            inner: ep,
            max_bytes: self.max_bytes,
        }
    }
}

pub struct BodyLimitEndpoint<E> {
    inner: E,
    max_bytes: usize,
}

impl<E: Endpoint> Endpoint for BodyLimitEndpoint<E> {
    type Output = Response;

    async fn call(&self, req: Request) -> Result<Self::Output> {
        if req.method() == Method::POST {
            if let Some(length) = declared_length(&req) {
                if length > self.max_bytes {
                    warn!(length, limit = self.max_bytes, "request body too large");
                    return Ok(payload_too_large(self.max_bytes));
                }
            }
        }

        self.inner.call(req).await.map(IntoResponse::into_response)
    }
}

fn declared_length(req: &Request) -> Option<usize> {
    req.headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

fn payload_too_large(limit: usize) -> Response {
    let body = serde_json::json!({
        "error": format!("Request body too large: limit is {} bytes", limit),
    });

    Response::builder()
        .status(StatusCode::PAYLOAD_TOO_LARGE)
        .content_type("application/json")
        .body(body.to_string())
}
