//! Per-request tracing spans with request IDs.
//!
//! Reuses a caller-supplied `X-Request-Id` when it is a valid ULID, so a
//! front-end can correlate its own logs; otherwise generates one. The
//! resolved ID is always echoed in the `X-Request-Id` response header.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::extract::Request;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::Response;
use tower::{Layer, Service};
use tracing::{Instrument, debug, error, info, info_span, warn};
use ulid::Ulid;

/// Header read from requests and written to responses.
pub static REQUEST_ID_HEADER: &str = "x-request-id";

/// Wraps every API route in a `request` span tagged with its ID.
#[derive(Clone)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdService { inner }
    }
}

#[derive(Clone)]
pub struct RequestIdService<S> {
    inner: S,
}

/// The caller's ID when it parses as a ULID, else a fresh one.
fn resolve_request_id(headers: &HeaderMap) -> Ulid {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Ulid::from_string(v.trim()).ok())
        .unwrap_or_else(Ulid::new)
}

/// Successful responses stay at debug; client errors at info; server and
/// upstream failures at warn.
fn log_response(status: StatusCode, duration_ms: u64) {
    let code = status.as_u16();
    if status.is_server_error() {
        warn!(status = code, duration_ms, "Response");
    } else if status.is_client_error() {
        info!(status = code, duration_ms, "Response");
    } else {
        debug!(status = code, duration_ms, "Response");
    }
}

impl<S, B> Service<Request> for RequestIdService<S>
where
    S: Service<Request, Response = Response<B>> + Send + 'static,
    S::Future: Send + 'static,
    S::Error: std::fmt::Debug,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let req_id = resolve_request_id(req.headers()).to_string();
        let span = info_span!(
            "request",
            req_id = %req_id,
            method = %req.method(),
            path = %req.uri().path()
        );
        // A ULID is plain Crockford base32, always a valid header value.
        let header_value = HeaderValue::from_str(&req_id).ok();
        let start = Instant::now();

        let future = self.inner.call(req);

        Box::pin(
            async move {
                let mut result = future.await;
                let duration_ms = start.elapsed().as_millis() as u64;

                match &mut result {
                    Ok(response) => {
                        log_response(response.status(), duration_ms);
                        if let Some(value) = header_value {
                            response.headers_mut().insert(REQUEST_ID_HEADER, value);
                        }
                    }
                    Err(e) => error!(error = ?e, duration_ms, "Request failed"),
                }

                result
            }
            .instrument(span),
        )
    }
}
