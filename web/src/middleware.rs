//! Request ID tracking.
//!
//! Every request gets an ID: the client's `X-Request-ID` if it sent a valid
//! UUID, otherwise a fresh one. The ID is stored in request extensions, set
//! on the tracing span that wraps the request, and echoed back on the
//! response.
//!
//! ```ignore
//! let app = Router::new()
//!     .route("/api/responses", get(list_responses))
//!     .layer(request_id_layer());
//! ```

use axum::{extract::Request, http::HeaderValue, response::Response};
use std::fmt;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::Instrument;
use uuid::Uuid;

/// Header carrying the request ID.
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// ID assigned to a single request.
///
/// Stored in request extensions by [`RequestIdLayer`]; handlers read it with
/// `Extension<RequestId>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(pub Uuid);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Create a layer that assigns a request ID to all requests.
#[must_use]
pub const fn request_id_layer() -> RequestIdLayer {
    RequestIdLayer
}

/// Layer for request ID tracking.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestIdLayer;

impl<S> Layer<S> for RequestIdLayer {
    type Service = RequestIdMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestIdMiddleware { inner }
    }
}

/// Middleware service for request ID tracking.
#[derive(Clone, Debug)]
pub struct RequestIdMiddleware<S> {
    inner: S,
}

impl<S> Service<Request> for RequestIdMiddleware<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let request_id = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .map_or_else(|| RequestId(Uuid::new_v4()), RequestId);

        req.extensions_mut().insert(request_id);

        let span = tracing::info_span!(
            "http_request",
            request_id = %request_id,
            method = %req.method(),
            uri = %req.uri(),
        );

        let fut = self.inner.call(req);

        Box::pin(
            async move {
                let mut response = fut.await?;
                tracing::debug!(status = %response.status(), "request finished");

                if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
                    response.headers_mut().insert(REQUEST_ID_HEADER, value);
                }

                Ok(response)
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use axum::{body::Body, routing::get, Extension, Router};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/test", get(|Extension(id): Extension<RequestId>| async move { id.to_string() }))
            .layer(request_id_layer())
    }

    fn response_id(response: &Response) -> String {
        response
            .headers()
            .get(REQUEST_ID_HEADER)
            .expect("request ID header should be present")
            .to_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_request_id_generated_if_missing() {
        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert!(Uuid::parse_str(&response_id(&response)).is_ok());
    }

    #[tokio::test]
    async fn test_request_id_preserved_from_request() {
        let sent = Uuid::new_v4();
        let request = Request::builder()
            .uri("/test")
            .header(REQUEST_ID_HEADER, sent.to_string())
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response_id(&response), sent.to_string());
    }

    #[tokio::test]
    async fn test_handler_sees_same_id_as_response() {
        let request = Request::builder().uri("/test").body(Body::empty()).unwrap();

        let response = app().oneshot(request).await.unwrap();
        let header = response_id(&response);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        assert_eq!(&body[..], header.as_bytes());
    }

    #[tokio::test]
    async fn test_invalid_request_id_replaced() {
        let request = Request::builder()
            .uri("/test")
            .header(REQUEST_ID_HEADER, "not-a-uuid")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        let id = response_id(&response);

        assert_ne!(id, "not-a-uuid");
        assert!(Uuid::parse_str(&id).is_ok());
    }
}
