use axum::{
    body::Body,
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// HTTP header name for request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Identifier attached to every request for log correlation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestId(pub Uuid);

impl RequestId {
    /// Creates a new random request ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-request diagnostics carried into the feed assembler
///
/// Storage failures are logged with this context so operators can tie an
/// opaque "feed unavailable" response back to the request that caused it.
#[derive(Clone, Debug)]
pub struct RequestContext {
    pub id: RequestId,
    /// Full request URI including the query string
    pub uri: String,
}

impl RequestContext {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            id: RequestId::new(),
            uri: uri.into(),
        }
    }
}

/// Middleware that builds the [`RequestContext`] and stores it in the request extensions.
///
/// An incoming `x-request-id` header is reused when it holds a valid UUID,
/// otherwise a fresh v4 id is generated. The id is echoed on the response.
pub async fn request_context_middleware(mut request: Request, next: Next) -> Response {
    let id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .map(RequestId)
        .unwrap_or_else(RequestId::new);

    let context = RequestContext {
        id,
        uri: request.uri().to_string(),
    };
    request.extensions_mut().insert(context);

    let mut response = next.run(request).await;

    if let Ok(header_value) = HeaderValue::from_str(&id.to_string()) {
        response
            .headers_mut()
            .insert(REQUEST_ID_HEADER, header_value);
    }

    response
}

/// Creates the `http_request` tracing span, tagged with the request id
pub fn make_span_with_request_id(request: &Request<Body>) -> tracing::Span {
    let request_id = request
        .extensions()
        .get::<RequestContext>()
        .map(|ctx| ctx.id.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}
