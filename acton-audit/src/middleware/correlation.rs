//! Request correlation for log and audit correlation
//!
//! Each inbound request gets exactly one correlation token. tower-http's
//! request id layers read it from the configured header (default
//! `x-request-id`) or generate a UUID v4, and echo it on the response. Blank
//! inbound values are discarded first. The token is then:
//!
//! - bound to a Tokio task-local for the lifetime of the request future only,
//! - inserted into the request extensions so handlers can extract it,
//! - recorded as the `requestId` field of a `tracing` span wrapping the request.
//!
//! The task-local and the span are both tied to the request future, so the
//! token disappears when the request finishes, fails, panics or is dropped.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
    Router,
};
use http::{HeaderName, HeaderValue};
use std::fmt;
use std::future::Future;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tracing::Instrument;
use uuid::Uuid;

use crate::config::CorrelationConfig;

/// Default header carrying the correlation token
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Field name used for the correlation token in logs
pub const LOG_KEY: &str = "requestId";

tokio::task_local! {
    static CURRENT: CorrelationId;
}

/// Correlation token for one unit of work
///
/// Inbound tokens are kept verbatim; generated tokens are UUID v4.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Generate a fresh random token
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Use the inbound token when it has visible content, otherwise generate one
    pub fn from_inbound(inbound: Option<&str>) -> Self {
        match inbound {
            Some(token) if !token.trim().is_empty() => Self(token.to_string()),
            _ => Self::generate(),
        }
    }

    /// Token text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Token bound to the current unit of work, if any
    pub fn current() -> Option<Self> {
        CURRENT.try_with(Clone::clone).ok()
    }

    /// Run `work` with this token as the current correlation id
    ///
    /// The binding exists only while `work` is being polled and is gone once
    /// it completes or is dropped. Work spawned onto other tasks does not
    /// inherit it; wrap spawned futures with their own `scope`.
    pub fn scope<F>(self, work: F) -> impl Future<Output = F::Output>
    where
        F: Future,
    {
        let span = tracing::info_span!("request", requestId = %self.0);
        CURRENT.scope(self, work).instrument(span)
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CorrelationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Generates UUID v4 request ids for [`SetRequestIdLayer`]
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeCorrelationId;

impl MakeRequestId for MakeCorrelationId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = CorrelationId::generate();
        let header_value = HeaderValue::from_str(id.as_str()).ok()?;
        Some(RequestId::new(header_value))
    }
}

/// Resolved correlation middleware settings
#[derive(Debug, Clone)]
pub struct CorrelationLayerConfig {
    header: HeaderName,
}

impl CorrelationLayerConfig {
    /// Build from configuration, falling back to `x-request-id` on a bad header name
    pub fn from_config(config: &CorrelationConfig) -> Self {
        let header = HeaderName::from_bytes(config.header.as_bytes()).unwrap_or_else(|_| {
            tracing::warn!(
                header = %config.header,
                "Invalid correlation header name, using {}",
                REQUEST_ID_HEADER
            );
            HeaderName::from_static(REQUEST_ID_HEADER)
        });
        Self { header }
    }

    /// Header carrying the token
    pub fn header(&self) -> &HeaderName {
        &self.header
    }
}

impl Default for CorrelationLayerConfig {
    fn default() -> Self {
        Self {
            header: HeaderName::from_static(REQUEST_ID_HEADER),
        }
    }
}

/// Create a request id layer that keeps inbound ids and generates UUID v4 otherwise
pub fn request_id_layer(config: &CorrelationLayerConfig) -> SetRequestIdLayer<MakeCorrelationId> {
    SetRequestIdLayer::new(config.header().clone(), MakeCorrelationId)
}

/// Create a layer echoing the request id on the response
pub fn request_id_propagation_layer(config: &CorrelationLayerConfig) -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(config.header().clone())
}

/// Drop a blank or non-text inbound id so a fresh one is generated
async fn discard_blank_request_id(
    State(config): State<CorrelationLayerConfig>,
    mut request: Request,
    next: Next,
) -> Response {
    let blank = request
        .headers()
        .get(config.header())
        .is_some_and(|value| value.to_str().map_or(true, |token| token.trim().is_empty()));
    if blank {
        request.headers_mut().remove(config.header());
    }
    next.run(request).await
}

/// Correlation middleware function
///
/// Reads the [`RequestId`] set by [`request_id_layer`], exposes it as a
/// [`CorrelationId`] request extension and runs the rest of the request inside
/// its scope. Install with [`with_correlation`], which also sets up the request
/// id layers around it.
pub async fn correlation_middleware(mut request: Request, next: Next) -> Response {
    let inbound = request
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok());
    let correlation_id = CorrelationId::from_inbound(inbound);

    request.extensions_mut().insert(correlation_id.clone());
    correlation_id.scope(next.run(request)).await
}

/// Wrap every route of `router` with correlation propagation
pub fn with_correlation<S>(router: Router<S>, config: &CorrelationConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let config = CorrelationLayerConfig::from_config(config);
    router.layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn_with_state(
                config.clone(),
                discard_blank_request_id,
            ))
            .layer(request_id_layer(&config))
            .layer(request_id_propagation_layer(&config))
            .layer(axum::middleware::from_fn(correlation_middleware)),
    )
}
