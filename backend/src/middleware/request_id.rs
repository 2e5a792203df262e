//! Request correlation middleware.
//!
//! Every request runs inside a task-local [`RequestId`] scope; the same id
//! is echoed back in the `x-request-id` response header and embedded in
//! error envelopes. An `x-request-id` header supplied by the client is
//! honoured when it parses as a UUID, so upstream proxies can thread their
//! own correlation ids through.
//!
//! Task-local values do not cross `tokio::spawn` boundaries; use
//! [`RequestId::scope`] when handing work to another task.

use std::future::Future;
use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tokio::task_local;
use tracing::Instrument;
use uuid::Uuid;

const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

task_local! {
    static REQUEST_ID: RequestId;
}

/// Correlation id scoped to a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestId(Uuid);

impl RequestId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// The id in scope for the current task, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        REQUEST_ID.try_with(|id| *id).ok()
    }

    /// Run `fut` with `id` as the in-scope correlation id.
    pub async fn scope<Fut>(id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        REQUEST_ID.scope(id, fut).await
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RequestId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// The in-scope correlation id rendered for an error envelope.
#[must_use]
pub fn current_request_id() -> Option<String> {
    RequestId::current().map(|id| id.to_string())
}

/// Middleware wiring [`RequestId`] scoping and the response header.
#[derive(Clone)]
pub struct RequestCorrelation;

impl<S, B> Transform<S, ServiceRequest> for RequestCorrelation
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestCorrelationMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestCorrelationMiddleware { service }))
    }
}

/// Service wrapper produced by [`RequestCorrelation`].
pub struct RequestCorrelationMiddleware<S> {
    service: S,
}

fn incoming_id(req: &ServiceRequest) -> Option<RequestId> {
    req.headers()
        .get(&REQUEST_ID_HEADER)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

impl<S, B> Service<ServiceRequest> for RequestCorrelationMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let request_id = incoming_id(&req).unwrap_or_else(RequestId::generate);
        let span = tracing::info_span!("request", %request_id, path = %req.path());
        let fut = self.service.call(req);
        let scoped = RequestId::scope(request_id, async move {
            let mut res = fut.await?;
            // UUID text is always a valid header value.
            if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
                res.response_mut()
                    .headers_mut()
                    .insert(REQUEST_ID_HEADER, value);
            }
            Ok(res)
        });
        Box::pin(scoped.instrument(span))
    }
}
