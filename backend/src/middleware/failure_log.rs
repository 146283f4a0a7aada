//! One structured log line per failed request.
//!
//! Clients only ever see the fixed reason phrase of a failure; the detailed
//! message is recorded here together with the request context and the trace
//! identifier, under an event name that identifies the failure category.

use std::task::{Context, Poll};

use actix_web::HttpResponse;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::http::header::USER_AGENT;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{Level, event};

use crate::domain::{Error, ErrorCode, TraceId};
use crate::inbound::http::error::ErrorBody;

/// Log severity of a failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warn,
    Error,
}

/// Event name and severity recorded for each error category.
pub fn failure_event(code: ErrorCode) -> (&'static str, Severity) {
    match code {
        ErrorCode::NotFound => ("not_found_resource", Severity::Info),
        ErrorCode::Forbidden => ("authz_fail", Severity::Error),
        ErrorCode::UnprocessableEntity => ("input_validation_fail", Severity::Warn),
        ErrorCode::Unauthorized => ("authn_token_invalid", Severity::Warn),
        ErrorCode::InternalError => ("sys_crash", Severity::Warn),
    }
}

#[derive(Debug, Clone)]
struct RequestContext {
    method: String,
    uri: String,
    user_agent: String,
    peer: String,
}

impl RequestContext {
    fn capture(req: &ServiceRequest) -> Self {
        Self {
            method: req.method().to_string(),
            uri: req.uri().to_string(),
            user_agent: req
                .headers()
                .get(USER_AGENT)
                .and_then(|value| value.to_str().ok())
                .unwrap_or("-")
                .to_owned(),
            peer: req
                .peer_addr()
                .map_or_else(|| "-".to_owned(), |addr| addr.to_string()),
        }
    }
}

macro_rules! failure {
    ($level:expr, $event:expr, $ctx:expr, $trace_id:expr, $details:expr, $err:expr) => {
        event!(
            $level,
            event = $event,
            method = %$ctx.method,
            uri = %$ctx.uri,
            user_agent = %$ctx.user_agent,
            peer = %$ctx.peer,
            trace_id = %$trace_id,
            detail = %$err.message(),
            details = %$details,
            "request failed"
        )
    };
}

fn record(err: &Error, ctx: &RequestContext) {
    let trace_id = err
        .trace_id()
        .map(str::to_owned)
        .or_else(|| TraceId::current().map(|id| id.to_string()))
        .unwrap_or_else(|| "-".to_owned());
    let details = err
        .details()
        .map_or_else(|| "-".to_owned(), ToString::to_string);
    let (name, severity) = failure_event(err.code());
    match severity {
        Severity::Info => failure!(Level::INFO, name, ctx, trace_id, details, err),
        Severity::Warn => failure!(Level::WARN, name, ctx, trace_id, details, err),
        Severity::Error => failure!(Level::ERROR, name, ctx, trace_id, details, err),
    }
}

/// Classify a framework or middleware error by the status it produced.
fn classify_untyped(err: &actix_web::Error, status: StatusCode) -> Error {
    let message = err.to_string();
    match status {
        StatusCode::NOT_FOUND => Error::not_found(message),
        StatusCode::FORBIDDEN => Error::forbidden(message),
        StatusCode::UNAUTHORIZED => Error::unauthorized(message),
        status if status.is_client_error() => Error::validation(message),
        _ => Error::internal(message),
    }
}

fn record_untyped(err: &actix_web::Error, ctx: &RequestContext) {
    match err.as_error::<Error>() {
        Some(domain) => record(domain, ctx),
        None => record(
            &classify_untyped(err, err.as_response_error().status_code()),
            ctx,
        ),
    }
}

/// Replace the framework's own error body with the uniform `{"message"}`
/// shape, keeping the status.
fn uniform_body<B>(res: ServiceResponse<B>) -> ServiceResponse<EitherBody<B>> {
    let status = res.status();
    let (req, _) = res.into_parts();
    let body = ErrorBody {
        message: status.canonical_reason().unwrap_or("Error").to_owned(),
    };
    ServiceResponse::new(req, HttpResponse::build(status).json(body)).map_into_right_body()
}

/// Middleware logging every failed request once.
///
/// Errors raised by inner middleware (CORS rejections) get the same
/// `{"message"}` body as domain errors. Wrap it inside
/// [`crate::middleware::Trace`] so the trace identifier is in scope:
///
/// ```
/// use actix_web::App;
/// use sns_backend::middleware::{FailureLog, Trace};
///
/// let _app = App::new().wrap(FailureLog).wrap(Trace);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct FailureLog;

impl<S, B> Transform<S, ServiceRequest> for FailureLog
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = FailureLogMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(FailureLogMiddleware { service }))
    }
}

/// Service produced by [`FailureLog`].
pub struct FailureLogMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for FailureLogMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let ctx = RequestContext::capture(&req);
        let fut = self.service.call(req);
        Box::pin(async move {
            match fut.await {
                Ok(res) => {
                    let Some(err) = res.response().error() else {
                        return Ok(res.map_into_left_body());
                    };
                    record_untyped(err, &ctx);
                    if err.as_error::<Error>().is_some() {
                        Ok(res.map_into_left_body())
                    } else {
                        Ok(uniform_body(res))
                    }
                }
                Err(err) => {
                    record_untyped(&err, &ctx);
                    Err(err)
                }
            }
        })
    }
}
