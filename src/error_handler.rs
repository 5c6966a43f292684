//! Terminal error stage. Every 5xx leaving the routes is rewritten here,
//! with the amount of detail decided by the configured environment.

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpResponse};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use serde_json::json;
use std::rc::Rc;

use crate::config::Environment;

pub const GENERIC_MESSAGE: &str = "server error";

#[derive(Clone, Copy, Debug)]
pub struct ErrorHandler {
    verbose: bool,
}

impl ErrorHandler {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn for_environment(env: Environment) -> Self {
        Self::new(env.verbose_errors())
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Response for an unexpected failure. `detail` is `(display, debug)` of the cause.
    pub fn render(&self, detail: Option<(String, String)>) -> HttpResponse {
        let body = match (self.verbose, detail) {
            (true, Some((message, debug))) => json!({
                "message": message,
                "error": { "message": message, "debug": debug },
            }),
            _ => json!({ "error": { "message": GENERIC_MESSAGE } }),
        };
        HttpResponse::InternalServerError().json(body)
    }
}

fn describe(err: &Error) -> (String, String) {
    (err.to_string(), format!("{err:?}"))
}

impl<S, B> Transform<S, ServiceRequest> for ErrorHandler
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = ErrorHandlerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ErrorHandlerMiddleware {
            service: Rc::new(service),
            handler: *self,
        }))
    }
}

pub struct ErrorHandlerMiddleware<S> {
    service: Rc<S>,
    handler: ErrorHandler,
}

impl<S, B> Service<ServiceRequest> for ErrorHandlerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let svc = self.service.clone();
        let handler = self.handler;
        Box::pin(async move {
            let res = svc.call(req).await?;
            if !res.status().is_server_error() {
                return Ok(res.map_into_left_body());
            }
            let detail = res.response().error().map(describe);
            let (method, path) = (res.request().method().clone(), res.request().path().to_owned());
            match &detail {
                Some((message, cause)) => {
                    tracing::error!(%method, %path, %message, debug = %cause, "request failed")
                }
                None => tracing::error!(%method, %path, "request failed without error detail"),
            }
            // take the request back only after routing has released it
            let (http_req, _) = res.into_parts();
            Ok(ServiceResponse::new(http_req, handler.render(detail)).map_into_right_body())
        })
    }
}
