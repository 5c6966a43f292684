use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::Header;
use actix_web::{Error, ResponseError};
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use std::rc::Rc;
use std::sync::Arc;

use crate::error::ApiError;

/// Admits a request only when it carries `Authorization: Bearer <token>`
/// matching the configured secret exactly. Wraps the whole app.
#[derive(Clone)]
pub struct AuthGate {
    token: Arc<str>,
}

impl AuthGate {
    pub fn new(token: impl AsRef<str>) -> Self {
        Self { token: Arc::from(token.as_ref()) }
    }

    pub fn admits(&self, req: &ServiceRequest) -> bool {
        match Authorization::<Bearer>::parse(req) {
            Ok(auth) => auth.into_scheme().token() == &*self.token,
            Err(_) => false,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthGateMiddleware {
            service: Rc::new(service),
            gate: self.clone(),
        }))
    }
}

pub struct AuthGateMiddleware<S> {
    service: Rc<S>,
    gate: AuthGate,
}

impl<S, B> Service<ServiceRequest> for AuthGateMiddleware<S>
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
        if !self.gate.admits(&req) {
            tracing::warn!(method = %req.method(), path = %req.path(), "rejected request without a valid bearer token");
            let res = req.into_response(ApiError::Unauthorized.error_response());
            return Box::pin(ready(Ok(res.map_into_right_body())));
        }
        let fut = self.service.call(req);
        Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
    }
}
