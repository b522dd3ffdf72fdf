//! Logs every rejected request with its method, path and error code

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::StatusCode,
    Error,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
};

use crate::handlers::error::ApiError;

/// Middleware factory logging responses that carry an [`ApiError`]
#[derive(Default)]
pub struct RejectionLog;

impl<S, B> Transform<S, ServiceRequest> for RejectionLog
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RejectionLogMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RejectionLogMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RejectionLogMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RejectionLogMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let method = req.method().to_string();
        let path = req.path().to_string();
        let fut = self.service.call(req);

        Box::pin(async move {
            match fut.await {
                Ok(res) => {
                    if let Some(error) = res.response().error().and_then(|e| e.as_error::<ApiError>()) {
                        log_rejection(&method, &path, res.status(), error);
                    }
                    Ok(res)
                }
                Err(err) => {
                    if let Some(error) = err.as_error::<ApiError>() {
                        log_rejection(&method, &path, err.as_response_error().status_code(), error);
                    }
                    Err(err)
                }
            }
        })
    }
}

fn log_rejection(method: &str, path: &str, status: StatusCode, error: &ApiError) {
    let details = error.details().unwrap_or_default();
    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            code = error.code(),
            details = %details,
            "Request failed"
        );
    } else {
        tracing::warn!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            code = error.code(),
            details = %details,
            "Request rejected"
        );
    }
}
