//! Authorization guard protecting API resources.
//!
//! The guard runs three gates in order and stops at the first failure:
//!
//! 1. Authentication: a `Bearer` access token that parses and verifies
//! 2. Role check: the token's role is in the resource's allowed set
//! 3. Ownership check (optional): the path id equals the token subject,
//!    unless the role is privileged
//!
//! On success the validated [`Claims`] are stored in the request extensions
//! for handlers to read.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error, HttpMessage, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};

use kg_core::{
    domain::entities::{
        token::{Claims, TokenType},
        user::Role,
    },
    errors::AuthError,
    services::token::TokenService,
};
use kg_shared::error_codes;

use crate::handlers::error::ApiError;

#[derive(Debug)]
struct Ownership {
    param: String,
    privileged_roles: Vec<Role>,
}

#[derive(Debug)]
struct GuardPolicy {
    token_service: Arc<TokenService>,
    allowed_roles: Vec<Role>,
    ownership: Option<Ownership>,
}

impl GuardPolicy {
    fn authorize(&self, req: &ServiceRequest) -> Result<Claims, ApiError> {
        let token = extract_bearer_token(req).ok_or_else(|| unauthorized("missing bearer token"))?;

        let claims = self.token_service.parse(&token).map_err(|e| {
            tracing::debug!(error = %e, "Bearer token rejected");
            unauthorized("invalid or expired token")
        })?;

        if claims.typ != TokenType::Access {
            return Err(unauthorized("access token required"));
        }

        if !self.allowed_roles.contains(&claims.role) {
            return Err(forbidden("insufficient role"));
        }

        if let Some(ownership) = &self.ownership {
            let raw = req.match_info().get(&ownership.param).unwrap_or_default();
            if raw.is_empty() {
                return Err(ApiError::bad_request(error_codes::BAD_ID, "id is required"));
            }
            let id: i64 = raw
                .parse()
                .map_err(|_| ApiError::bad_request(error_codes::BAD_ID, "id must be integer"))?;

            if id != claims.sub && !ownership.privileged_roles.contains(&claims.role) {
                return Err(forbidden("user can access only own profile"));
            }
        }

        Ok(claims)
    }
}

fn unauthorized(reason: &str) -> ApiError {
    AuthError::Unauthorized {
        reason: reason.to_string(),
    }
    .into()
}

fn forbidden(reason: &str) -> ApiError {
    AuthError::Forbidden {
        reason: reason.to_string(),
    }
    .into()
}

/// Authorization guard middleware factory
pub struct AuthGuard {
    policy: Rc<GuardPolicy>,
}

impl AuthGuard {
    /// Guard admitting valid access tokens whose role is in `allowed_roles`
    pub fn new(token_service: Arc<TokenService>, allowed_roles: &[Role]) -> Self {
        Self {
            policy: Rc::new(GuardPolicy {
                token_service,
                allowed_roles: allowed_roles.to_vec(),
                ownership: None,
            }),
        }
    }

    /// Additionally require the path parameter `param` to equal the token
    /// subject, except for `privileged_roles`
    pub fn with_ownership(self, param: &str, privileged_roles: &[Role]) -> Self {
        let policy = GuardPolicy {
            token_service: self.policy.token_service.clone(),
            allowed_roles: self.policy.allowed_roles.clone(),
            ownership: Some(Ownership {
                param: param.to_string(),
                privileged_roles: privileged_roles.to_vec(),
            }),
        };
        Self {
            policy: Rc::new(policy),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthGuardMiddleware {
            service: Rc::new(service),
            policy: Rc::clone(&self.policy),
        }))
    }
}

/// Authorization guard middleware service
pub struct AuthGuardMiddleware<S> {
    service: Rc<S>,
    policy: Rc<GuardPolicy>,
}

impl<S, B> Service<ServiceRequest> for AuthGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let policy = Rc::clone(&self.policy);

        Box::pin(async move {
            match policy.authorize(&req) {
                Ok(claims) => {
                    req.extensions_mut().insert(claims);
                    service
                        .call(req)
                        .await
                        .map(ServiceResponse::map_into_left_body)
                }
                Err(error) => {
                    let response = HttpResponse::from_error(error);
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .map(|s| s.to_string())
}
