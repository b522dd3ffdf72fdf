//! Application state and factory
//!
//! This module holds the shared state handed to every handler and builds
//! the Actix-web application with its routes and guards.

use std::sync::Arc;

use actix_web::{
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, Error,
};

use kg_core::domain::entities::user::Role;
use kg_core::repositories::UserStore;
use kg_core::services::auth::{AuthService, RateLimiterTrait, RevocationStoreTrait};

use crate::middleware::{AuthGuard, RejectionLog};
use crate::routes::{admin, auth, health, users};

/// Application state that holds shared services
pub struct AppState<U, R, V>
where
    U: UserStore,
    R: RateLimiterTrait,
    V: RevocationStoreTrait,
{
    pub auth_service: Arc<AuthService<U, R, V>>,
    /// Header whose value identifies the client when set by a trusted proxy
    pub trusted_proxy_header: String,
    /// Roles that may read resources they do not own
    pub privileged_roles: Vec<Role>,
}

impl<U, R, V> AppState<U, R, V>
where
    U: UserStore,
    R: RateLimiterTrait,
    V: RevocationStoreTrait,
{
    /// Builds the state, ignoring privileged role names that are not roles
    pub fn new(
        auth_service: Arc<AuthService<U, R, V>>,
        trusted_proxy_header: impl Into<String>,
        privileged_roles: &[String],
    ) -> Self {
        let privileged_roles = privileged_roles
            .iter()
            .filter_map(|name| match name.parse::<Role>() {
                Ok(role) => Some(role),
                Err(_) => {
                    tracing::warn!(role = %name, "Ignoring unknown privileged role");
                    None
                }
            })
            .collect();

        Self {
            auth_service,
            trusted_proxy_header: trusted_proxy_header.into(),
            privileged_roles,
        }
    }
}

/// Create and configure the application with all dependencies
pub fn create_app<U, R, V>(
    app_state: web::Data<AppState<U, R, V>>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = Error,
        InitError = (),
    >,
>
where
    U: UserStore + 'static,
    R: RateLimiterTrait + 'static,
    V: RevocationStoreTrait + 'static,
{
    let token_service = app_state.auth_service.token_service().clone();
    let privileged_roles = app_state.privileged_roles.clone();
    let any_role = [Role::Admin, Role::User];

    App::new()
        .app_data(app_state)
        .wrap(RejectionLog)
        .route("/health", web::get().to(health::health))
        .service(
            web::scope("/api/v1")
                .route("/login", web::post().to(auth::login::<U, R, V>))
                .route("/refresh", web::post().to(auth::refresh::<U, R, V>))
                .service(
                    web::resource("/me")
                        .wrap(AuthGuard::new(token_service.clone(), &any_role))
                        .route(web::get().to(users::me::<U, R, V>)),
                )
                .service(
                    web::resource("/users/{id}")
                        .wrap(
                            AuthGuard::new(token_service.clone(), &any_role)
                                .with_ownership("id", &privileged_roles),
                        )
                        .route(web::get().to(users::user_by_id::<U, R, V>)),
                )
                .service(
                    web::resource("/admin/stats")
                        .wrap(AuthGuard::new(token_service, &[Role::Admin]))
                        .route(web::get().to(admin::stats::<U, R, V>)),
                ),
        )
}
