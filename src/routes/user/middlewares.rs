use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{http, web, Error, HttpMessage};
use futures::future::LocalBoxFuture;
use sqlx::PgPool;
use std::future::{ready, Ready};
use std::rc::Rc;

use super::schemas::{UserAccount, UserRole};
use super::utils::{fetch_user_by_id, validate_user_role};
use crate::configuration::SecretSetting;
use crate::errors::GenericError;
use crate::utils::decode_token;

pub struct AuthMiddleware<S> {
    service: Rc<S>,
}

impl<S> Service<ServiceRequest> for AuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<actix_web::body::BoxBody>, Error = Error>
        + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let token = req
            .cookie("token")
            .map(|c| c.value().to_string())
            .or_else(|| {
                req.headers()
                    .get(http::header::AUTHORIZATION)
                    .and_then(|h| h.to_str().ok())
                    .and_then(|h| h.strip_prefix("Bearer "))
                    .map(|h| h.to_string())
            });

        let jwt_secret = req
            .app_data::<web::Data<SecretSetting>>()
            .expect("SecretSetting is not registered")
            .jwt
            .secret
            .clone();

        let token = match token {
            Some(token) => token,
            None => {
                let (request, _pl) = req.into_parts();
                let json_error = GenericError::UnauthenticatedError(
                    "Authorization token is missing".to_string(),
                );
                return Box::pin(async { Ok(ServiceResponse::from_err(json_error, request)) });
            }
        };

        let user_id = match decode_token(token, &jwt_secret) {
            Ok(id) => id,
            Err(e) => {
                return Box::pin(async move {
                    let (request, _pl) = req.into_parts();
                    Ok(ServiceResponse::from_err(
                        GenericError::InvalidJWT(e.to_string()),
                        request,
                    ))
                });
            }
        };
        let srv = Rc::clone(&self.service);
        Box::pin(async move {
            let db_pool = req
                .app_data::<web::Data<PgPool>>()
                .expect("PgPool is not registered");
            let user = fetch_user_by_id(db_pool, user_id)
                .await
                .map_err(GenericError::UnexpectedError)?
                .ok_or_else(|| {
                    GenericError::UnauthenticatedError("User account no longer exists".to_string())
                })?;
            if user.is_deleted {
                return Err(GenericError::UnauthenticatedError(
                    "User account is deleted. Please contact customer support".to_string(),
                ))?;
            }
            req.extensions_mut().insert::<UserAccount>(user);

            let res = srv.call(req).await?;
            Ok(res)
        })
    }
}

/// Middleware factory for requiring authentication.
pub struct RequireAuth;

impl<S> Transform<S, ServiceRequest> for RequireAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<actix_web::body::BoxBody>, Error = Error>
        + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Transform = AuthMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RoleMiddleware<S> {
    service: Rc<S>,
    pub allowed_roles: Vec<UserRole>,
}

impl<S> Service<ServiceRequest> for RoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<actix_web::body::BoxBody>, Error = Error>
        + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = Rc::clone(&self.service);
        let allowed_roles = self.allowed_roles.clone();
        Box::pin(async move {
            let user_account = req
                .extensions()
                .get::<UserAccount>()
                .ok_or_else(|| {
                    GenericError::UnauthenticatedError(
                        "No authenticated user in request context".to_string(),
                    )
                })?
                .to_owned();

            if let Some(message) = validate_user_role(&user_account, &allowed_roles) {
                let (request, _pl) = req.into_parts();
                let json_error = GenericError::InsufficientPrivilegeError(message);
                return Ok(ServiceResponse::from_err(json_error, request));
            }

            let res = srv.call(req).await?;
            Ok(res)
        })
    }
}

/// Middleware factory for restricting a route to the given roles.
pub struct RoleValidation {
    pub allowed_roles: Vec<UserRole>,
}

impl<S> Transform<S, ServiceRequest> for RoleValidation
where
    S: Service<ServiceRequest, Response = ServiceResponse<actix_web::body::BoxBody>, Error = Error>
        + 'static,
{
    type Response = ServiceResponse<actix_web::body::BoxBody>;
    type Error = Error;
    type Transform = RoleMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RoleMiddleware {
            service: Rc::new(service),
            allowed_roles: self.allowed_roles.clone(),
        }))
    }
}
