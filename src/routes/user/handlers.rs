use actix_web::{web, Result};
use sqlx::PgPool;
use utoipa::TupleUnit;

use super::errors::{AuthError, UserRegistrationError};
use super::schemas::{AuthData, AuthenticateRequest, CreateUserAccount, UserRole};
use super::utils::{fetch_user_by_id, get_auth_data, register_user, validate_user_credentials};
use crate::configuration::{SecretSetting, UserSettings};
use crate::schemas::GenericResponse;

#[utoipa::path(
    post,
    path = "/user/authenticate",
    tag = "User",
    description = "Authenticates a user with username/e-mail and password.",
    request_body(content = AuthenticateRequest, description = "Request Body"),
    responses(
        (status=200, description= "Authenticated", body= GenericResponse<AuthData>),
        (status=400, description= "Invalid credentials", body= GenericResponse<TupleUnit>),
        (status=500, description= "Internal Server Error", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(err, name = "Authenticate User", skip(pool, body, secret_obj), fields(identifier = %body.identifier))]
pub async fn authenticate(
    body: web::Json<AuthenticateRequest>,
    pool: web::Data<PgPool>,
    secret_obj: web::Data<SecretSetting>,
) -> Result<web::Json<GenericResponse<AuthData>>, AuthError> {
    let user_id = validate_user_credentials(body.0, &pool).await?;
    tracing::Span::current().record("user_id", tracing::field::display(&user_id));
    match fetch_user_by_id(&pool, user_id).await {
        Ok(Some(user_obj)) => {
            let auth_obj = get_auth_data(user_obj, &secret_obj.jwt).await?;
            Ok(web::Json(GenericResponse::success(
                "Successfully Authenticated User",
                Some(auth_obj),
            )))
        }
        Ok(None) | Err(_) => Err(AuthError::UnexpectedStringError(
            "Internal Server Error".to_string(),
        )),
    }
}

#[utoipa::path(
    post,
    path = "/user/register",
    tag = "User",
    description = "Registers a customer account. Admin accounts are restricted to the configured allow-list.",
    request_body(content = CreateUserAccount, description = "Request Body"),
    responses(
        (status=200, description= "Account created successfully", body= GenericResponse<TupleUnit>),
        (status=400, description= "Invalid Request body", body= GenericResponse<TupleUnit>),
        (status=403, description= "Insufficient Privilege", body= GenericResponse<TupleUnit>),
        (status=500, description= "Internal Server Error", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(err, name = "User Account Registration", skip(pool, body, user_settings), fields(username = %body.username))]
pub async fn register_user_account(
    body: web::Json<CreateUserAccount>,
    pool: web::Data<PgPool>,
    user_settings: web::Data<UserSettings>,
) -> Result<web::Json<GenericResponse<()>>, UserRegistrationError> {
    if body.role == UserRole::Admin && !user_settings.admin_list.contains(&body.email.to_string()) {
        return Err(UserRegistrationError::InsufficientPrivilegeError(
            "Insufficient privilege to register an admin account".to_string(),
        ));
    }
    match register_user(&pool, body.0).await {
        Ok(uuid) => {
            tracing::Span::current().record("user_id", tracing::field::display(&uuid));
            Ok(web::Json(GenericResponse::success(
                "Successfully Registered User",
                Some(()),
            )))
        }
        Err(e) => {
            tracing::error!("Failed to register user: {:?}", e);
            Err(e)
        }
    }
}
