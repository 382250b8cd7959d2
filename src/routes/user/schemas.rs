use actix_http::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{deserialize_email_object, EmailObject};
use crate::errors::GenericError;
use crate::schemas::Status;

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Copy, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Customer,
    Admin,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UserRole::Customer => "customer",
            UserRole::Admin => "admin",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct UserAccount {
    #[schema(value_type = String)]
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub role: UserRole,
    pub is_active: Status,
    pub is_deleted: bool,
}

impl FromRequest for UserAccount {
    type Error = GenericError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let value = req.extensions().get::<UserAccount>().cloned();
        ready(value.ok_or_else(|| {
            GenericError::UnexpectedCustomError(
                "Something went wrong while extracting the authenticated user".to_string(),
            )
        }))
    }
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticateRequest {
    pub identifier: String,
    #[schema(value_type = String)]
    pub password: Secret<String>,
}

fn default_role() -> UserRole {
    UserRole::Customer
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserAccount {
    pub username: String,
    #[serde(deserialize_with = "deserialize_email_object")]
    #[schema(value_type = String)]
    pub email: EmailObject,
    #[schema(value_type = String)]
    pub password: Secret<String>,
    pub display_name: String,
    #[serde(default = "default_role")]
    pub role: UserRole,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthData {
    pub user: UserAccount,
    #[serde(serialize_with = "serialize_secret_token")]
    #[schema(value_type = String)]
    pub token: Secret<String>,
}

fn serialize_secret_token<S>(x: &Secret<String>, s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    s.serialize_str(x.expose_secret())
}
