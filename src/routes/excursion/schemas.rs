use actix_http::Payload;
use actix_web::web::Json;
use actix_web::{FromRequest, HttpRequest};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::GenericError;
use crate::schemas::Status;

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateExcursionRequest {
    pub destination_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[schema(value_type = String)]
    pub price: BigDecimal,
    #[serde(default)]
    pub capacity: i32,
    pub duration_hours: Option<i32>,
}

impl FromRequest for CreateExcursionRequest {
    type Error = GenericError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Json::<Self>::from_request(req, payload);

        Box::pin(async move {
            match fut.await {
                Ok(json) => Ok(json.into_inner()),
                Err(e) => Err(GenericError::ValidationError(e.to_string())),
            }
        })
    }
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExcursionRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = String)]
    pub price: Option<BigDecimal>,
    pub capacity: Option<i32>,
    pub duration_hours: Option<i32>,
    pub is_active: Option<Status>,
}

impl FromRequest for UpdateExcursionRequest {
    type Error = GenericError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Json::<Self>::from_request(req, payload);

        Box::pin(async move {
            match fut.await {
                Ok(json) => Ok(json.into_inner()),
                Err(e) => Err(GenericError::ValidationError(e.to_string())),
            }
        })
    }
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExcursionListFilter {
    pub destination_id: Option<i64>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExcursionData {
    pub id: i64,
    pub destination_id: i64,
    pub destination_name: String,
    pub title: String,
    pub description: String,
    #[schema(value_type = String)]
    pub price: BigDecimal,
    pub capacity: i32,
    pub duration_hours: Option<i32>,
    pub is_active: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
