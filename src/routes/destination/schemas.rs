use actix_http::Payload;
use actix_web::web::Json;
use actix_web::{FromRequest, HttpRequest};
use chrono::{DateTime, Utc};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::GenericError;
use crate::schemas::Status;

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDestinationRequest {
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub description: String,
    pub image_url: Option<String>,
}

impl FromRequest for CreateDestinationRequest {
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
pub struct UpdateDestinationRequest {
    pub name: Option<String>,
    pub country: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: Option<Status>,
}

impl FromRequest for UpdateDestinationRequest {
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

#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DestinationData {
    pub id: i64,
    pub name: String,
    pub country: String,
    pub description: String,
    pub image_url: Option<String>,
    pub is_active: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
