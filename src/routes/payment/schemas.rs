use actix_http::Payload;
use actix_web::web::Json;
use actix_web::{FromRequest, HttpRequest};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::GenericError;
use crate::routes::purchase::schemas::PaymentType;

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Copy, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Succeeded,
    Failed,
    Refunded,
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateManualPaymentRequest {
    pub purchase_id: i64,
    #[schema(value_type = String)]
    pub amount: BigDecimal,
    pub payment_type: PaymentType,
}

impl FromRequest for CreateManualPaymentRequest {
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

/// Outcome reported by the hosted-checkout gateway.
#[derive(Deserialize, Serialize, Debug, PartialEq, Clone, Copy, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GatewayNotificationStatus {
    Succeeded,
    Failed,
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentNotificationRequest {
    pub purchase_id: i64,
    pub session_id: String,
    pub gateway_payment_id: String,
    #[schema(value_type = String)]
    pub amount: BigDecimal,
    pub payment_type: PaymentType,
    pub status: GatewayNotificationStatus,
}

impl FromRequest for PaymentNotificationRequest {
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
pub struct PaymentData {
    pub id: i64,
    pub purchase_id: i64,
    #[schema(value_type = String)]
    pub amount: BigDecimal,
    pub payment_type: PaymentType,
    pub status: PaymentStatus,
    pub gateway_payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
