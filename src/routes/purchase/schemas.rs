use actix_http::Payload;
use actix_web::web::Json;
use actix_web::{FromRequest, HttpRequest};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::GenericError;

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Copy, sqlx::Type, ToSchema)]
#[sqlx(type_name = "purchase_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PurchaseStatus {
    Pending,
    Reserved,
    Paid,
    Cancelled,
    Refunded,
    Expired,
    RefundRequired,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Copy, sqlx::Type, ToSchema)]
#[sqlx(type_name = "refund_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RefundStatus {
    None,
    Required,
    PendingRefund,
    Refunded,
}

/// Intent of the originating transaction, not a running total.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Copy, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    Deposit,
    Remaining,
    Full,
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub excursion_id: i64,
    pub number_of_people: i32,
    pub payment_type: PaymentType,
}

impl FromRequest for CheckoutRequest {
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
pub struct CheckoutData {
    pub purchase_id: i64,
    pub checkout_url: String,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePurchaseRequest {
    pub status: Option<PurchaseStatus>,
    pub refund_status: Option<RefundStatus>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl UpdatePurchaseRequest {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.refund_status.is_none() && self.expires_at.is_none()
    }
}

impl FromRequest for UpdatePurchaseRequest {
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
pub struct PurchaseListFilter {
    pub status: Option<PurchaseStatus>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// Customer-facing projection of a purchase.
#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseData {
    pub id: i64,
    pub excursion_id: i64,
    pub excursion_title: String,
    pub destination_name: String,
    pub number_of_people: i32,
    pub payment_type: PaymentType,
    #[schema(value_type = String)]
    pub total_amount: BigDecimal,
    #[schema(value_type = String)]
    pub amount_paid: BigDecimal,
    #[schema(value_type = String)]
    pub remaining_amount: BigDecimal,
    pub status: PurchaseStatus,
    pub refund_status: RefundStatus,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Back-office projection: the customer projection plus owner details.
#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminPurchaseData {
    pub id: i64,
    #[schema(value_type = String)]
    pub user_id: Uuid,
    pub user_email: String,
    pub user_name: String,
    pub excursion_id: i64,
    pub excursion_title: String,
    pub destination_name: String,
    pub number_of_people: i32,
    pub payment_type: PaymentType,
    #[schema(value_type = String)]
    pub total_amount: BigDecimal,
    #[schema(value_type = String)]
    pub amount_paid: BigDecimal,
    #[schema(value_type = String)]
    pub remaining_amount: BigDecimal,
    pub status: PurchaseStatus,
    pub refund_status: RefundStatus,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
