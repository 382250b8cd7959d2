use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::schemas::{PaymentData, PaymentStatus};
use crate::routes::purchase::schemas::PaymentType;

#[derive(Debug, FromRow)]
pub struct PaymentModel {
    pub id: i64,
    pub purchase_id: i64,
    pub amount: BigDecimal,
    pub payment_type: PaymentType,
    pub status: PaymentStatus,
    pub gateway_payment_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PaymentModel {
    pub fn into_schema(self) -> PaymentData {
        PaymentData {
            id: self.id,
            purchase_id: self.purchase_id,
            amount: self.amount,
            payment_type: self.payment_type,
            status: self.status,
            gateway_payment_id: self.gateway_payment_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
